//! Recording entity.
//!
//! Plain data: the persisted row plus the one piece of per-instance sync
//! state, whether local metadata edits are waiting to be pushed. All
//! behaviour lives in `RecordingSynchronizer`.

use std::fmt;
use std::str::FromStr;

use crate::metadata::fields::MirroredField;
use crate::storage::models::RecordingRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub(crate) record: RecordingRecord,
    pub(crate) metadata_changed: bool,
}

impl Recording {
    pub fn from_record(record: RecordingRecord) -> Self {
        Self {
            record,
            metadata_changed: false,
        }
    }

    pub fn record(&self) -> &RecordingRecord {
        &self.record
    }

    pub fn id(&self) -> Option<i64> {
        self.record.id
    }

    pub fn recording_id(&self) -> &str {
        &self.record.recording_id
    }

    pub fn is_imported(&self) -> bool {
        self.record.imported
    }

    pub fn is_headless(&self) -> bool {
        self.record.headless
    }

    pub fn group_id(&self) -> i64 {
        self.record.group_id
    }

    /// Local metadata edits not yet pushed to the server.
    pub fn metadata_changed(&self) -> bool {
        self.metadata_changed
    }
}

/// Every field readable through the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordingField {
    Id,
    Name,
    Description,
    StartTime,
    EndTime,
    Published,
    Protected,
    Playbacks,
    Tags,
    Status,
    Imported,
    Headless,
    GroupId,
    RecordingId,
    CourseId,
    InstanceId,
}

impl RecordingField {
    pub fn mirrored(self) -> Option<MirroredField> {
        match self {
            RecordingField::Name => Some(MirroredField::Name),
            RecordingField::Description => Some(MirroredField::Description),
            RecordingField::StartTime => Some(MirroredField::StartTime),
            RecordingField::EndTime => Some(MirroredField::EndTime),
            RecordingField::Published => Some(MirroredField::Published),
            RecordingField::Protected => Some(MirroredField::Protected),
            RecordingField::Playbacks => Some(MirroredField::Playbacks),
            RecordingField::Tags => Some(MirroredField::Tags),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        if let Some(mirrored) = self.mirrored() {
            return mirrored.name();
        }
        match self {
            RecordingField::Id => "id",
            RecordingField::Status => "status",
            RecordingField::Imported => "imported",
            RecordingField::Headless => "headless",
            RecordingField::GroupId => "groupid",
            RecordingField::RecordingId => "recordingid",
            RecordingField::CourseId => "courseid",
            RecordingField::InstanceId => "bigbluebuttonbnid",
            _ => "unknown",
        }
    }
}

impl From<MirroredField> for RecordingField {
    fn from(field: MirroredField) -> Self {
        match field {
            MirroredField::Name => RecordingField::Name,
            MirroredField::Description => RecordingField::Description,
            MirroredField::StartTime => RecordingField::StartTime,
            MirroredField::EndTime => RecordingField::EndTime,
            MirroredField::Published => RecordingField::Published,
            MirroredField::Protected => RecordingField::Protected,
            MirroredField::Playbacks => RecordingField::Playbacks,
            MirroredField::Tags => RecordingField::Tags,
        }
    }
}

impl fmt::Display for RecordingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecordingField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(mirrored) = s.parse::<MirroredField>() {
            return Ok(mirrored.into());
        }
        match s {
            "id" => Ok(RecordingField::Id),
            "status" => Ok(RecordingField::Status),
            "imported" => Ok(RecordingField::Imported),
            "headless" => Ok(RecordingField::Headless),
            "groupid" => Ok(RecordingField::GroupId),
            "recordingid" => Ok(RecordingField::RecordingId),
            "courseid" => Ok(RecordingField::CourseId),
            "bigbluebuttonbnid" => Ok(RecordingField::InstanceId),
            other => Err(format!("unknown recording field: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip() {
        for name in [
            "id", "name", "description", "starttime", "endtime", "published", "protected",
            "playbacks", "tags", "status", "imported", "headless", "groupid", "recordingid",
            "courseid", "bigbluebuttonbnid",
        ] {
            let field: RecordingField = name.parse().unwrap();
            assert_eq!(field.name(), name);
        }
        assert!("importeddata".parse::<RecordingField>().is_err());
    }

    #[test]
    fn test_mirrored_subset() {
        assert_eq!(RecordingField::Name.mirrored(), Some(MirroredField::Name));
        assert_eq!(RecordingField::GroupId.mirrored(), None);
        assert_eq!(RecordingField::Status.mirrored(), None);
    }

    #[test]
    fn test_new_entity_has_no_pending_edits() {
        let recording = Recording::from_record(RecordingRecord::new(1, 2, "abc"));
        assert!(!recording.metadata_changed());
        assert_eq!(recording.recording_id(), "abc");
        assert_eq!(recording.id(), None);
    }
}
