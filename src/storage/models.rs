//! Database models for recording storage.
//!
//! Only identity, ownership and lifecycle columns are persisted. Mirrored
//! fields (name, description, times, flags, playbacks) are never stored
//! here; they come from remote metadata.

use std::convert::TryFrom;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a recording stands in the remote processing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum RecordingStatus {
    /// The meeting is set to be recorded and awaits a recording update.
    #[default]
    Awaiting,
    /// The meeting was not recorded and the server dismissed it.
    Dismissed,
    /// A recording has been processed.
    Processed,
    /// The server sent its completion callback.
    Notified,
}

impl RecordingStatus {
    pub const ALL: [RecordingStatus; 4] = [
        RecordingStatus::Awaiting,
        RecordingStatus::Dismissed,
        RecordingStatus::Processed,
        RecordingStatus::Notified,
    ];

    pub fn code(self) -> i64 {
        match self {
            RecordingStatus::Awaiting => 0,
            RecordingStatus::Dismissed => 1,
            RecordingStatus::Processed => 2,
            RecordingStatus::Notified => 3,
        }
    }

    /// Statuses that have a playable recording behind them.
    pub fn is_listable(self) -> bool {
        matches!(self, RecordingStatus::Processed | RecordingStatus::Notified)
    }
}

impl TryFrom<i64> for RecordingStatus {
    type Error = String;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(RecordingStatus::Awaiting),
            1 => Ok(RecordingStatus::Dismissed),
            2 => Ok(RecordingStatus::Processed),
            3 => Ok(RecordingStatus::Notified),
            other => Err(format!("unknown recording status {}", other)),
        }
    }
}

impl From<RecordingStatus> for i64 {
    fn from(status: RecordingStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for RecordingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordingStatus::Awaiting => "awaiting",
            RecordingStatus::Dismissed => "dismissed",
            RecordingStatus::Processed => "processed",
            RecordingStatus::Notified => "notified",
        };
        f.write_str(label)
    }
}

/// A row of the `bigbluebuttonbn_recordings` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingRecord {
    /// Local primary key, `None` until inserted.
    pub id: Option<i64>,
    #[serde(rename = "courseid")]
    pub course_id: i64,
    /// Owning activity instance.
    #[serde(rename = "bigbluebuttonbnid")]
    pub instance_id: i64,
    /// 0 means visible to every group.
    #[serde(rename = "groupid", default)]
    pub group_id: i64,
    /// Remote identifier on the conferencing server.
    #[serde(rename = "recordingid")]
    pub recording_id: String,
    #[serde(default)]
    pub headless: bool,
    #[serde(default)]
    pub imported: bool,
    #[serde(default)]
    pub status: RecordingStatus,
    /// Frozen metadata snapshot (JSON), only for imported recordings.
    #[serde(rename = "importeddata", default)]
    pub imported_data: String,
    #[serde(rename = "timecreated", default)]
    pub time_created: i64,
    #[serde(rename = "timemodified", default)]
    pub time_modified: i64,
}

impl RecordingRecord {
    /// A fresh live recording of an activity, with default lifecycle flags.
    pub fn new(course_id: i64, instance_id: i64, recording_id: &str) -> Self {
        Self {
            id: None,
            course_id,
            instance_id,
            group_id: 0,
            recording_id: recording_id.to_string(),
            headless: false,
            imported: false,
            status: RecordingStatus::Awaiting,
            imported_data: String::new(),
            time_created: 0,
            time_modified: 0,
        }
    }

    pub fn with_group(mut self, group_id: i64) -> Self {
        self.group_id = group_id;
        self
    }

    pub fn with_status(mut self, status: RecordingStatus) -> Self {
        self.status = status;
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn has_remote_id(&self) -> bool {
        !self.recording_id.is_empty()
    }
}
