//! Recording set query.
//!
//! Computes the ordered list of recordings an activity shows to an actor:
//! 1. Select persisted rows by activity type, import mode and status
//! 2. Drop rows the actor cannot see through group scoping
//! 3. Warm the metadata cache for the survivors with one batched fetch

use crate::error::Result;
use crate::listing::visibility::{is_visible, Actor};
use crate::logging::structured::LogContext;
use crate::storage::queries::{ImportMode, RecordingQuery};
use crate::sync::context::{ActivityContext, InstanceType};
use crate::sync::recording::Recording;
use crate::sync::synchronizer::RecordingSynchronizer;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSet {
    pub activity: ActivityContext,
    pub group_filter: Option<i64>,
    pub imported: ImportMode,
    pub include_headless: bool,
}

impl RecordingSet {
    /// Everything the activity shows by default: its own recordings plus
    /// the ones imported into it. Headless rows are left out.
    pub fn for_activity(activity: ActivityContext) -> Self {
        Self {
            activity,
            group_filter: None,
            imported: ImportMode::Include,
            include_headless: false,
        }
    }

    pub fn group(mut self, group_id: i64) -> Self {
        self.group_filter = Some(group_id);
        self
    }

    pub fn imported(mut self, mode: ImportMode) -> Self {
        self.imported = mode;
        self
    }

    pub fn include_headless(mut self, include: bool) -> Self {
        self.include_headless = include;
        self
    }

    /// The persisted filter, before group visibility.
    pub fn query(&self) -> RecordingQuery {
        let query = RecordingQuery::for_instance(self.activity.instance_id)
            .imported(self.imported)
            .include_headless(self.include_headless);
        match self.activity.instance_type {
            InstanceType::RecordingOnly => query.course_wide(self.activity.course_id),
            InstanceType::All | InstanceType::RoomOnly => query,
        }
    }

    /// Recordings visible to `actor`, oldest first.
    pub fn fetch(
        &self,
        sync: &RecordingSynchronizer,
        actor: &Actor,
        ctx: &LogContext,
    ) -> Result<Vec<Recording>> {
        let ctx = ctx.with_instance(self.activity.instance_id);
        let rows = sync.store().find(&self.query())?;
        let candidates = rows.len();

        let recordings: Vec<Recording> = rows
            .into_iter()
            .filter(|record| is_visible(record.group_id, actor, self.group_filter))
            .map(Recording::from_record)
            .collect();

        sync.prime_metadata(&recordings, &ctx);

        log::info!(
            "{} RECORDING_SET_LISTED type={} imported={:?} group={:?} user={} candidates={} visible={}",
            ctx,
            self.activity.instance_type.code(),
            self.imported,
            self.group_filter,
            actor.user_id,
            candidates,
            recordings.len()
        );
        Ok(recordings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::values::FieldValue;
    use crate::storage::models::{RecordingRecord, RecordingStatus};
    use crate::sync::recording::RecordingField;
    use crate::test_support::{GatewayCall, Harness};

    const GROUP_A: i64 = 5;
    const GROUP_B: i64 = 6;

    fn activity() -> ActivityContext {
        ActivityContext::new(10, 1)
    }

    fn names(h: &Harness, recordings: &[Recording]) -> Vec<String> {
        recordings
            .iter()
            .map(|r| match h.sync.get(r, RecordingField::Name, &h.ctx) {
                FieldValue::Text(name) => name,
                other => format!("{:?}", other),
            })
            .collect()
    }

    /// One recording without a group, one per group, one more for group A.
    fn seed_groups(h: &Harness) {
        h.seed_recording(&activity(), "r0", "Recording0", 0);
        h.seed_recording(&activity(), "ra", "RecordingA", GROUP_A);
        h.seed_recording(&activity(), "rb", "RecordingB", GROUP_B);
        h.seed_recording(&activity(), "ra2", "RecordingA2", GROUP_A);
    }

    #[test]
    fn test_member_sees_unscoped_and_own_group() {
        let h = Harness::new();
        seed_groups(&h);
        let actor = Actor::new(1).in_groups([GROUP_A]);

        let recordings = RecordingSet::for_activity(activity())
            .fetch(&h.sync, &actor, &h.ctx)
            .unwrap();
        assert_eq!(names(&h, &recordings), ["Recording0", "RecordingA", "RecordingA2"]);
    }

    #[test]
    fn test_no_group_actor_sees_unscoped_only() {
        let h = Harness::new();
        seed_groups(&h);

        let recordings = RecordingSet::for_activity(activity())
            .fetch(&h.sync, &Actor::new(1), &h.ctx)
            .unwrap();
        assert_eq!(names(&h, &recordings), ["Recording0"]);
    }

    #[test]
    fn test_manager_sees_everything() {
        let h = Harness::new();
        seed_groups(&h);

        let recordings = RecordingSet::for_activity(activity())
            .fetch(&h.sync, &Actor::new(1).manager(), &h.ctx)
            .unwrap();
        assert_eq!(recordings.len(), 4);
    }

    #[test]
    fn test_group_filter() {
        let h = Harness::new();
        seed_groups(&h);
        let member = Actor::new(1).in_groups([GROUP_A]);

        let own = RecordingSet::for_activity(activity())
            .group(GROUP_A)
            .fetch(&h.sync, &member, &h.ctx)
            .unwrap();
        assert_eq!(names(&h, &own), ["RecordingA", "RecordingA2"]);

        let other = RecordingSet::for_activity(activity())
            .group(GROUP_B)
            .fetch(&h.sync, &member, &h.ctx)
            .unwrap();
        assert!(other.is_empty());

        let managed = RecordingSet::for_activity(activity())
            .group(GROUP_B)
            .fetch(&h.sync, &Actor::new(2).manager(), &h.ctx)
            .unwrap();
        assert_eq!(names(&h, &managed), ["RecordingB"]);
    }

    #[test]
    fn test_listing_primes_cache_with_one_fetch() {
        let h = Harness::new();
        seed_groups(&h);
        h.gateway.clear_calls();

        let recordings = RecordingSet::for_activity(activity())
            .fetch(&h.sync, &Actor::new(1).manager(), &h.ctx)
            .unwrap();
        names(&h, &recordings);

        let ids = ["r0", "ra", "ra2", "rb"].map(String::from).to_vec();
        assert_eq!(h.gateway.calls(), vec![GatewayCall::Fetch(ids)]);
    }

    #[test]
    fn test_unfinished_and_headless_recordings() {
        let h = Harness::new();
        h.seed_recording(&activity(), "done", "Done", 0);
        h.sync
            .create(RecordingRecord::new(1, 10, "pending"), &h.ctx)
            .unwrap();
        h.sync
            .create(
                RecordingRecord::new(1, 10, "dismissed").with_status(RecordingStatus::Dismissed),
                &h.ctx,
            )
            .unwrap();
        h.sync
            .create(
                RecordingRecord::new(1, 10, "")
                    .headless(true)
                    .with_status(RecordingStatus::Notified),
                &h.ctx,
            )
            .unwrap();
        let actor = Actor::new(1);

        let listed = RecordingSet::for_activity(activity())
            .fetch(&h.sync, &actor, &h.ctx)
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].recording_id(), "done");

        let with_headless = RecordingSet::for_activity(activity())
            .include_headless(true)
            .fetch(&h.sync, &actor, &h.ctx)
            .unwrap();
        assert_eq!(with_headless.len(), 2);
        assert!(with_headless[1].is_headless());
    }

    #[test]
    fn test_imported_modes() {
        let h = Harness::new();
        let other_activity = ActivityContext::new(20, 1);
        h.seed_recording(&activity(), "own", "Own", 0);
        let foreign = h.seed_recording(&other_activity, "foreign", "Foreign", 0);
        h.sync
            .create_imported_recording(&foreign, &activity(), &h.ctx)
            .unwrap();
        let actor = Actor::new(1);

        let ids = |mode: ImportMode| -> Vec<String> {
            RecordingSet::for_activity(activity())
                .imported(mode)
                .fetch(&h.sync, &actor, &h.ctx)
                .unwrap()
                .iter()
                .map(|r| format!("{}:{}", r.recording_id(), r.is_imported()))
                .collect()
        };

        assert_eq!(ids(ImportMode::Exclude), ["own:false"]);
        assert_eq!(ids(ImportMode::Include), ["own:false", "foreign:true"]);
        assert_eq!(ids(ImportMode::Only), ["foreign:true"]);
    }

    #[test]
    fn test_default_listing_includes_imported() {
        let h = Harness::new();
        let source = h.seed_recording(&ActivityContext::new(20, 1), "foreign", "Foreign", 0);
        h.seed_recording(&activity(), "own", "Own", 0);
        h.sync
            .create_imported_recording(&source, &activity(), &h.ctx)
            .unwrap();

        let recordings = RecordingSet::for_activity(activity())
            .fetch(&h.sync, &Actor::new(1), &h.ctx)
            .unwrap();
        assert_eq!(names(&h, &recordings), ["Own", "Foreign"]);
        assert!(recordings[1].is_imported());
    }

    #[test]
    fn test_recording_only_activity_lists_course() {
        let h = Harness::new();
        h.seed_recording(&activity(), "a", "A", 0);
        h.seed_recording(&ActivityContext::new(20, 1), "b", "B", 0);
        h.seed_recording(&ActivityContext::new(30, 2), "c", "C", 0);
        let viewer = ActivityContext::new(40, 1).with_type(InstanceType::RecordingOnly);

        let recordings = RecordingSet::for_activity(viewer)
            .fetch(&h.sync, &Actor::new(1), &h.ctx)
            .unwrap();
        let ids: Vec<&str> = recordings.iter().map(|r| r.recording_id()).collect();
        assert_eq!(ids, ["a", "b"]);
    }
}
