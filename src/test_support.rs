//! Test doubles shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::cache::InMemoryMetadataCache;
use crate::config::SyncConfig;
use crate::gateway::{GatewayError, RemoteGateway};
use crate::logging::structured::LogContext;
use crate::metadata::values::{encode_wire_bool, MetadataSnapshot};
use crate::storage::models::{RecordingRecord, RecordingStatus};
use crate::storage::store::InMemoryRecordingStore;
use crate::sync::clock::Clock;
use crate::sync::context::ActivityContext;
use crate::sync::recording::Recording;
use crate::sync::synchronizer::RecordingSynchronizer;

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Fetch(Vec<String>),
    Update(String, MetadataSnapshot),
    Publish(String, bool),
    Protect(String, bool),
    Delete(String),
}

/// In-memory conferencing server that records every call.
#[derive(Debug, Default)]
pub struct FakeGateway {
    remote: Mutex<HashMap<String, MetadataSnapshot>>,
    calls: Mutex<Vec<GatewayCall>>,
    fail_fetch: AtomicBool,
    fail_writes: AtomicBool,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, recording_id: &str, metadata: MetadataSnapshot) {
        self.remote.lock().insert(recording_id.to_string(), metadata);
    }

    pub fn remote(&self, recording_id: &str) -> Option<MetadataSnapshot> {
        self.remote.lock().get(recording_id).cloned()
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, GatewayCall::Fetch(_)))
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn write(&self, call: GatewayCall) -> Result<(), GatewayError> {
        self.calls.lock().push(call);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }

    fn set_remote_flag(&self, recording_id: &str, key: &str, flag: bool) {
        if let Some(metadata) = self.remote.lock().get_mut(recording_id) {
            metadata.insert(key.to_string(), encode_wire_bool(flag));
        }
    }
}

impl RemoteGateway for FakeGateway {
    fn fetch_metadata(
        &self,
        recording_ids: &HashSet<String>,
    ) -> Result<HashMap<String, MetadataSnapshot>, GatewayError> {
        let mut ids: Vec<String> = recording_ids.iter().cloned().collect();
        ids.sort();
        self.calls.lock().push(GatewayCall::Fetch(ids));
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("timeout".to_string()));
        }
        let remote = self.remote.lock();
        Ok(recording_ids
            .iter()
            .filter_map(|id| remote.get(id).map(|m| (id.clone(), m.clone())))
            .collect())
    }

    fn update_metadata(
        &self,
        recording_id: &str,
        metadata: &MetadataSnapshot,
    ) -> Result<(), GatewayError> {
        self.write(GatewayCall::Update(recording_id.to_string(), metadata.clone()))?;
        self.remote
            .lock()
            .insert(recording_id.to_string(), metadata.clone());
        Ok(())
    }

    fn publish(&self, recording_id: &str, flag: bool) -> Result<(), GatewayError> {
        self.write(GatewayCall::Publish(recording_id.to_string(), flag))?;
        self.set_remote_flag(recording_id, "published", flag);
        Ok(())
    }

    fn protect(&self, recording_id: &str, flag: bool) -> Result<(), GatewayError> {
        self.write(GatewayCall::Protect(recording_id.to_string(), flag))?;
        self.set_remote_flag(recording_id, "protect", flag);
        Ok(())
    }

    fn delete(&self, recording_id: &str) -> Result<(), GatewayError> {
        self.write(GatewayCall::Delete(recording_id.to_string()))?;
        self.remote.lock().remove(recording_id);
        Ok(())
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, secs: i64) {
        let mut now = self.now.lock();
        *now = *now + Duration::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

pub fn meta(value: Value) -> MetadataSnapshot {
    value.as_object().cloned().unwrap_or_default()
}

/// Remote metadata as the server reports a finished recording.
pub fn remote_metadata(name: &str) -> MetadataSnapshot {
    meta(json!({
        "meetingName": name,
        "meta_bbb-recording-description": format!("{} description", name),
        "startTime": "1612345678000",
        "endTime": "1612349278000",
        "published": "true",
        "protect": "false",
        "playbacks": [
            {"type": "presentation", "url": "https://bbb.example/playback/presentation/2.3/x"},
            {"type": "statistics", "url": "https://bbb.example/learning-dashboard/x"}
        ]
    }))
}

/// Synchronizer wired to fakes.
pub struct Harness {
    pub gateway: Arc<FakeGateway>,
    pub cache: Arc<InMemoryMetadataCache>,
    pub store: Arc<InMemoryRecordingStore>,
    pub clock: Arc<ManualClock>,
    pub sync: RecordingSynchronizer,
    pub ctx: LogContext,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(SyncConfig::default())
    }

    pub fn with_config(config: SyncConfig) -> Self {
        let gateway = Arc::new(FakeGateway::new());
        let cache = Arc::new(InMemoryMetadataCache::new());
        let store = Arc::new(InMemoryRecordingStore::new());
        let clock = Arc::new(ManualClock::new(start_time()));
        let sync = RecordingSynchronizer::new(
            gateway.clone(),
            cache.clone(),
            store.clone(),
            config,
        )
        .with_clock(clock.clone());

        Self {
            gateway,
            cache,
            store,
            clock,
            sync,
            ctx: LogContext::new("req-test"),
        }
    }

    /// Persist a processed live recording whose metadata exists remotely.
    pub fn seed_recording(
        &self,
        activity: &ActivityContext,
        recording_id: &str,
        name: &str,
        group_id: i64,
    ) -> Recording {
        self.gateway.seed(recording_id, remote_metadata(name));
        let record = RecordingRecord::new(activity.course_id, activity.instance_id, recording_id)
            .with_group(group_id)
            .with_status(RecordingStatus::Processed);
        self.sync.create(record, &self.ctx).unwrap()
    }
}
