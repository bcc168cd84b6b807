//! Recording metadata synchronization.
//!
//! Reconciles local field edits, cached remote snapshots and the
//! conferencing server's state:
//! 1. Imported recordings read their frozen snapshot and never sync
//! 2. Live recordings read through the shared cache, refreshing from the
//!    server once an entry reaches the refresh period
//! 3. Pending local edits pin the cached snapshot until the next save
//! 4. Publish/protect toggles are pushed immediately; other edits are
//!    flushed as a full metadata update on save
//! 5. Deleting a live recording deletes it remotely and drops its cache entry

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::cache::MetadataCache;
use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::gateway::RemoteGateway;
use crate::logging::structured::LogContext;
use crate::metadata::fields::{read_field, write_field, MirroredField};
use crate::metadata::values::{FieldValue, MetadataSnapshot};
use crate::storage::models::RecordingStatus;
use crate::storage::store::RecordingStore;
use crate::storage::RecordingRecord;
use crate::sync::clock::{Clock, SystemClock};
use crate::sync::context::ActivityContext;
use crate::sync::recording::{Recording, RecordingField};

/// Owns the reconciliation policy for recording metadata.
pub struct RecordingSynchronizer {
    gateway: Arc<dyn RemoteGateway>,
    cache: Arc<dyn MetadataCache>,
    store: Arc<dyn RecordingStore>,
    clock: Arc<dyn Clock>,
    config: SyncConfig,
}

impl RecordingSynchronizer {
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        cache: Arc<dyn MetadataCache>,
        store: Arc<dyn RecordingStore>,
        config: SyncConfig,
    ) -> Self {
        Self {
            gateway,
            cache,
            store,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn RecordingStore {
        self.store.as_ref()
    }

    /// Current metadata snapshot for a recording.
    ///
    /// Never fails: on remote errors the stale cached snapshot is returned,
    /// or an empty one when nothing was ever cached.
    pub fn resolve_metadata(&self, recording: &Recording, ctx: &LogContext) -> MetadataSnapshot {
        let ctx = ctx.with_recording(recording.recording_id());

        if recording.is_imported() {
            return decode_imported_data(&recording.record.imported_data, &ctx);
        }

        let recording_id = recording.recording_id();
        if recording_id.is_empty() {
            log::debug!("{} METADATA_SKIP reason=no_recording_id", ctx);
            return MetadataSnapshot::new();
        }

        let cached = self.cache.get(recording_id);

        if recording.metadata_changed {
            log::debug!(
                "{} METADATA_EDIT_PENDING cached={}",
                ctx,
                cached.is_some()
            );
            return cached.map(|entry| entry.metadata).unwrap_or_default();
        }

        let now = self.clock.now();
        match cached {
            Some(entry) if entry.is_fresh(now, self.config.refresh_period()) => {
                log::debug!(
                    "{} METADATA_CACHE_HIT age_secs={}",
                    ctx,
                    entry.age(now).num_seconds()
                );
                entry.metadata
            }
            Some(entry) => {
                log::debug!(
                    "{} METADATA_CACHE_STALE age_secs={} refresh_period_secs={}",
                    ctx,
                    entry.age(now).num_seconds(),
                    self.config.refresh_period_secs
                );
                self.refresh(recording_id, now, &ctx)
                    .unwrap_or(entry.metadata)
            }
            None => {
                log::debug!("{} METADATA_CACHE_MISS", ctx);
                self.refresh(recording_id, now, &ctx).unwrap_or_default()
            }
        }
    }

    /// Fetch one recording's metadata and cache it. `None` on failure or
    /// when the server has nothing for it.
    fn refresh(
        &self,
        recording_id: &str,
        now: DateTime<Utc>,
        ctx: &LogContext,
    ) -> Option<MetadataSnapshot> {
        let ids = HashSet::from([recording_id.to_string()]);
        match self.gateway.fetch_metadata(&ids) {
            Ok(mut found) => match found.remove(recording_id) {
                Some(metadata) if !metadata.is_empty() => {
                    log::info!("{} METADATA_REFRESH keys={}", ctx, metadata.len());
                    self.cache.put(recording_id, metadata.clone(), now);
                    Some(metadata)
                }
                _ => {
                    log::warn!("{} METADATA_REFRESH_EMPTY", ctx);
                    None
                }
            },
            Err(e) => {
                log::warn!("{} METADATA_REFRESH_FAILED error={}", ctx, e);
                None
            }
        }
    }

    /// Refresh every stale or missing cache entry among `recordings` with a
    /// single batched fetch.
    pub fn prime_metadata(&self, recordings: &[Recording], ctx: &LogContext) {
        let now = self.clock.now();
        let period = self.config.refresh_period();

        let stale: HashSet<String> = recordings
            .iter()
            .filter(|r| !r.is_imported() && !r.metadata_changed && r.record.has_remote_id())
            .filter(|r| {
                self.cache
                    .get(r.recording_id())
                    .map_or(true, |entry| !entry.is_fresh(now, period))
            })
            .map(|r| r.recording_id().to_string())
            .collect();

        if stale.is_empty() {
            log::debug!("{} METADATA_PRIME_SKIP recordings={}", ctx, recordings.len());
            return;
        }

        match self.gateway.fetch_metadata(&stale) {
            Ok(found) => {
                let mut refreshed = 0;
                for (recording_id, metadata) in found {
                    if stale.contains(&recording_id) && !metadata.is_empty() {
                        self.cache.put(&recording_id, metadata, now);
                        refreshed += 1;
                    }
                }
                log::info!(
                    "{} METADATA_REFRESH requested={} refreshed={}",
                    ctx,
                    stale.len(),
                    refreshed
                );
            }
            Err(e) => {
                log::warn!(
                    "{} METADATA_REFRESH_FAILED requested={} error={}",
                    ctx,
                    stale.len(),
                    e
                );
            }
        }
    }

    /// Read a field. Mirrored fields go through the metadata snapshot.
    pub fn get(&self, recording: &Recording, field: RecordingField, ctx: &LogContext) -> FieldValue {
        if let Some(mirrored) = field.mirrored() {
            let metadata = self.resolve_metadata(recording, ctx);
            return read_field(&metadata, mirrored);
        }

        let record = &recording.record;
        match field {
            RecordingField::Id => record.id.map_or(FieldValue::Null, FieldValue::Int),
            RecordingField::Status => FieldValue::Status(record.status),
            RecordingField::Imported => FieldValue::Bool(record.imported),
            RecordingField::Headless => FieldValue::Bool(record.headless),
            RecordingField::GroupId => FieldValue::Int(record.group_id),
            RecordingField::RecordingId => FieldValue::Text(record.recording_id.clone()),
            RecordingField::CourseId => FieldValue::Int(record.course_id),
            RecordingField::InstanceId => FieldValue::Int(record.instance_id),
            _ => FieldValue::Null,
        }
    }

    /// Set a field.
    ///
    /// Local columns (`groupid`, `status`) change the record only and are
    /// persisted on save. Mirrored fields are written into the cached
    /// snapshot right away; `published` and `protected` are also pushed to
    /// the server immediately.
    pub fn set(
        &self,
        recording: &mut Recording,
        field: RecordingField,
        value: FieldValue,
        ctx: &LogContext,
    ) -> Result<()> {
        if let Some(mirrored) = field.mirrored() {
            return self.set_mirrored(recording, mirrored, value, ctx);
        }

        match field {
            RecordingField::GroupId => {
                let group_id = value.as_i64().ok_or(SyncError::InvalidValue {
                    field: "groupid",
                    expected: "integer",
                })?;
                recording.record.group_id = group_id;
            }
            RecordingField::Status => {
                let status = match value {
                    FieldValue::Status(status) => status,
                    FieldValue::Int(code) => {
                        RecordingStatus::try_from(code).map_err(|_| SyncError::InvalidValue {
                            field: "status",
                            expected: "recording status",
                        })?
                    }
                    _ => {
                        return Err(SyncError::InvalidValue {
                            field: "status",
                            expected: "recording status",
                        })
                    }
                };
                recording.record.status = status;
            }
            other => return Err(SyncError::ReadOnlyField(other.name())),
        }

        log::debug!(
            "{} FIELD_SET field={} local=true",
            ctx.with_recording(recording.recording_id()),
            field
        );
        Ok(())
    }

    fn set_mirrored(
        &self,
        recording: &mut Recording,
        field: MirroredField,
        value: FieldValue,
        ctx: &LogContext,
    ) -> Result<()> {
        let ctx = ctx.with_recording(recording.recording_id());

        if recording.is_imported() {
            log::debug!("{} FIELD_SET_SKIPPED_IMPORTED field={}", ctx, field);
            return Ok(());
        }

        let descriptor = field.descriptor();
        let invalid = SyncError::InvalidValue {
            field: descriptor.name,
            expected: descriptor.expected,
        };
        let flag = match field {
            MirroredField::Published | MirroredField::Protected => {
                Some(value.as_bool().ok_or(invalid)?)
            }
            _ => {
                if descriptor.encode(&value).is_none() {
                    return Err(invalid);
                }
                None
            }
        };

        if !recording.record.has_remote_id() {
            return Err(SyncError::MissingRecordingId);
        }

        recording.metadata_changed = true;
        let mut metadata = self.resolve_metadata(recording, &ctx);
        let key = write_field(&mut metadata, field, &value).ok_or(SyncError::InvalidValue {
            field: descriptor.name,
            expected: descriptor.expected,
        })?;

        let recording_id = recording.record.recording_id.clone();
        self.cache.put(&recording_id, metadata, self.clock.now());
        log::info!("{} FIELD_SET field={} key={}", ctx, field, key);

        match (field, flag) {
            (MirroredField::Published, Some(flag)) => {
                self.gateway.publish(&recording_id, flag).map_err(|source| {
                    log::error!("{} RECORDING_PUBLISH_FAILED flag={} error={}", ctx, flag, source);
                    SyncError::RemotePublish {
                        recording_id: recording_id.clone(),
                        source,
                    }
                })?;
                log::info!("{} RECORDING_PUBLISH flag={}", ctx, flag);
            }
            (MirroredField::Protected, Some(flag)) => {
                self.gateway.protect(&recording_id, flag).map_err(|source| {
                    log::error!("{} RECORDING_PROTECT_FAILED flag={} error={}", ctx, flag, source);
                    SyncError::RemoteProtect {
                        recording_id: recording_id.clone(),
                        source,
                    }
                })?;
                log::info!("{} RECORDING_PROTECT flag={}", ctx, flag);
            }
            _ => {}
        }

        Ok(())
    }

    /// Persist a new live recording.
    pub fn create(&self, record: RecordingRecord, ctx: &LogContext) -> Result<Recording> {
        let mut recording = Recording::from_record(record);
        self.save(&mut recording, ctx)?;
        Ok(recording)
    }

    /// Load a recording and warm the shared cache for it.
    pub fn load(&self, id: i64, ctx: &LogContext) -> Result<Recording> {
        let recording = Recording::from_record(self.store.get(id)?);
        self.resolve_metadata(&recording, ctx);
        Ok(recording)
    }

    /// Insert or update the record. Pending metadata edits are pushed to the
    /// server before an update.
    pub fn save(&self, recording: &mut Recording, ctx: &LogContext) -> Result<()> {
        let now = self.clock.now().timestamp();

        match recording.record.id {
            None => {
                if recording.record.time_created == 0 {
                    recording.record.time_created = now;
                }
                recording.record.time_modified = now;
                let id = self.store.insert(&recording.record)?;
                recording.record.id = Some(id);
                log::info!(
                    "{} RECORDING_CREATED id={} instance={} imported={}",
                    ctx.with_recording(recording.recording_id()),
                    id,
                    recording.record.instance_id,
                    recording.record.imported
                );
            }
            Some(id) => {
                self.flush_metadata(recording, ctx)?;
                recording.record.time_modified = now;
                self.store.update(&recording.record)?;
                log::debug!(
                    "{} RECORDING_UPDATED id={}",
                    ctx.with_recording(recording.recording_id()),
                    id
                );
            }
        }
        Ok(())
    }

    fn flush_metadata(&self, recording: &mut Recording, ctx: &LogContext) -> Result<()> {
        if !recording.metadata_changed || recording.is_imported() {
            return Ok(());
        }

        let ctx = ctx.with_recording(recording.recording_id());
        let metadata = self.resolve_metadata(recording, &ctx);
        if !metadata.is_empty() {
            let recording_id = recording.recording_id();
            self.gateway
                .update_metadata(recording_id, &metadata)
                .map_err(|source| {
                    log::error!("{} METADATA_FLUSH_FAILED error={}", ctx, source);
                    SyncError::RemoteUpdate {
                        recording_id: recording_id.to_string(),
                        source,
                    }
                })?;
            log::info!("{} METADATA_FLUSH keys={}", ctx, metadata.len());
        }
        recording.metadata_changed = false;
        Ok(())
    }

    /// Delete a recording. Live recordings are deleted on the server first
    /// and their cache entry dropped.
    pub fn delete(&self, recording: &Recording, ctx: &LogContext) -> Result<()> {
        let ctx = ctx.with_recording(recording.recording_id());

        if recording.record.has_remote_id() && !recording.is_imported() {
            let recording_id = recording.recording_id();
            self.gateway.delete(recording_id).map_err(|source| {
                log::error!("{} RECORDING_DELETE_FAILED error={}", ctx, source);
                SyncError::RemoteDelete {
                    recording_id: recording_id.to_string(),
                    source,
                }
            })?;
            log::info!("{} RECORDING_DELETE_REMOTE", ctx);
            self.cache.invalidate(recording_id);
            log::debug!("{} CACHE_INVALIDATE", ctx);
        }

        if let Some(id) = recording.id() {
            self.store.delete(id)?;
            log::info!("{} RECORDING_DELETED id={}", ctx, id);
        }
        Ok(())
    }

    /// Copy a recording into another activity as a frozen, imported record.
    ///
    /// The copy is visible to all groups and never talks to the server
    /// again. The source is left untouched.
    pub fn create_imported_recording(
        &self,
        source: &Recording,
        target: &ActivityContext,
        ctx: &LogContext,
    ) -> Result<Recording> {
        let metadata = self.resolve_metadata(source, ctx);

        let mut record = source.record.clone();
        record.id = None;
        record.instance_id = target.instance_id;
        record.course_id = target.course_id;
        record.group_id = 0;
        record.imported_data = Value::Object(metadata).to_string();
        record.imported = true;
        record.headless = false;
        record.time_created = 0;

        let mut imported = Recording::from_record(record);
        self.save(&mut imported, ctx)?;

        log::info!(
            "{} RECORDING_IMPORTED source_id={:?} target_instance={} new_id={:?}",
            ctx.with_recording(source.recording_id()),
            source.id(),
            target.instance_id,
            imported.id()
        );
        Ok(imported)
    }
}

/// Decode the frozen snapshot of an imported recording.
///
/// Anything that is not a JSON object reads as no metadata.
fn decode_imported_data(imported_data: &str, ctx: &LogContext) -> MetadataSnapshot {
    if imported_data.trim().is_empty() {
        return MetadataSnapshot::new();
    }
    match serde_json::from_str::<Value>(imported_data) {
        Ok(Value::Object(metadata)) => {
            log::debug!("{} METADATA_IMPORTED_SNAPSHOT keys={}", ctx, metadata.len());
            metadata
        }
        Ok(Value::Null) => MetadataSnapshot::new(),
        Ok(other) => {
            log::warn!(
                "{} IMPORTED_DATA_INVALID reason=not_an_object value={}",
                ctx,
                other
            );
            MetadataSnapshot::new()
        }
        Err(e) => {
            log::warn!("{} IMPORTED_DATA_INVALID error={}", ctx, e);
            MetadataSnapshot::new()
        }
    }
}
