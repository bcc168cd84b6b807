//! BigBlueButton recordings core - metadata synchronization and caching
//!
//! This crate keeps locally persisted recording records in step with the
//! conferencing server that owns their metadata. The implementation
//! prioritizes:
//!
//! 1. **Cheap reads** - Remote metadata is served from a shared cache and
//!    refreshed at most once per refresh period
//! 2. **Edit safety** - Pending local edits are never clobbered by a refresh
//! 3. **Logging** - Every remote call and cache decision logged with context
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `sync` - Recording entity and the synchronizer (core algorithm)
//! - `cache` - Shared metadata cache keyed by remote recording id
//! - `gateway` - Remote conferencing server seam
//! - `metadata` - Mirrored field table, alias resolution and wire values
//! - `listing` - Recording set query, group visibility, playback policy
//! - `storage` - Record model, query builders and the record store seam
//! - `config` - Refresh period configuration
//! - `logging` - Structured logging with request context

pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod listing;
pub mod logging;
pub mod metadata;
pub mod storage;
pub mod sync;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::{CachedMetadata, InMemoryMetadataCache, MetadataCache};
pub use config::SyncConfig;
pub use error::{Result, SyncError};
pub use gateway::{GatewayError, RemoteGateway};
pub use listing::{visible_playbacks, Actor, RecordingSet};
pub use metadata::{FieldValue, MetadataSnapshot, MirroredField, Playback};
pub use storage::{
    ImportMode, InMemoryRecordingStore, RecordingRecord, RecordingStatus, RecordingStore,
    StoreError,
};
pub use sync::{
    ActivityContext, Clock, InstanceType, Recording, RecordingField, RecordingSynchronizer,
    RequestContext, SystemClock,
};

/// Initialize the process-wide logger. Safe to call more than once.
pub fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_millis()
        .try_init();
}
