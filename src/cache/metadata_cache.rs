//! Recording metadata cache.
//!
//! Maps a remote recording id to its last known metadata snapshot and the
//! time it was stored. The cache has no eviction of its own: freshness is
//! checked by the synchronizer against the refresh period. Concurrent
//! writers to the same key are last-writer-wins.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::metadata::values::MetadataSnapshot;

/// A cached snapshot with the time it was stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedMetadata {
    pub metadata: MetadataSnapshot,
    pub timestamp: DateTime<Utc>,
}

impl CachedMetadata {
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.timestamp
    }

    /// Younger than the refresh period.
    pub fn is_fresh(&self, now: DateTime<Utc>, refresh_period: Duration) -> bool {
        self.age(now) < refresh_period
    }
}

/// Shared metadata cache, keyed by remote recording id.
///
/// Implementations may be process-local or backed by a distributed cache.
pub trait MetadataCache: Send + Sync {
    fn get(&self, recording_id: &str) -> Option<CachedMetadata>;

    fn put(&self, recording_id: &str, metadata: MetadataSnapshot, timestamp: DateTime<Utc>);

    fn invalidate(&self, recording_id: &str);
}

/// Process-local cache.
#[derive(Debug, Default)]
pub struct InMemoryMetadataCache {
    entries: RwLock<HashMap<String, CachedMetadata>>,
}

impl InMemoryMetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl MetadataCache for InMemoryMetadataCache {
    fn get(&self, recording_id: &str) -> Option<CachedMetadata> {
        self.entries.read().get(recording_id).cloned()
    }

    fn put(&self, recording_id: &str, metadata: MetadataSnapshot, timestamp: DateTime<Utc>) {
        self.entries.write().insert(
            recording_id.to_string(),
            CachedMetadata {
                metadata,
                timestamp,
            },
        );
    }

    fn invalidate(&self, recording_id: &str) {
        self.entries.write().remove(recording_id);
    }
}
