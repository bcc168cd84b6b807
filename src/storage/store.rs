//! Record store seam.
//!
//! Persistence itself belongs to the host. The synchronizer talks to it
//! through `RecordingStore`; `InMemoryRecordingStore` backs tests and
//! embedded use.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use thiserror::Error;

use crate::storage::models::RecordingRecord;
use crate::storage::queries::RecordingQuery;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("recording {0} not found")]
    NotFound(i64),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Persistence for recording rows.
pub trait RecordingStore: Send + Sync {
    fn get(&self, id: i64) -> Result<RecordingRecord, StoreError>;

    /// Insert a record that has no id yet, returning the assigned id.
    fn insert(&self, record: &RecordingRecord) -> Result<i64, StoreError>;

    fn update(&self, record: &RecordingRecord) -> Result<(), StoreError>;

    fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Records matching `query`, ordered by creation time then id.
    fn find(&self, query: &RecordingQuery) -> Result<Vec<RecordingRecord>, StoreError>;
}

#[derive(Debug, Default)]
struct StoreState {
    records: BTreeMap<i64, RecordingRecord>,
    last_id: i64,
}

/// Thread-safe in-process record store.
#[derive(Debug, Default)]
pub struct InMemoryRecordingStore {
    state: Mutex<StoreState>,
}

impl InMemoryRecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().records.is_empty()
    }
}

impl RecordingStore for InMemoryRecordingStore {
    fn get(&self, id: i64) -> Result<RecordingRecord, StoreError> {
        self.state
            .lock()
            .records
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn insert(&self, record: &RecordingRecord) -> Result<i64, StoreError> {
        if let Some(id) = record.id {
            return Err(StoreError::Conflict(format!("recording {} already persisted", id)));
        }
        let mut state = self.state.lock();
        state.last_id += 1;
        let id = state.last_id;
        let mut stored = record.clone();
        stored.id = Some(id);
        state.records.insert(id, stored);
        Ok(id)
    }

    fn update(&self, record: &RecordingRecord) -> Result<(), StoreError> {
        let id = record
            .id
            .ok_or_else(|| StoreError::Conflict("cannot update a record without id".to_string()))?;
        let mut state = self.state.lock();
        match state.records.get_mut(&id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.state
            .lock()
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    fn find(&self, query: &RecordingQuery) -> Result<Vec<RecordingRecord>, StoreError> {
        let mut found: Vec<RecordingRecord> = self
            .state
            .lock()
            .records
            .values()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        found.sort_by_key(|r| (r.time_created, r.id));
        Ok(found)
    }
}
