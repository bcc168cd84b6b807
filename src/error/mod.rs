//! Error types for recording synchronization.
//!
//! Read paths degrade to stale or empty metadata and never surface these.
//! Remote writes and store operations do, each with a distinct variant so
//! the caller can report which action failed.

use thiserror::Error;

use crate::gateway::GatewayError;
use crate::storage::StoreError;

/// Errors raised by the recording synchronizer.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Pushing buffered metadata edits to the conferencing server failed.
    #[error("failed to update recording {recording_id}: {source}")]
    RemoteUpdate {
        recording_id: String,
        #[source]
        source: GatewayError,
    },

    /// Publishing or unpublishing a recording failed.
    #[error("failed to publish recording {recording_id}: {source}")]
    RemotePublish {
        recording_id: String,
        #[source]
        source: GatewayError,
    },

    /// Protecting or unprotecting a recording failed.
    #[error("failed to protect recording {recording_id}: {source}")]
    RemoteProtect {
        recording_id: String,
        #[source]
        source: GatewayError,
    },

    /// Deleting a recording on the conferencing server failed.
    #[error("failed to delete recording {recording_id}: {source}")]
    RemoteDelete {
        recording_id: String,
        #[source]
        source: GatewayError,
    },

    /// The local record store rejected an operation.
    #[error("record store error: {0}")]
    Store(#[from] StoreError),

    /// A value of the wrong shape was given to a field setter.
    #[error("invalid value for field {field}: expected {expected}")]
    InvalidValue {
        field: &'static str,
        expected: &'static str,
    },

    /// The field exists but cannot be changed through `set`.
    #[error("field {0} is read-only")]
    ReadOnlyField(&'static str),

    /// The recording has no remote identifier to act on.
    #[error("recording has no remote recording id")]
    MissingRecordingId,
}

/// Result type alias using [`SyncError`].
pub type Result<T> = std::result::Result<T, SyncError>;
