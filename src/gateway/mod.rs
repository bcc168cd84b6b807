//! Remote metadata gateway.
//!
//! The conferencing server's recording API, seen through the narrow set of
//! calls the synchronizer needs. Calls are blocking and carry no retry
//! policy; timeouts and retries belong to the implementation.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::metadata::values::MetadataSnapshot;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The server could not be reached or did not answer in time.
    #[error("conferencing server unavailable: {0}")]
    Unavailable(String),

    #[error("recording {0} not found on the server")]
    NotFound(String),

    /// The server answered with a failure.
    #[error("server rejected request ({code}): {message}")]
    Rejected { code: String, message: String },
}

/// Recording metadata operations on the conferencing server.
pub trait RemoteGateway: Send + Sync {
    /// Batched fetch. A missing key means the recording is unknown remotely.
    fn fetch_metadata(
        &self,
        recording_ids: &HashSet<String>,
    ) -> Result<HashMap<String, MetadataSnapshot>, GatewayError>;

    /// Replace the remote metadata of one recording.
    fn update_metadata(
        &self,
        recording_id: &str,
        metadata: &MetadataSnapshot,
    ) -> Result<(), GatewayError>;

    fn publish(&self, recording_id: &str, flag: bool) -> Result<(), GatewayError>;

    fn protect(&self, recording_id: &str, flag: bool) -> Result<(), GatewayError>;

    fn delete(&self, recording_id: &str) -> Result<(), GatewayError>;
}
