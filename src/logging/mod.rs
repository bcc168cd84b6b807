//! Structured logging with request context.
//!
//! Every log line carries the request_id and, when known, the remote
//! recording id for easy correlation.

pub mod structured;

pub use structured::*;
