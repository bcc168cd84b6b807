//! Metadata cache module.
//!
//! Time-bounded snapshots of remote recording metadata, injected into the
//! synchronizer rather than held in a global.

pub mod metadata_cache;

pub use metadata_cache::*;
