//! Recording synchronization module.
//!
//! The recording entity and the synchronizer that reconciles it with the
//! conferencing server through the shared metadata cache.

pub mod clock;
pub mod context;
pub mod recording;
pub mod synchronizer;

pub use clock::*;
pub use context::*;
pub use recording::*;
pub use synchronizer::*;
