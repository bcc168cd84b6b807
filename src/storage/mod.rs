//! Storage module.
//!
//! Recording rows, the record store seam and query builders.
//! Mirrored metadata never reaches this layer.

pub mod models;
pub mod queries;
pub mod store;

pub use models::*;
pub use queries::*;
pub use store::*;
