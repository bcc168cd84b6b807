//! Recording metadata module.
//!
//! Typed access to remote metadata snapshots through the mirrored field
//! alias table.

pub mod fields;
pub mod playback;
pub mod values;

pub use fields::*;
pub use playback::*;
pub use values::*;
