//! Recording listing module.
//!
//! Assembles the recordings an activity shows: group visibility, the
//! recording set query and the playback inclusion policy.

pub mod playback;
pub mod query;
pub mod visibility;

pub use playback::*;
pub use query::*;
pub use visibility::*;
