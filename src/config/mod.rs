//! Configuration for the synchronizer.

pub mod settings;

pub use settings::SyncConfig;

/// Default refresh period for cached recording metadata (5 minutes).
pub const RECORDING_REFRESH_DEFAULT_PERIOD: u64 = 300;

/// Environment variable overriding the refresh period, in seconds.
pub const REFRESH_PERIOD_ENV: &str = "BBB_RECORDING_REFRESH_PERIOD";

pub(crate) fn default_refresh_period_secs() -> u64 {
    RECORDING_REFRESH_DEFAULT_PERIOD
}
