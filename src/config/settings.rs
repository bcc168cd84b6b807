//! Synchronizer settings.

use serde::{Deserialize, Serialize};

use super::{default_refresh_period_secs, REFRESH_PERIOD_ENV};

/// Tunables for the recording synchronizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Maximum age of a cached metadata snapshot before a remote refresh.
    #[serde(default = "default_refresh_period_secs")]
    pub refresh_period_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            refresh_period_secs: default_refresh_period_secs(),
        }
    }
}

impl SyncConfig {
    pub fn new(refresh_period_secs: u64) -> Self {
        Self { refresh_period_secs }
    }

    /// Load from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(REFRESH_PERIOD_ENV).ok().as_deref())
    }

    fn from_env_value(raw: Option<&str>) -> Self {
        match raw {
            None => Self::default(),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) => {
                    log::info!("CONFIG_LOADED refresh_period_secs={}", secs);
                    Self::new(secs)
                }
                Err(e) => {
                    log::warn!(
                        "CONFIG_INVALID var={} value={:?} error={} using_default={}",
                        REFRESH_PERIOD_ENV,
                        raw,
                        e,
                        default_refresh_period_secs()
                    );
                    Self::default()
                }
            },
        }
    }

    pub fn refresh_period(&self) -> chrono::Duration {
        i64::try_from(self.refresh_period_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }
}
