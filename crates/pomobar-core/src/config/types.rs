//! Configuration type definitions.
//!
//! These types are serialized/deserialized from the TOML config file.

use serde::{Deserialize, Serialize};

/// Main configuration loaded from `~/.pomobar/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PomobarConfig {
    /// Interval lengths.
    #[serde(default)]
    pub timer: TimerConfig,
}

/// Interval length configuration.
///
/// Lengths are fixed for the lifetime of a server process: the serving loop
/// reads them once at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Length of the work interval in seconds. Default: 1500 (25 minutes).
    #[serde(default = "super::defaults::default_work_secs")]
    pub work_secs: u64,

    /// Length of the break that follows, in seconds. Default: 300 (5 minutes).
    #[serde(default = "super::defaults::default_break_secs")]
    pub break_secs: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_secs: super::defaults::default_work_secs(),
            break_secs: super::defaults::default_break_secs(),
        }
    }
}
