//! # Configuration System
//!
//! TOML configuration for the pomobar timer, loaded from
//! `~/.pomobar/config.toml`. A missing file is not an error; built-in
//! defaults apply.
//!
//! ## Example
//!
//! ```toml
//! # ~/.pomobar/config.toml
//! [timer]
//! work_secs = 1500
//! break_secs = 300
//! ```

pub mod defaults;
pub mod loading;
pub mod types;

// Public API exports
pub use types::{PomobarConfig, TimerConfig};

impl PomobarConfig {
    /// Load the user configuration, falling back to defaults when no config
    /// file exists.
    ///
    /// See [`loading::load`] for details.
    pub fn load() -> Result<Self, crate::errors::ConfigError> {
        loading::load()
    }
}
