//! Configuration loading and validation.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::types::PomobarConfig;
use crate::errors::ConfigError;

/// Load the user configuration from `~/.pomobar/config.toml`.
///
/// # Errors
///
/// Returns an error on unreadable or invalid config. A missing file (or an
/// unresolvable home directory) is not an error; defaults apply.
pub fn load() -> Result<PomobarConfig, ConfigError> {
    let Some(home) = dirs::home_dir() else {
        debug!(event = "config.no_home_dir");
        return Ok(PomobarConfig::default());
    };
    let path = home.join(".pomobar").join("config.toml");

    let config = match load_file(&path) {
        Ok(config) => {
            debug!(event = "config.loaded", path = %path.display());
            config
        }
        Err(ConfigError::Io { source }) if source.kind() == std::io::ErrorKind::NotFound => {
            PomobarConfig::default()
        }
        Err(e) => return Err(e),
    };

    validate(&config)?;
    Ok(config)
}

/// Load a configuration file from the given path.
pub fn load_file(path: &Path) -> Result<PomobarConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        message: format!("'{}': {}", path.display(), e),
    })
}

fn validate(config: &PomobarConfig) -> Result<(), ConfigError> {
    if config.timer.work_secs == 0 {
        return Err(ConfigError::Invalid {
            message: "timer.work_secs must be greater than zero".to_string(),
        });
    }
    if config.timer.break_secs == 0 {
        return Err(ConfigError::Invalid {
            message: "timer.break_secs must be greater than zero".to_string(),
        });
    }
    Ok(())
}
