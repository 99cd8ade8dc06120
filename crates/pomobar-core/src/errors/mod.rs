use std::error::Error;

/// Base trait for all application errors
pub trait PomobarError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling; doubles as the wire error code
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config file: {message}")]
    Parse { message: String },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("IO error reading config: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl PomobarError for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::Parse { .. } => "config_parse_error",
            ConfigError::Invalid { .. } => "config_invalid",
            ConfigError::Io { .. } => "config_io_error",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ConfigError::Parse { .. } | ConfigError::Invalid { .. }
        )
    }
}
