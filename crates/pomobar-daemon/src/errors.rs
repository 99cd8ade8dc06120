use std::fmt;

use pomobar_core::errors::PomobarError;

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Endpoint already bound at '{path}'")]
    AlreadyBound { path: String },

    #[error("No server is listening at '{path}'")]
    NotRunning { path: String },

    #[error("Server stopped responding mid-exchange")]
    ExchangeTimedOut,

    #[error("Protocol error: {message}")]
    Protocol { message: String },

    #[error("Home directory not found - $HOME not set")]
    NoHomeDir,
}

impl DaemonError {
    pub fn protocol(msg: impl fmt::Display) -> Self {
        Self::Protocol {
            message: msg.to_string(),
        }
    }
}

impl PomobarError for DaemonError {
    fn error_code(&self) -> &'static str {
        match self {
            DaemonError::Io(_) => "daemon_io_error",
            DaemonError::Serde(_) => "daemon_serde_error",
            DaemonError::AlreadyBound { .. } => "daemon_already_bound",
            DaemonError::NotRunning { .. } => "daemon_not_running",
            DaemonError::ExchangeTimedOut => "daemon_unreachable",
            DaemonError::Protocol { .. } => "daemon_protocol_error",
            DaemonError::NoHomeDir => "daemon_no_home_dir",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, DaemonError::NotRunning { .. })
    }
}
