use crate::errors::PomobarError;

#[derive(Debug, thiserror::Error)]
pub enum TimerError {
    #[error("A work interval is already running ({remaining_secs}s left)")]
    AlreadyRunning { remaining_secs: u64 },
}

impl PomobarError for TimerError {
    fn error_code(&self) -> &'static str {
        match self {
            TimerError::AlreadyRunning { .. } => "already_running",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}
