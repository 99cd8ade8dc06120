use serde::{Deserialize, Serialize};

use pomobar_core::timer::{Status, StyleClass};

/// Client -> server request kinds.
///
/// Each variant maps to a JSONL message with `"type"` as the tag field.
/// Requests carry no payload: the server derives everything else from its
/// own state and the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Bounded-wait liveness probe. Never mutates timer state.
    PresenceCheck,
    /// Status tick: recompute the bar status from wall-clock time.
    Update,
    /// Start a work interval.
    StartTimer,
    /// Clear the running interval.
    ClearTimer,
    /// Stop the serving loop. The reply is sent before the loop exits.
    Shutdown,
    /// Become the server when none is bound. A server that already runs
    /// answers it like a presence check.
    StartServer,
}

/// Server -> client replies. Exactly one per request, even for requests the
/// server does not recognize -- a lockstep caller must never be left
/// waiting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    Success,
    Error {
        code: String,
        message: String,
    },
    Status {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        class: Option<StyleClass>,
    },
}

impl Reply {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Reply::Error {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<Status> for Reply {
    fn from(status: Status) -> Self {
        Reply::Status {
            text: status.text,
            class: status.class,
        }
    }
}
