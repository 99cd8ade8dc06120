//! Wire protocol between the CLI invocations and the timer server.
//!
//! One JSON object per line in each direction, exactly one reply per
//! request.

pub mod messages;

use std::path::PathBuf;

use crate::errors::DaemonError;

/// Well-known endpoint every invocation agrees on.
///
/// Binding this path is the real mutual exclusion between racing
/// invocations: whichever process binds first is the server.
pub fn default_socket_path() -> Result<PathBuf, DaemonError> {
    let home = dirs::home_dir().ok_or(DaemonError::NoHomeDir)?;
    Ok(home.join(".pomobar").join("timer.sock"))
}
