//! Synchronous serving loop that owns the timer state.
//!
//! Strictly single-threaded: accept a connection, read one request line,
//! dispatch it against the owned [`TimerState`], write one reply line, drop
//! the connection, repeat. There is never more than one exchange in flight,
//! so no locking is needed anywhere.

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use pomobar_core::errors::PomobarError;
use pomobar_core::timer::{status, TimerState};

use crate::errors::DaemonError;
use crate::protocol::messages::{Reply, Request};

/// Read deadline for a single accepted exchange, so one stalled client
/// cannot wedge the loop.
const SERVE_READ_TIMEOUT: Duration = Duration::from_secs(5);
const SERVE_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// The timer server: exclusive owner of one [`TimerState`].
pub struct Server {
    state: TimerState,
}

impl Server {
    pub fn new(state: TimerState) -> Self {
        Self { state }
    }

    /// Bind the shared endpoint and serve until a shutdown request.
    ///
    /// Binding is the mutual exclusion between racing invocations: when the
    /// address is held by a live server this returns
    /// [`DaemonError::AlreadyBound`] and the caller falls back to forwarding
    /// its request like any other client.
    pub fn run(mut self, socket_path: &Path) -> Result<(), DaemonError> {
        let listener = bind(socket_path)?;
        info!(
            event = "daemon.server.started",
            path = %socket_path.display(),
            work_secs = self.state.work_length(),
            break_secs = self.state.break_length(),
        );

        while !self.state.shutdown_requested() {
            let stream = match listener.accept() {
                Ok((stream, _)) => stream,
                Err(e) => {
                    warn!(event = "daemon.server.accept_failed", error = %e);
                    continue;
                }
            };
            if let Err(e) = self.serve_connection(stream) {
                warn!(event = "daemon.server.exchange_failed", error = %e);
            }
        }

        drop(listener);
        if let Err(e) = std::fs::remove_file(socket_path) {
            warn!(event = "daemon.server.unlink_failed", error = %e);
        }
        info!(event = "daemon.server.stopped");
        Ok(())
    }

    /// Serve exactly one request/reply exchange on an accepted connection.
    ///
    /// An unparseable request still gets a reply: a lockstep caller would
    /// otherwise block forever on a dropped exchange.
    fn serve_connection(&mut self, mut stream: UnixStream) -> Result<(), DaemonError> {
        stream.set_read_timeout(Some(SERVE_READ_TIMEOUT))?;
        stream.set_write_timeout(Some(SERVE_WRITE_TIMEOUT))?;

        let mut line = String::new();
        {
            let mut reader = BufReader::new(&stream);
            reader.read_line(&mut line)?;
        }
        if line.trim().is_empty() {
            debug!(event = "daemon.connection.empty");
            return Ok(());
        }

        let reply = match serde_json::from_str::<Request>(&line) {
            Ok(request) => {
                debug!(event = "daemon.request.received", request = ?request);
                self.dispatch(request)
            }
            Err(e) => {
                warn!(event = "daemon.request.unrecognized", error = %e);
                Reply::error("unknown_request", format!("unrecognized request: {}", e))
            }
        };

        writeln!(stream, "{}", serde_json::to_string(&reply)?)?;
        stream.flush()?;
        Ok(())
    }

    /// Exhaustive dispatch over the request kinds.
    fn dispatch(&mut self, request: Request) -> Reply {
        let now = unix_now();
        match request {
            Request::PresenceCheck => Reply::Success,
            // Already serving; answering success makes an explicit start
            // against a live server harmless.
            Request::StartServer => Reply::Success,
            Request::Shutdown => {
                info!(event = "daemon.shutdown_requested");
                self.state.request_shutdown();
                Reply::Success
            }
            Request::StartTimer => match self.state.start(now) {
                Ok(()) => {
                    info!(event = "daemon.timer_started", at = now);
                    Reply::Success
                }
                Err(e) => {
                    debug!(event = "daemon.timer_start_rejected", error = %e);
                    Reply::error(e.error_code(), e.to_string())
                }
            },
            Request::ClearTimer => {
                info!(event = "daemon.timer_cleared");
                self.state.clear();
                Reply::Success
            }
            Request::Update => {
                let phase = self.state.tick(now);
                status::render(&self.state, phase, now).into()
            }
        }
    }
}

/// Bind the well-known socket, recovering from a leftover file.
///
/// A live server answers a probe connection on the path; a stale file from a
/// crashed server refuses it and is safe to remove.
fn bind(socket_path: &Path) -> Result<UnixListener, DaemonError> {
    if let Some(parent) = socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    match UnixListener::bind(socket_path) {
        Ok(listener) => Ok(listener),
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            if UnixStream::connect(socket_path).is_ok() {
                return Err(DaemonError::AlreadyBound {
                    path: socket_path.display().to_string(),
                });
            }
            warn!(
                event = "daemon.server.stale_socket_removed",
                path = %socket_path.display(),
            );
            std::fs::remove_file(socket_path)?;
            match UnixListener::bind(socket_path) {
                Ok(listener) => Ok(listener),
                // Lost the re-bind race as well: someone else is the server.
                Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                    Err(DaemonError::AlreadyBound {
                        path: socket_path.display().to_string(),
                    })
                }
                Err(e) => Err(e.into()),
            }
        }
        Err(e) => Err(e.into()),
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
