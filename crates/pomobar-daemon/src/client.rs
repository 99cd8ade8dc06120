//! Client side of the bootstrap protocol.
//!
//! Every CLI invocation is self-sufficient: probe for a live server within a
//! jittered window, then either forward the request to it, become the server
//! (only for an explicit start-server request), or report that nothing is
//! listening. Callers never need to know whether a server was already
//! running.

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info};

use pomobar_core::timer::TimerState;

use crate::errors::DaemonError;
use crate::protocol::messages::{Reply, Request};
use crate::server::Server;

/// Base wait for a presence reply before concluding no server is up.
const PRESENCE_BASE_WAIT: Duration = Duration::from_millis(500);
/// Upper bound of the random extra wait added to the base.
const PRESENCE_MAX_JITTER_MS: u64 = 2000;
/// Pause between connect attempts within the presence window.
const PRESENCE_RETRY_DELAY: Duration = Duration::from_millis(50);
/// Read deadline for a forwarded exchange against a live server, so a
/// server that died after its presence reply surfaces as unreachable
/// instead of blocking this invocation forever.
const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(5);
const WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// What a bootstrap invocation resolved to.
#[derive(Debug)]
pub enum Outcome {
    /// A server answered the forwarded request.
    Reply(Reply),
    /// No server is listening and the request was not a start request.
    NoServer,
    /// This invocation became the server and has served until shutdown.
    Served,
    /// A server answered the presence check but not the forwarded request.
    Unreachable,
}

/// Run one request through the bootstrap protocol.
pub fn dispatch(
    request: Request,
    state: TimerState,
    socket_path: &Path,
) -> Result<Outcome, DaemonError> {
    bootstrap(request, state, socket_path, presence_window())
}

fn bootstrap(
    request: Request,
    state: TimerState,
    socket_path: &Path,
    window: Duration,
) -> Result<Outcome, DaemonError> {
    if wait_for_presence(socket_path, window) {
        return match forward(request, socket_path) {
            Ok(reply) => Ok(Outcome::Reply(reply)),
            Err(DaemonError::ExchangeTimedOut) => Ok(Outcome::Unreachable),
            // The server went away between the presence reply and our
            // exchange
            Err(DaemonError::NotRunning { .. }) => Ok(Outcome::NoServer),
            Err(e) => Err(e),
        };
    }

    if request != Request::StartServer {
        info!(event = "client.no_server", request = ?request);
        return Ok(Outcome::NoServer);
    }

    info!(event = "client.becoming_server");
    match Server::new(state).run(socket_path) {
        Ok(()) => Ok(Outcome::Served),
        // Lost the bind race: another invocation became the server between
        // our presence check and our bind. Forward like any other client.
        Err(DaemonError::AlreadyBound { .. }) => {
            debug!(event = "client.lost_bind_race");
            forward(request, socket_path).map(Outcome::Reply)
        }
        Err(e) => Err(e),
    }
}

/// 500ms plus uniform random jitter up to 2s.
///
/// Simultaneous invocations (a poll tick racing a click) each wait a
/// different amount before concluding "no server", so the first one to bind
/// is observed by the rest instead of every loser spawning its own server.
fn presence_window() -> Duration {
    PRESENCE_BASE_WAIT
        + Duration::from_millis(rand::thread_rng().gen_range(0..=PRESENCE_MAX_JITTER_MS))
}

/// Probe for a live server until one replies or the window expires.
///
/// The presence reply itself is discarded; the real request goes out on a
/// fresh exchange.
pub fn wait_for_presence(socket_path: &Path, window: Duration) -> bool {
    let deadline = Instant::now() + window;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return false;
        }
        match exchange(Request::PresenceCheck, socket_path, remaining) {
            Ok(_) => return true,
            Err(e) => {
                debug!(event = "client.presence_probe_failed", error = %e);
            }
        }
        std::thread::sleep(PRESENCE_RETRY_DELAY.min(remaining));
    }
}

/// One lockstep exchange against a server believed to be live.
pub fn forward(request: Request, socket_path: &Path) -> Result<Reply, DaemonError> {
    match exchange(request, socket_path, EXCHANGE_TIMEOUT) {
        Ok(reply) => Ok(reply),
        Err(DaemonError::Io(e))
            if matches!(
                e.kind(),
                std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
            ) =>
        {
            Err(DaemonError::ExchangeTimedOut)
        }
        Err(e) => Err(e),
    }
}

/// Connect, send one request line, await one reply line.
fn exchange(
    request: Request,
    socket_path: &Path,
    read_timeout: Duration,
) -> Result<Reply, DaemonError> {
    let mut stream = connect(socket_path, read_timeout)?;

    writeln!(stream, "{}", serde_json::to_string(&request)?)?;
    stream.flush()?;

    let mut line = String::new();
    let mut reader = BufReader::new(&stream);
    reader.read_line(&mut line)?;

    if line.is_empty() {
        return Err(DaemonError::protocol("empty reply from server"));
    }
    serde_json::from_str(&line)
        .map_err(|e| DaemonError::protocol(format!("invalid reply: {}", e)))
}

fn connect(socket_path: &Path, read_timeout: Duration) -> Result<UnixStream, DaemonError> {
    let stream = UnixStream::connect(socket_path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::ConnectionRefused => {
            DaemonError::NotRunning {
                path: socket_path.display().to_string(),
            }
        }
        _ => DaemonError::Io(e),
    })?;

    // A zero timeout would mean "block forever", the opposite of a spent
    // window.
    stream.set_read_timeout(Some(read_timeout.max(Duration::from_millis(1))))?;
    stream.set_write_timeout(Some(WRITE_TIMEOUT))?;

    Ok(stream)
}
