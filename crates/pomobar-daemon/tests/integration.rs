//! End-to-end tests driving a real server over a real Unix socket.
//!
//! Each test binds its own socket in a fresh temp directory so tests can run
//! in parallel without colliding on the well-known path.

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use pomobar_core::timer::{StyleClass, TimerState};
use pomobar_daemon::client::{self, Outcome};
use pomobar_daemon::errors::DaemonError;
use pomobar_daemon::protocol::messages::{Reply, Request};
use pomobar_daemon::server::Server;

fn temp_socket() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timer.sock");
    (dir, path)
}

fn spawn_server(path: &Path) -> thread::JoinHandle<()> {
    let path = path.to_path_buf();
    thread::spawn(move || {
        Server::new(TimerState::new(1500, 300))
            .run(&path)
            .expect("server run failed");
    })
}

fn wait_for_socket(path: &Path) {
    // Generous: a bootstrap invocation waits out its presence window
    // (up to 2.5s) before it binds.
    for _ in 0..500 {
        if path.exists() {
            return;
        }
        thread::sleep(Duration::from_millis(10));
    }
    panic!("server socket never appeared at {}", path.display());
}

#[test]
fn full_timer_cycle_over_the_socket() {
    let (_dir, path) = temp_socket();
    let handle = spawn_server(&path);
    wait_for_socket(&path);

    assert!(client::wait_for_presence(&path, Duration::from_secs(2)));

    // Start, then immediately try to start again
    assert_eq!(
        client::forward(Request::StartTimer, &path).unwrap(),
        Reply::Success
    );
    let reply = client::forward(Request::StartTimer, &path).unwrap();
    let Reply::Error { code, .. } = reply else {
        panic!("second start must be rejected, got {:?}", reply);
    };
    assert_eq!(code, "already_running");

    // A tick right after the start is at the very beginning of the work phase
    let reply = client::forward(Request::Update, &path).unwrap();
    let Reply::Status { text, class } = reply else {
        panic!("update must return a status");
    };
    assert!(text.contains("/25min 0s"), "got: {:?}", text);
    assert_eq!(class, Some(StyleClass::Percent(0)));

    // Clear brings the status back to idle
    assert_eq!(
        client::forward(Request::ClearTimer, &path).unwrap(),
        Reply::Success
    );
    let reply = client::forward(Request::Update, &path).unwrap();
    let Reply::Status { text, class } = reply else {
        panic!("update must return a status");
    };
    assert!(text.contains("Click to start timer"));
    assert_eq!(class, None);

    // Shutdown still gets its reply, then the loop exits and unbinds
    assert_eq!(
        client::forward(Request::Shutdown, &path).unwrap(),
        Reply::Success
    );
    handle.join().unwrap();
    assert!(!path.exists(), "socket must be released on shutdown");
}

#[test]
fn unrecognized_request_gets_an_error_reply() {
    let (_dir, path) = temp_socket();
    let handle = spawn_server(&path);
    wait_for_socket(&path);

    // Speak the transport by hand with a request kind the server never heard of
    let mut stream = UnixStream::connect(&path).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    writeln!(stream, r#"{{"type":"frobnicate"}}"#).unwrap();
    stream.flush().unwrap();

    let mut line = String::new();
    let mut reader = BufReader::new(&stream);
    reader.read_line(&mut line).unwrap();
    let reply: Reply = serde_json::from_str(&line).unwrap();
    let Reply::Error { code, .. } = reply else {
        panic!("unknown request must yield an error reply, got {:?}", reply);
    };
    assert_eq!(code, "unknown_request");

    assert_eq!(
        client::forward(Request::Shutdown, &path).unwrap(),
        Reply::Success
    );
    handle.join().unwrap();
}

#[test]
fn second_bind_attempt_reports_already_bound() {
    let (_dir, path) = temp_socket();
    let handle = spawn_server(&path);
    wait_for_socket(&path);

    let result = Server::new(TimerState::new(1500, 300)).run(&path);
    assert!(matches!(result, Err(DaemonError::AlreadyBound { .. })));

    assert_eq!(
        client::forward(Request::Shutdown, &path).unwrap(),
        Reply::Success
    );
    handle.join().unwrap();
}

#[test]
fn stale_socket_file_is_recovered() {
    let (_dir, path) = temp_socket();

    // A crashed server leaves its socket file behind: bind and drop the
    // listener without unlinking.
    let listener = UnixListener::bind(&path).unwrap();
    drop(listener);
    assert!(path.exists());

    let handle = spawn_server(&path);
    assert!(client::wait_for_presence(&path, Duration::from_secs(2)));

    assert_eq!(
        client::forward(Request::Shutdown, &path).unwrap(),
        Reply::Success
    );
    handle.join().unwrap();
}

#[test]
fn bootstrap_start_server_becomes_the_server() {
    let (_dir, path) = temp_socket();

    // A start-server invocation with nothing listening becomes the server
    // and blocks until shutdown.
    let bootstrap_path = path.clone();
    let handle = thread::spawn(move || {
        client::dispatch(
            Request::StartServer,
            TimerState::new(1500, 300),
            &bootstrap_path,
        )
        .unwrap()
    });

    wait_for_socket(&path);
    assert!(client::wait_for_presence(&path, Duration::from_secs(2)));
    assert_eq!(
        client::forward(Request::StartTimer, &path).unwrap(),
        Reply::Success
    );
    assert_eq!(
        client::forward(Request::Shutdown, &path).unwrap(),
        Reply::Success
    );

    let outcome = handle.join().unwrap();
    assert!(matches!(outcome, Outcome::Served));
}

#[test]
fn bootstrap_forwards_start_server_to_a_live_server() {
    let (_dir, path) = temp_socket();
    let handle = spawn_server(&path);
    wait_for_socket(&path);

    // An explicit start against a live server is harmless
    let outcome = client::dispatch(
        Request::StartServer,
        TimerState::new(1500, 300),
        &path,
    )
    .unwrap();
    assert!(matches!(outcome, Outcome::Reply(Reply::Success)));

    assert_eq!(
        client::forward(Request::Shutdown, &path).unwrap(),
        Reply::Success
    );
    handle.join().unwrap();
}
