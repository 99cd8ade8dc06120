use clap::ArgMatches;
use tracing::warn;

use pomobar_core::PomobarConfig;
use pomobar_core::timer::{Status, TimerState};
use pomobar_daemon::client::{self, Outcome};
use pomobar_daemon::protocol;
use pomobar_daemon::protocol::messages::{Reply, Request};

/// Map the invoked subcommand to a request, run it through the bootstrap
/// protocol and print the result. Returns the process exit code.
pub fn run_command(matches: &ArgMatches) -> Result<i32, Box<dyn std::error::Error>> {
    let request = request_for(matches);

    let config = PomobarConfig::load()?;
    let state = TimerState::new(config.timer.work_secs, config.timer.break_secs);
    let socket_path = protocol::default_socket_path()?;

    let outcome = client::dispatch(request, state, &socket_path)?;
    print_outcome(request, outcome)
}

fn request_for(matches: &ArgMatches) -> Request {
    match matches.subcommand() {
        Some(("status", _)) => Request::Update,
        Some(("start", _)) => Request::StartTimer,
        Some(("clear", _)) => Request::ClearTimer,
        Some(("shutdown", _)) => Request::Shutdown,
        Some(("serve", _)) => Request::StartServer,
        _ => unreachable!("subcommand is required by the CLI definition"),
    }
}

/// Print what the bar host expects: status JSON for the poll tick, reply
/// tokens for everything else. Transport failures on the status path become
/// fixed status payloads so the bar never renders a raw fault.
fn print_outcome(request: Request, outcome: Outcome) -> Result<i32, Box<dyn std::error::Error>> {
    match outcome {
        Outcome::Served => Ok(0),
        Outcome::Reply(Reply::Status { text, class }) => {
            println!("{}", serde_json::to_string(&Status { text, class })?);
            Ok(0)
        }
        Outcome::Reply(Reply::Success) => {
            println!("SUCCESS");
            Ok(0)
        }
        Outcome::Reply(Reply::Error { code, message }) => {
            warn!(event = "cli.request_rejected", code = %code, message = %message);
            println!("ERROR");
            Ok(1)
        }
        Outcome::NoServer => {
            if request == Request::Update {
                println!("{}", serde_json::to_string(&Status::server_down())?);
                Ok(0)
            } else {
                eprintln!("pomobar: no timer server is running (start one with 'pomobar serve')");
                Ok(1)
            }
        }
        Outcome::Unreachable => {
            if request == Request::Update {
                println!("{}", serde_json::to_string(&Status::unreachable())?);
                Ok(0)
            } else {
                eprintln!("pomobar: timer server stopped responding");
                Ok(1)
            }
        }
    }
}
