//! pomobar-daemon: IPC server and bootstrap client for the pomobar timer.
//!
//! One invocation of the CLI is one request. The [`client`] module decides
//! whether this process forwards the request to a server that is already
//! bound to the shared socket, becomes that server itself, or reports that
//! nothing is listening. The [`server`] module is the synchronous serving
//! loop that exclusively owns the timer state.

pub mod client;
pub mod errors;
pub mod protocol;
pub mod server;

pub use client::Outcome;
pub use errors::DaemonError;
pub use server::Server;
