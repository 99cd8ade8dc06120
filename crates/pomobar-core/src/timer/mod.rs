//! Work/break interval tracking.
//!
//! [`TimerState`] is the single mutable record of the running interval;
//! [`Phase`] is the position in the cycle derived from it on every query.
//! [`status`] turns a phase into the JSON payload the bar renders.

pub mod engine;
pub mod errors;
pub mod status;

pub use engine::{Phase, TimerState};
pub use errors::TimerError;
pub use status::{Status, StyleClass};

/// Default work interval length in seconds (25 minutes).
pub const DEFAULT_WORK_SECS: u64 = 25 * 60;

/// Default break length in seconds (5 minutes).
pub const DEFAULT_BREAK_SECS: u64 = 5 * 60;
