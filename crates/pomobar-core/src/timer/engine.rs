//! Wall-clock interval state machine.
//!
//! The timer does not run its own clock. Every operation takes `now` as an
//! epoch-seconds timestamp supplied by the caller, so the state machine is
//! deterministic under test and only the serving loop ever reads the real
//! clock.
//!
//! ## Derived states
//!
//! ```text
//! Idle -> Working -> OnBreak -> BreakOver
//! ```
//!
//! The position in the cycle is never stored. It is recomputed from
//! `now - start_time` against the configured lengths on each query; the only
//! stored transition artifact is the one-time `break_ended_at` latch.

use crate::timer::errors::TimerError;

/// Derived position in the work/break cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No interval active.
    Idle,
    /// Working; `elapsed` seconds since the interval started.
    Working { elapsed: u64 },
    /// On break; `elapsed` seconds into the break.
    OnBreak { elapsed: u64 },
    /// The break is over. `ended_at` is the latched timestamp of the first
    /// tick that observed the cycle complete.
    BreakOver { ended_at: u64 },
}

/// The single mutable record of the running interval.
///
/// Exactly one instance exists per server process, owned exclusively by the
/// serving loop. Handlers mutate it through `&mut` access; there is no
/// ambient or shared-state path to it.
#[derive(Debug, Clone)]
pub struct TimerState {
    /// Epoch seconds of the last start; `None` means Idle.
    start_time: Option<u64>,
    /// Latched by the first tick observed past `work_length + break_length`,
    /// cleared whenever the timer is cleared or restarted.
    break_ended_at: Option<u64>,
    work_length: u64,
    break_length: u64,
    shutdown_requested: bool,
}

impl TimerState {
    pub fn new(work_length: u64, break_length: u64) -> Self {
        Self {
            start_time: None,
            break_ended_at: None,
            work_length,
            break_length,
            shutdown_requested: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn work_length(&self) -> u64 {
        self.work_length
    }

    pub fn break_length(&self) -> u64 {
        self.break_length
    }

    pub fn started_at(&self) -> Option<u64> {
        self.start_time
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }

    /// Derive the current phase from the wall clock.
    ///
    /// Read-only: a query that lands past the break end before any tick has
    /// latched `break_ended_at` reports `now` as the end timestamp.
    pub fn phase(&self, now: u64) -> Phase {
        let Some(started) = self.start_time else {
            return Phase::Idle;
        };
        let elapsed = now.saturating_sub(started);
        if elapsed <= self.work_length {
            Phase::Working { elapsed }
        } else if elapsed <= self.work_length + self.break_length {
            Phase::OnBreak {
                elapsed: elapsed - self.work_length,
            }
        } else {
            Phase::BreakOver {
                ended_at: self.break_ended_at.unwrap_or(now),
            }
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a work interval.
    ///
    /// Rejected while a work phase is still running; restarting from the
    /// break or break-over phases begins a fresh cycle.
    pub fn start(&mut self, now: u64) -> Result<(), TimerError> {
        if let Some(started) = self.start_time {
            let elapsed = now.saturating_sub(started);
            if elapsed <= self.work_length {
                return Err(TimerError::AlreadyRunning {
                    remaining_secs: self.work_length - elapsed,
                });
            }
        }
        self.start_time = Some(now);
        self.break_ended_at = None;
        Ok(())
    }

    /// Clear the interval. Always succeeds, from any phase.
    pub fn clear(&mut self) {
        self.start_time = None;
        self.break_ended_at = None;
    }

    /// Status tick: derive the phase and latch `break_ended_at` the first
    /// time the cycle is observed complete. The latch fires at most once per
    /// interval.
    pub fn tick(&mut self, now: u64) -> Phase {
        if let Some(started) = self.start_time
            && now.saturating_sub(started) > self.work_length + self.break_length
            && self.break_ended_at.is_none()
        {
            self.break_ended_at = Some(now);
        }
        self.phase(now)
    }

    /// Mark the serving loop for termination after the current reply.
    pub fn request_shutdown(&mut self) {
        self.shutdown_requested = true;
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(super::DEFAULT_WORK_SECS, super::DEFAULT_BREAK_SECS)
    }
}
