//! Built-in fallback values for the config file.

use crate::timer::{DEFAULT_BREAK_SECS, DEFAULT_WORK_SECS};

pub fn default_work_secs() -> u64 {
    DEFAULT_WORK_SECS
}

pub fn default_break_secs() -> u64 {
    DEFAULT_BREAK_SECS
}
