//! Process exit codes.

use crate::core::runner::Outcome;
use crate::core::termination::StopReason;
use crate::error::SessionError;

pub mod codes {
    /// Replay finished cleanly.
    pub const SUCCESS: i32 = 0;
    /// A live capture stopped, for any reason other than a read error.
    pub const CAPTURE_ENDED: i32 = 1;
    /// No usable device, or a bad replay file.
    pub const USAGE: i32 = 2;
    pub const READ_ERROR: i32 = 3;
    pub const SOURCE_OPEN: i32 = 4;
    pub const DUMP_ERROR: i32 = 5;
    pub const OUTPUT_ERROR: i32 = 6;
    pub const SIGNAL_ERROR: i32 = 7;
}

pub fn outcome_code(outcome: &Outcome) -> i32 {
    match (outcome.live, outcome.reason) {
        (_, StopReason::ReadError) => codes::READ_ERROR,
        (false, _) => codes::SUCCESS,
        (true, _) => codes::CAPTURE_ENDED,
    }
}

pub fn error_code(error: &SessionError) -> i32 {
    match error {
        SessionError::NoDevices
        | SessionError::DeviceList(_)
        | SessionError::ReplayOpen { .. }
        | SessionError::Filter { .. } => codes::USAGE,
        SessionError::SourceOpen { .. } => codes::SOURCE_OPEN,
        SessionError::DumpOpen { .. } | SessionError::DumpWrite(_) => codes::DUMP_ERROR,
        SessionError::Output(_) => codes::OUTPUT_ERROR,
        SessionError::Signal(_) => codes::SIGNAL_ERROR,
    }
}
