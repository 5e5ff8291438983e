//! The stop latch shared by the capture loop, the interrupt handler and the
//! timeout timer.
//!
//! Any of the three may ask to stop; the first request wins and fixes the
//! [`StopReason`]. Closing the capture handle and dump file is a separate
//! gate that lets the close sequence run at most once no matter how many
//! paths reach it.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    CountExhausted,
    Interrupted,
    TimedOut,
    SourceExhausted,
    ReadError,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::CountExhausted => write!(f, "packet count reached"),
            StopReason::Interrupted => write!(f, "interrupted"),
            StopReason::TimedOut => write!(f, "timed out"),
            StopReason::SourceExhausted => write!(f, "end of input"),
            StopReason::ReadError => write!(f, "read error"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Coordinator {
    reason: Mutex<Option<StopReason>>,
    stopped: Condvar,
    released: AtomicBool,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `reason` if nobody has asked to stop yet.
    ///
    /// Returns `true` only for the request that won.
    pub fn request_stop(&self, reason: StopReason) -> bool {
        let mut slot = self.lock();
        if slot.is_some() {
            return false;
        }
        *slot = Some(reason);
        self.stopped.notify_all();
        true
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        *self.lock()
    }

    /// Blocks until another stop is recorded or `timeout` elapses. In the
    /// second case `reason` is recorded under the same lock, so a timer can
    /// never overwrite a stop that raced it.
    pub fn stop_after(&self, timeout: Duration, reason: StopReason) -> bool {
        let slot = self.lock();
        let (mut slot, _) = self
            .stopped
            .wait_timeout_while(slot, timeout, |current| current.is_none())
            .unwrap_or_else(PoisonError::into_inner);

        if slot.is_some() {
            return false;
        }
        *slot = Some(reason);
        self.stopped.notify_all();
        true
    }

    /// Runs `close` if and only if no earlier caller has. Returns whether it ran.
    pub fn release<F: FnOnce()>(&self, close: F) -> bool {
        if self
            .released
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        close();
        true
    }

    fn lock(&self) -> MutexGuard<'_, Option<StopReason>> {
        self.reason.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
