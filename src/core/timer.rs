use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::info;

use crate::core::termination::{Coordinator, StopReason};

/// Spawns a one-shot timeout that records `TimedOut` on the coordinator
///
/// # Arguments
///
/// * `coordinator` - The session's stop latch, shared with the capture loop
/// * `after` - How long the capture may run
///
/// The thread exits early once any other stop is recorded, so joining it
/// after a count or interrupt stop does not wait out the full duration.
pub fn arm_timeout(coordinator: Arc<Coordinator>, after: Duration) -> JoinHandle<()> {
    thread::spawn(move || {
        if coordinator.stop_after(after, StopReason::TimedOut) {
            info!("timeout of {:?} expired", after);
        }
    })
}
