use std::sync::Arc;

use log::info;

use crate::core::termination::{Coordinator, StopReason};
use crate::error::SessionError;

/// Hooks the process interrupt into a session's coordinator.
pub trait InterruptHook {
    fn install(&self, coordinator: Arc<Coordinator>) -> Result<(), SessionError>;
}

/// Ctrl+C / SIGINT through `ctrlc`. Only one handler can exist per process.
#[derive(Debug, Default, Clone, Copy)]
pub struct CtrlcHook;

impl InterruptHook for CtrlcHook {
    /// Registers a Ctrl+C handler that records `Interrupted` on the coordinator
    ///
    /// # Arguments
    ///
    /// * `coordinator` - The session's stop latch; the handler never touches capture handles
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Signal` if a handler is already registered or
    /// the platform refuses it
    fn install(&self, coordinator: Arc<Coordinator>) -> Result<(), SessionError> {
        ctrlc::set_handler(move || {
            if coordinator.request_stop(StopReason::Interrupted) {
                info!("received interrupt, stopping capture");
            }
        })
        .map_err(|e| SessionError::Signal(e.to_string()))
    }
}
