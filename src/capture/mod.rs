//! Acquisition sources and dump sinks.
//!
//! The session runner only talks to the capture engine through the three
//! traits here, so the libpcap backend in [`libpcap`] can be swapped for an
//! in-memory fake in tests.

mod frame;
pub mod libpcap;

pub use frame::{Frame, FrameHeader};
pub use libpcap::PcapEngine;

use std::path::Path;

use crate::error::SessionError;

/// Result of one poll of an acquisition source.
#[derive(Debug, Clone)]
pub enum Pull {
    Frame(Frame),
    /// The poll timeout expired with no traffic.
    Idle,
    /// End of a replay file, or a live handle that was shut down.
    Exhausted,
    /// Engine failure, carrying its error text.
    Failed(String),
}

/// Counters reported by a live handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureStats {
    pub received: u32,
    pub dropped: u32,
    pub if_dropped: u32,
}

/// Parameters for opening a live handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveOptions {
    pub snaplen: i32,
    pub promiscuous: bool,
    pub poll_timeout_ms: i32,
}

pub trait FrameSource {
    /// Blocks at most for the handle's poll timeout.
    fn next_frame(&mut self) -> Pull;

    fn apply_filter(&mut self, expression: &str) -> Result<(), SessionError>;

    fn stats(&mut self) -> Option<CaptureStats> {
        None
    }

    /// Releases the handle. Consuming `self` makes a second close impossible.
    fn close(self);
}

pub trait DumpSink {
    fn write(&mut self, frame: &Frame) -> Result<(), SessionError>;

    /// Flushes and releases the file.
    fn close(self) -> Result<(), SessionError>;
}

/// The external capture engine: device discovery plus the three ways of
/// opening a handle.
pub trait CaptureEngine {
    type Live: FrameSource;
    type Offline: FrameSource;
    type Sink: DumpSink;

    /// Device names in the engine's preferred order.
    fn devices(&self) -> Result<Vec<String>, SessionError>;

    fn open_live(&self, device: &str, options: LiveOptions) -> Result<Self::Live, SessionError>;

    fn open_offline(&self, path: &Path) -> Result<Self::Offline, SessionError>;

    fn open_dump(&self, source: &Self::Live, path: &Path) -> Result<Self::Sink, SessionError>;
}
