use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort or cut short a capture session.
///
/// Filter errors are produced here too, but the runner downgrades them to a
/// warning and keeps capturing unfiltered.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("couldn't find any devices")]
    NoDevices,

    #[error("couldn't list devices: {0}")]
    DeviceList(String),

    #[error("couldn't open {path:?}: {reason}")]
    ReplayOpen { path: PathBuf, reason: String },

    #[error("couldn't open device {device}: {reason}")]
    SourceOpen { device: String, reason: String },

    #[error("bad filter {expression:?}: {reason}")]
    Filter { expression: String, reason: String },

    #[error("couldn't write to file {path:?}: {reason}")]
    DumpOpen { path: PathBuf, reason: String },

    #[error("dump write failed: {0}")]
    DumpWrite(String),

    #[error("output failed: {0}")]
    Output(#[from] io::Error),

    #[error("couldn't install interrupt handler: {0}")]
    Signal(String),
}
