use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::CliArgs;

/// How long one `next_frame` call may block on an idle live device.
pub const POLL_TIMEOUT_MS: i32 = 500;

pub const DEFAULT_SNAPLEN: i32 = 65535;

/// Resolved capture settings, built once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    /// `None` selects the first device the engine reports.
    pub device: Option<String>,
    pub replay: Option<PathBuf>,
    pub dump: Option<PathBuf>,
    pub snaplen: i32,
    pub hexdump: bool,
    pub filter: String,
    pub count: Option<u64>,
    pub timeout: Option<Duration>,
}

/// Which of the three session shapes a config resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode<'a> {
    Replay(&'a Path),
    Dump(&'a Path),
    Display,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device: None,
            replay: None,
            dump: None,
            snaplen: DEFAULT_SNAPLEN,
            hexdump: false,
            filter: String::new(),
            count: None,
            timeout: None,
        }
    }
}

impl CaptureConfig {
    pub fn from_args(args: &CliArgs) -> Self {
        Self {
            device: args.interface.clone().filter(|name| !name.is_empty()),
            replay: args.read.clone(),
            dump: args.dump.clone(),
            snaplen: args.snaplen,
            hexdump: args.hexdump,
            filter: args.expression.clone().unwrap_or_default(),
            count: args.count,
            timeout: args.timeout.map(Duration::from_secs),
        }
    }

    /// Replay wins over everything else; dump wins over display.
    pub fn mode(&self) -> Mode<'_> {
        if let Some(path) = &self.replay {
            Mode::Replay(path)
        } else if let Some(path) = &self.dump {
            Mode::Dump(path)
        } else {
            Mode::Display
        }
    }

    pub fn filter_expression(&self) -> Option<&str> {
        let expr = self.filter.trim();
        (!expr.is_empty()).then_some(expr)
    }
}
