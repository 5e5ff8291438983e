//! The acquisition loops. Both run on the caller's thread and re-check the
//! coordinator once per poll, so an interrupt or timeout is noticed within
//! one poll timeout even when the device is idle.

use std::io::Write;

use log::error;

use crate::capture::{DumpSink, FrameSource, Pull};
use crate::core::summary::Tally;
use crate::core::termination::{Coordinator, StopReason};
use crate::error::SessionError;
use crate::ui::render::Renderer;

#[derive(Debug)]
pub struct LoopReport {
    pub reason: StopReason,
    pub frames: u64,
    pub tally: Tally,
}

/// Renders frames in arrival order until something stops the session.
///
/// With `count = Some(n)` exactly `n` frames are rendered: the frame that
/// would be number `n + 1` ends the loop unrendered.
pub fn display_frames<S, W>(
    source: &mut S,
    coordinator: &Coordinator,
    renderer: Renderer,
    count: Option<u64>,
    out: &mut W,
) -> Result<LoopReport, SessionError>
where
    S: FrameSource,
    W: Write,
{
    let mut remaining = count;
    let mut frames = 0;
    let mut tally = Tally::default();

    let reason = loop {
        if let Some(reason) = coordinator.stop_reason() {
            break reason;
        }

        match source.next_frame() {
            Pull::Idle => continue,
            Pull::Exhausted => break StopReason::SourceExhausted,
            Pull::Failed(message) => {
                error!("read error: {}", message);
                break StopReason::ReadError;
            }
            Pull::Frame(frame) => {
                if let Some(left) = remaining.as_mut() {
                    if *left == 0 {
                        break StopReason::CountExhausted;
                    }
                    *left -= 1;
                }

                renderer.write_frame(out, &frame)?;
                tally.record(frame.packet_type());
                frames += 1;
            }
        }
    };

    Ok(LoopReport {
        reason: settle(coordinator, reason),
        frames,
        tally,
    })
}

/// Writes every frame to `sink` without rendering. A count of zero means
/// no limit.
pub fn dump_frames<S, D>(
    source: &mut S,
    sink: &mut D,
    coordinator: &Coordinator,
    count: Option<u64>,
) -> Result<LoopReport, SessionError>
where
    S: FrameSource,
    D: DumpSink,
{
    let limit = count.filter(|&n| n > 0);
    let mut frames = 0;

    let reason = loop {
        if let Some(reason) = coordinator.stop_reason() {
            break reason;
        }
        if limit.is_some_and(|n| frames >= n) {
            break StopReason::CountExhausted;
        }

        match source.next_frame() {
            Pull::Idle => continue,
            Pull::Exhausted => break StopReason::SourceExhausted,
            Pull::Failed(message) => {
                error!("read error: {}", message);
                break StopReason::ReadError;
            }
            Pull::Frame(frame) => {
                sink.write(&frame)?;
                frames += 1;
            }
        }
    };

    Ok(LoopReport {
        reason: settle(coordinator, reason),
        frames,
        tally: Tally::default(),
    })
}

/// The loop's own stop competes with the other triggers like any of them.
fn settle(coordinator: &Coordinator, reason: StopReason) -> StopReason {
    coordinator.request_stop(reason);
    coordinator.stop_reason().unwrap_or(reason)
}
