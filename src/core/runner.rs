//! Capture session controller: resolves the mode, opens the source (and the
//! dump file), wires up the interrupt and timeout triggers, runs the loop and
//! releases everything exactly once.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::capture::{CaptureEngine, CaptureStats, DumpSink, FrameSource, LiveOptions};
use crate::config::{CaptureConfig, Mode, POLL_TIMEOUT_MS};
use crate::core::capture_loop::{self, LoopReport};
use crate::core::signal::InterruptHook;
use crate::core::summary::Tally;
use crate::core::termination::{Coordinator, StopReason};
use crate::core::timer;
use crate::error::SessionError;
use crate::ui::render::Renderer;

/// How a session that got as far as capturing ended.
#[derive(Debug)]
pub struct Outcome {
    /// `false` for file replay.
    pub live: bool,
    pub reason: StopReason,
    pub frames: u64,
    pub tally: Tally,
    pub stats: Option<CaptureStats>,
}

pub struct Session<E, H> {
    engine: E,
    hook: H,
    config: CaptureConfig,
    coordinator: Arc<Coordinator>,
}

impl<E: CaptureEngine, H: InterruptHook> Session<E, H> {
    pub fn new(engine: E, hook: H, config: CaptureConfig) -> Self {
        Self {
            engine,
            hook,
            config,
            coordinator: Arc::new(Coordinator::new()),
        }
    }

    /// Handle for requesting a stop from outside the capture thread.
    #[cfg(test)]
    pub fn coordinator(&self) -> Arc<Coordinator> {
        Arc::clone(&self.coordinator)
    }

    /// Runs the session to completion, writing rendered frames to `out`.
    pub fn run<W: Write>(self, out: &mut W) -> Result<Outcome, SessionError> {
        match self.config.mode() {
            Mode::Replay(path) => self.replay(path, out),
            Mode::Dump(path) => self.capture_to_file(path),
            Mode::Display => self.capture_to_screen(out),
        }
    }

    /// Offline re-rendering pass. Filter, count, timeout and dump settings
    /// do not apply here.
    fn replay<W: Write>(&self, path: &Path, out: &mut W) -> Result<Outcome, SessionError> {
        let mut source = self.engine.open_offline(path)?;
        info!("reading from file {}", path.display());

        let report = capture_loop::display_frames(
            &mut source,
            &self.coordinator,
            Renderer::new(self.config.hexdump),
            None,
            out,
        );
        self.release(source, None)?;

        Ok(outcome(false, report?, None))
    }

    fn capture_to_file(&self, path: &Path) -> Result<Outcome, SessionError> {
        let mut source = self.open_live_source()?;
        let mut sink = match self.engine.open_dump(&source, path) {
            Ok(sink) => sink,
            Err(e) => {
                self.release(source, None)?;
                return Err(e);
            }
        };
        info!("writing frames to {}", path.display());

        let report =
            capture_loop::dump_frames(&mut source, &mut sink, &self.coordinator, self.config.count);
        let stats = source.stats();
        let closed = self.release(source, Some(sink));

        // a loop failure outranks a failed flush at close
        let report = report?;
        closed?;
        Ok(outcome(true, report, stats))
    }

    fn capture_to_screen<W: Write>(&self, out: &mut W) -> Result<Outcome, SessionError> {
        let mut source = self.open_live_source()?;
        let timer = self
            .config
            .timeout
            .map(|after| timer::arm_timeout(Arc::clone(&self.coordinator), after));

        let report = capture_loop::display_frames(
            &mut source,
            &self.coordinator,
            Renderer::new(self.config.hexdump),
            self.config.count,
            out,
        );
        let stats = source.stats();
        self.release(source, None)?;

        // a failed loop records no stop, so the timer would sleep out its full duration
        if let (Some(timer), Ok(_)) = (timer, &report) {
            if let Err(e) = timer.join() {
                warn!("timeout thread panicked: {:?}", e);
            }
        }

        Ok(outcome(true, report?, stats))
    }

    /// Opens the live handle, installs the interrupt trigger and applies the
    /// filter. A bad filter only costs a warning.
    fn open_live_source(&self) -> Result<E::Live, SessionError> {
        let device = self.resolve_device()?;
        let options = LiveOptions {
            snaplen: self.config.snaplen,
            promiscuous: true,
            poll_timeout_ms: POLL_TIMEOUT_MS,
        };
        let mut source = self.engine.open_live(&device, options)?;
        info!("listening on {}, snapshot length {} bytes", device, self.config.snaplen);

        if let Err(e) = self.hook.install(Arc::clone(&self.coordinator)) {
            self.release(source, None)?;
            return Err(e);
        }

        if let Some(expression) = self.config.filter_expression() {
            info!("setting filter to {}", expression);
            if let Err(e) = source.apply_filter(expression) {
                warn!("{}; capturing unfiltered", e);
            }
        }

        Ok(source)
    }

    fn resolve_device(&self) -> Result<String, SessionError> {
        if let Some(device) = &self.config.device {
            return Ok(device.clone());
        }
        self.engine
            .devices()?
            .into_iter()
            .next()
            .ok_or(SessionError::NoDevices)
    }

    /// Closes the dump file, then the source, behind the coordinator's gate.
    /// The source is closed even when the dump file fails to flush; that
    /// failure is returned afterwards.
    fn release<S: FrameSource>(&self, source: S, sink: Option<E::Sink>) -> Result<(), SessionError> {
        let mut flushed = Ok(());
        let closed = self.coordinator.release(|| {
            if let Some(sink) = sink {
                flushed = sink.close();
            }
            source.close();
        });
        if !closed {
            debug!("capture resources were already released");
        }
        flushed
    }
}

fn outcome(live: bool, report: LoopReport, stats: Option<CaptureStats>) -> Outcome {
    Outcome {
        live,
        reason: report.reason,
        frames: report.frames,
        tally: report.tally,
        stats,
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FakeEngine, RecordingHook, SharedEngine, Tail};
    use super::*;
    use crate::capture::{Frame, Pull};
    use crate::core::exit::{codes, error_code, outcome_code};
    use crate::packet::fixtures;
    use std::path::PathBuf;
    use std::thread;
    use std::time::{Duration, Instant};

    fn tcp_frames(n: usize) -> Vec<Pull> {
        (0..n)
            .map(|i| {
                let mut frame = Frame::from_bytes(&fixtures::tcp_syn());
                frame.header.ts_sec = i as i64;
                Pull::Frame(frame)
            })
            .collect()
    }

    fn session(engine: &Arc<FakeEngine>, config: CaptureConfig) -> Session<SharedEngine, RecordingHook> {
        Session::new(
            SharedEngine(Arc::clone(engine)),
            RecordingHook::new(engine.events.clone()),
            config,
        )
    }

    fn run(engine: &Arc<FakeEngine>, config: CaptureConfig) -> (Result<Outcome, SessionError>, String) {
        let mut out = Vec::new();
        let result = session(engine, config).run(&mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn count_of(events: &[String], event: &str) -> usize {
        events.iter().filter(|e| e.as_str() == event).count()
    }

    #[test]
    fn test_replay_ignores_live_options() {
        let engine = Arc::new(FakeEngine {
            offline: tcp_frames(3),
            ..FakeEngine::default()
        });
        let bare = CaptureConfig {
            replay: Some(PathBuf::from("in.pcap")),
            ..CaptureConfig::default()
        };
        let loaded = CaptureConfig {
            device: Some("eth0".into()),
            dump: Some(PathBuf::from("out.pcap")),
            filter: "tcp".into(),
            count: Some(1),
            timeout: Some(Duration::from_millis(1)),
            ..bare.clone()
        };

        let (bare_result, bare_out) = run(&engine, bare);
        let (loaded_result, loaded_out) = run(&engine, loaded);

        assert_eq!(bare_out, loaded_out);
        assert_eq!(bare_out.lines().count(), 3);

        let outcome = loaded_result.unwrap();
        assert!(!outcome.live);
        assert_eq!(outcome.reason, StopReason::SourceExhausted);
        assert_eq!(outcome_code(&outcome), codes::SUCCESS);
        assert_eq!(bare_result.unwrap().frames, 3);

        let events = engine.events();
        assert!(events.iter().all(|e| !e.starts_with("open_live") && !e.starts_with("filter")));
        assert_eq!(count_of(&events, "install interrupt"), 0);
        assert_eq!(count_of(&events, "close source"), 2);
    }

    #[test]
    fn test_display_with_count_and_hexdump() {
        let engine = Arc::new(FakeEngine {
            live: tcp_frames(5),
            ..FakeEngine::default()
        });
        let config = CaptureConfig {
            device: Some("eth1".into()),
            count: Some(2),
            hexdump: true,
            snaplen: 96,
            ..CaptureConfig::default()
        };

        let (result, out) = run(&engine, config);
        let outcome = result.unwrap();

        assert_eq!(outcome.reason, StopReason::CountExhausted);
        assert_eq!(outcome.frames, 2);
        assert_eq!(outcome.stats.map(|s| s.received), Some(7));
        assert_eq!(outcome_code(&outcome), codes::CAPTURE_ENDED);
        assert_eq!(out.lines().filter(|l| l.contains("TCP [SYN]")).count(), 2);
        assert_eq!(out.matches("\t0x0000:").count(), 2);

        let events = engine.events();
        assert_eq!(events[0], "open_live eth1 96");
        assert_eq!(count_of(&events, "close source"), 1);
    }

    #[test]
    fn test_first_device_is_selected() {
        let engine = Arc::new(FakeEngine {
            devices: vec!["en0".into(), "lo0".into()],
            ..FakeEngine::default()
        });
        let (result, _) = run(&engine, CaptureConfig::default());

        assert_eq!(result.unwrap().reason, StopReason::SourceExhausted);
        assert!(engine.events()[0].starts_with("open_live en0 "));
    }

    #[test]
    fn test_no_devices_is_an_error() {
        let engine = Arc::new(FakeEngine::default());
        let (result, out) = run(&engine, CaptureConfig::default());

        assert!(matches!(result, Err(SessionError::NoDevices)));
        assert!(out.is_empty());
        assert!(engine.events().is_empty());
    }

    #[test]
    fn test_bad_filter_captures_unfiltered() {
        let engine = Arc::new(FakeEngine {
            devices: vec!["eth0".into()],
            live: tcp_frames(2),
            reject_filter: true,
            ..FakeEngine::default()
        });
        let config = CaptureConfig {
            filter: "tcp port".into(),
            ..CaptureConfig::default()
        };

        let (result, out) = run(&engine, config);
        assert_eq!(result.unwrap().frames, 2);
        assert_eq!(out.lines().count(), 2);
        assert_eq!(count_of(&engine.events(), "filter tcp port"), 1);
    }

    #[test]
    fn test_dump_mode_writes_and_closes_sink_first() {
        let engine = Arc::new(FakeEngine {
            devices: vec!["eth0".into()],
            live: tcp_frames(5),
            ..FakeEngine::default()
        });
        let config = CaptureConfig {
            dump: Some(PathBuf::from("out.pcap")),
            count: Some(3),
            hexdump: true,
            ..CaptureConfig::default()
        };

        let (result, out) = run(&engine, config);
        let outcome = result.unwrap();
        assert_eq!(outcome.reason, StopReason::CountExhausted);
        assert_eq!(outcome.frames, 3);
        assert!(out.is_empty());

        let events = engine.events();
        let position = |event: &str| events.iter().position(|e| e == event).unwrap();
        assert_eq!(count_of(&events, "write"), 3);
        assert!(position("install interrupt") < position("open_dump out.pcap"));
        assert!(position("open_dump out.pcap") < position("write"));
        assert_eq!(&events[events.len() - 2..], ["close sink", "close source"]);
        assert_eq!(count_of(&events, "close sink"), 1);
        assert_eq!(count_of(&events, "close source"), 1);
    }

    #[test]
    fn test_dump_write_failure_still_releases() {
        let engine = Arc::new(FakeEngine {
            devices: vec!["eth0".into()],
            live: tcp_frames(3),
            sink_fails_after: Some(1),
            ..FakeEngine::default()
        });
        let config = CaptureConfig {
            dump: Some(PathBuf::from("out.pcap")),
            ..CaptureConfig::default()
        };

        let (result, _) = run(&engine, config);
        assert!(matches!(result, Err(SessionError::DumpWrite(_))));

        let events = engine.events();
        assert_eq!(count_of(&events, "close sink"), 1);
        assert_eq!(count_of(&events, "close source"), 1);
    }

    #[test]
    fn test_interrupt_on_idle_device() {
        let engine = Arc::new(FakeEngine {
            devices: vec!["eth0".into()],
            live: tcp_frames(1),
            live_tail: Some(Tail::Idle),
            ..FakeEngine::default()
        });
        let session = session(&engine, CaptureConfig::default());
        let coordinator = session.coordinator();

        let interrupter = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            coordinator.request_stop(StopReason::Interrupted)
        });

        let mut out = Vec::new();
        let outcome = session.run(&mut out).unwrap();
        assert!(interrupter.join().unwrap());

        assert_eq!(outcome.reason, StopReason::Interrupted);
        assert_eq!(outcome.frames, 1);
        assert_eq!(outcome_code(&outcome), codes::CAPTURE_ENDED);
        assert_eq!(count_of(&engine.events(), "close source"), 1);
    }

    #[test]
    fn test_timeout_on_idle_device_is_prompt() {
        let engine = Arc::new(FakeEngine {
            devices: vec!["eth0".into()],
            live_tail: Some(Tail::Idle),
            ..FakeEngine::default()
        });
        let timeout = Duration::from_millis(100);
        let config = CaptureConfig {
            timeout: Some(timeout),
            ..CaptureConfig::default()
        };

        let start = Instant::now();
        let (result, out) = run(&engine, config);
        let elapsed = start.elapsed();

        assert_eq!(result.unwrap().reason, StopReason::TimedOut);
        assert!(out.is_empty());
        assert!(elapsed >= timeout);
        // fake poll timeout is 5 ms, allow generous scheduling slack
        assert!(elapsed < timeout + Duration::from_secs(2));
    }

    #[test]
    fn test_read_error_outcome() {
        let mut live = tcp_frames(1);
        live.push(Pull::Failed("interface went down".into()));
        let engine = Arc::new(FakeEngine {
            devices: vec!["eth0".into()],
            live,
            ..FakeEngine::default()
        });

        let (result, out) = run(&engine, CaptureConfig::default());
        let outcome = result.unwrap();
        assert_eq!(outcome.reason, StopReason::ReadError);
        assert_eq!(outcome_code(&outcome), codes::READ_ERROR);
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_interrupt_during_dump_closes_sink() {
        let engine = Arc::new(FakeEngine {
            devices: vec!["eth0".into()],
            live: tcp_frames(2),
            live_tail: Some(Tail::Idle),
            ..FakeEngine::default()
        });
        let config = CaptureConfig {
            dump: Some(PathBuf::from("out.pcap")),
            ..CaptureConfig::default()
        };
        let session = session(&engine, config);
        let coordinator = session.coordinator();

        let interrupter = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            coordinator.request_stop(StopReason::Interrupted)
        });

        let outcome = session.run(&mut Vec::new()).unwrap();
        assert!(interrupter.join().unwrap());

        assert_eq!(outcome.reason, StopReason::Interrupted);
        assert_eq!(outcome.frames, 2);
        assert_eq!(outcome_code(&outcome), codes::CAPTURE_ENDED);

        let events = engine.events();
        assert_eq!(count_of(&events, "write"), 2);
        assert_eq!(&events[events.len() - 2..], ["close sink", "close source"]);
        assert_eq!(count_of(&events, "close sink"), 1);
        assert_eq!(count_of(&events, "close source"), 1);
    }

    #[test]
    fn test_dump_flush_failure_at_close_is_reported() {
        let engine = Arc::new(FakeEngine {
            devices: vec!["eth0".into()],
            live: tcp_frames(4),
            sink_close_fails: true,
            ..FakeEngine::default()
        });
        let config = CaptureConfig {
            dump: Some(PathBuf::from("out.pcap")),
            count: Some(2),
            ..CaptureConfig::default()
        };

        let (result, _) = run(&engine, config);
        let err = result.err().unwrap();
        assert!(matches!(err, SessionError::DumpWrite(_)));
        assert_eq!(error_code(&err), codes::DUMP_ERROR);

        let events = engine.events();
        assert_eq!(&events[events.len() - 2..], ["close sink", "close source"]);
        assert_eq!(count_of(&events, "close source"), 1);
    }

    #[test]
    fn test_source_open_failure() {
        let engine = Arc::new(FakeEngine {
            open_live_fails: true,
            ..FakeEngine::default()
        });
        let config = CaptureConfig {
            device: Some("eth9".into()),
            ..CaptureConfig::default()
        };

        let (result, out) = run(&engine, config);
        let err = result.err().unwrap();
        assert!(matches!(err, SessionError::SourceOpen { ref device, .. } if device == "eth9"));
        assert_eq!(error_code(&err), codes::SOURCE_OPEN);
        assert!(out.is_empty());

        let events = engine.events();
        assert_eq!(count_of(&events, "install interrupt"), 0);
        assert_eq!(count_of(&events, "close source"), 0);
    }

    #[test]
    fn test_interrupt_hook_failure_releases_source() {
        let engine = Arc::new(FakeEngine {
            devices: vec!["eth0".into()],
            live: tcp_frames(3),
            ..FakeEngine::default()
        });
        let config = CaptureConfig {
            dump: Some(PathBuf::from("out.pcap")),
            ..CaptureConfig::default()
        };
        let session = Session::new(
            SharedEngine(Arc::clone(&engine)),
            RecordingHook::refusing(engine.events.clone()),
            config,
        );

        let mut out = Vec::new();
        let err = session.run(&mut out).err().unwrap();
        assert!(matches!(err, SessionError::Signal(_)));
        assert_eq!(error_code(&err), codes::SIGNAL_ERROR);
        assert!(out.is_empty());

        let events = engine.events();
        assert!(events.iter().all(|e| !e.starts_with("open_dump") && e != "write"));
        assert_eq!(count_of(&events, "close source"), 1);
    }
}
