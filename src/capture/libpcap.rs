//! libpcap backend via the `pcap` crate.

use std::path::Path;

use log::debug;
use pcap::{Activated, Capture, Device, Savefile};

use super::{CaptureEngine, CaptureStats, DumpSink, Frame, FrameSource, LiveOptions, Pull};
use crate::error::SessionError;

#[derive(Debug, Default, Clone, Copy)]
pub struct PcapEngine;

/// Describes every capture device, for `--list-interfaces`.
pub fn list_devices() -> Result<Vec<Device>, SessionError> {
    Device::list().map_err(|e| SessionError::DeviceList(e.to_string()))
}

impl CaptureEngine for PcapEngine {
    type Live = PcapSource<pcap::Active>;
    type Offline = PcapSource<pcap::Offline>;
    type Sink = PcapDumpSink;

    fn devices(&self) -> Result<Vec<String>, SessionError> {
        Ok(list_devices()?.into_iter().map(|device| device.name).collect())
    }

    fn open_live(&self, device: &str, options: LiveOptions) -> Result<Self::Live, SessionError> {
        let open_error = |e: pcap::Error| SessionError::SourceOpen {
            device: device.to_string(),
            reason: e.to_string(),
        };

        let cap = Capture::from_device(device)
            .map_err(open_error)?
            .snaplen(options.snaplen)
            .promisc(options.promiscuous)
            .timeout(options.poll_timeout_ms)
            .open()
            .map_err(open_error)?;

        debug!("opened {} (snaplen {}, poll {} ms)", device, options.snaplen, options.poll_timeout_ms);
        Ok(PcapSource { cap })
    }

    fn open_offline(&self, path: &Path) -> Result<Self::Offline, SessionError> {
        let cap = Capture::from_file(path).map_err(|e| SessionError::ReplayOpen {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(PcapSource { cap })
    }

    fn open_dump(&self, source: &Self::Live, path: &Path) -> Result<Self::Sink, SessionError> {
        let savefile = source.cap.savefile(path).map_err(|e| SessionError::DumpOpen {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(PcapDumpSink { savefile })
    }
}

/// A live or offline libpcap handle.
pub struct PcapSource<T: Activated> {
    cap: Capture<T>,
}

impl<T: Activated> FrameSource for PcapSource<T> {
    fn next_frame(&mut self) -> Pull {
        match self.cap.next_packet() {
            Ok(packet) => Pull::Frame(Frame::from(&packet)),
            Err(pcap::Error::TimeoutExpired) => Pull::Idle,
            Err(pcap::Error::NoMorePackets) => Pull::Exhausted,
            Err(e) => Pull::Failed(e.to_string()),
        }
    }

    fn apply_filter(&mut self, expression: &str) -> Result<(), SessionError> {
        self.cap.filter(expression, true).map_err(|e| SessionError::Filter {
            expression: expression.to_string(),
            reason: e.to_string(),
        })
    }

    fn stats(&mut self) -> Option<CaptureStats> {
        self.cap.stats().ok().map(|stat| CaptureStats {
            received: stat.received,
            dropped: stat.dropped,
            if_dropped: stat.if_dropped,
        })
    }

    fn close(self) {
        // pcap_close runs when the capture drops
        drop(self.cap);
    }
}

pub struct PcapDumpSink {
    savefile: Savefile,
}

impl DumpSink for PcapDumpSink {
    fn write(&mut self, frame: &Frame) -> Result<(), SessionError> {
        let header = pcap::PacketHeader {
            ts: libc::timeval {
                tv_sec: frame.header.ts_sec as libc::time_t,
                tv_usec: frame.header.ts_usec as libc::suseconds_t,
            },
            caplen: frame.header.caplen,
            len: frame.header.len,
        };
        self.savefile.write(&pcap::Packet::new(&header, &frame.data));
        // pcap_dump reports nothing, a full disk only shows up on flush
        self.savefile
            .flush()
            .map_err(|e| SessionError::DumpWrite(e.to_string()))
    }

    fn close(mut self) -> Result<(), SessionError> {
        self.savefile
            .flush()
            .map_err(|e| SessionError::DumpWrite(e.to_string()))
    }
}
