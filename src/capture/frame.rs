use crate::packet::{self, PacketType};
use crate::ui::render::Renderable;

const SECS_PER_DAY: i64 = 86_400;

/// Arrival metadata of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameHeader {
    pub ts_sec: i64,
    pub ts_usec: i64,
    /// Bytes actually captured, bounded by the snapshot length.
    pub caplen: u32,
    /// Length of the frame on the wire.
    pub len: u32,
}

/// One captured frame, owned by the loop iteration that pulled it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub header: FrameHeader,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(header: FrameHeader, data: Vec<u8>) -> Self {
        Self { header, data }
    }

    /// A frame stamped at the epoch, captured in full.
    #[cfg(test)]
    pub fn from_bytes(data: &[u8]) -> Self {
        let len = data.len() as u32;
        Self::new(
            FrameHeader {
                caplen: len,
                len,
                ..FrameHeader::default()
            },
            data.to_vec(),
        )
    }

    pub fn packet_type(&self) -> PacketType {
        packet::classify(&self.data)
    }

    /// UTC time of day with microseconds, `HH:MM:SS.uuuuuu`.
    fn time_of_day(&self) -> String {
        let secs = self.header.ts_sec.rem_euclid(SECS_PER_DAY);
        format!(
            "{:02}:{:02}:{:02}.{:06}",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60,
            self.header.ts_usec
        )
    }
}

impl<'a> From<&pcap::Packet<'a>> for Frame {
    fn from(packet: &pcap::Packet<'a>) -> Self {
        Self::new(
            FrameHeader {
                ts_sec: packet.header.ts.tv_sec as i64,
                ts_usec: packet.header.ts.tv_usec as i64,
                caplen: packet.header.caplen,
                len: packet.header.len,
            },
            packet.data.to_vec(),
        )
    }
}

impl Renderable for Frame {
    fn summary(&self) -> String {
        let decoded = match packet::parse_packet(&self.data) {
            Ok(info) => info.to_string(),
            Err(reason) => format!("[undecoded: {}]", reason),
        };

        let mut line = format!("{} {}, length {}", self.time_of_day(), decoded, self.header.len);
        if self.header.caplen < self.header.len {
            line.push_str(&format!(" (captured {})", self.header.caplen));
        }
        line
    }

    fn raw(&self) -> &[u8] {
        &self.data
    }
}
