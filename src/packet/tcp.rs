use std::fmt;

use super::{PacketInfo, PacketType};

/// Represents parsed TCP flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpFlags {
    pub urg: bool,
    pub ack: bool,
    pub psh: bool,
    pub rst: bool,
    pub syn: bool,
    pub fin: bool,
}

impl TcpFlags {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            urg: byte & 0b0010_0000 != 0,
            ack: byte & 0b0001_0000 != 0,
            psh: byte & 0b0000_1000 != 0,
            rst: byte & 0b0000_0100 != 0,
            syn: byte & 0b0000_0010 != 0,
            fin: byte & 0b0000_0001 != 0,
        }
    }
}

impl fmt::Display for TcpFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (self.urg, "URG"),
            (self.ack, "ACK"),
            (self.psh, "PSH"),
            (self.rst, "RST"),
            (self.syn, "SYN"),
            (self.fin, "FIN"),
        ];
        let set: Vec<&str> = names.iter().filter(|(on, _)| *on).map(|(_, name)| *name).collect();

        if set.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", set.join("|"))
        }
    }
}

/// Fills in ports and flags from a TCP segment.
pub fn parse_tcp(segment: &[u8], info: &mut PacketInfo) -> Result<(), &'static str> {
    if segment.len() < 20 {
        return Err("TCP header too short");
    }

    info.packet_type = PacketType::TCP;
    info.src_port = Some(u16::from_be_bytes([segment[0], segment[1]]));
    info.dst_port = Some(u16::from_be_bytes([segment[2], segment[3]]));
    info.tcp_flags = Some(TcpFlags::from_byte(segment[13]));

    Ok(())
}
