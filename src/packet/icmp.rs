use std::fmt;

use super::{PacketInfo, PacketType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcmpHeader {
    pub icmp_type: u8,
    pub code: u8,
    pub v6: bool,
}

impl fmt::Display for IcmpHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match (self.v6, self.icmp_type) {
            (false, 8) | (true, 128) => Some("echo request"),
            (false, 0) | (true, 129) => Some("echo reply"),
            (false, 3) | (true, 1) => Some("destination unreachable"),
            (false, 11) | (true, 3) => Some("time exceeded"),
            (true, 135) => Some("neighbor solicitation"),
            (true, 136) => Some("neighbor advertisement"),
            _ => None,
        };

        match name {
            Some(name) if self.code == 0 => write!(f, "{}", name),
            Some(name) => write!(f, "{} code {}", name, self.code),
            None => write!(f, "type {} code {}", self.icmp_type, self.code),
        }
    }
}

pub fn parse_icmp(message: &[u8], v6: bool, info: &mut PacketInfo) -> Result<(), &'static str> {
    if message.len() < 4 {
        return Err("ICMP header too short");
    }

    info.packet_type = PacketType::Icmp;
    info.icmp = Some(IcmpHeader {
        icmp_type: message[0],
        code: message[1],
        v6,
    });

    Ok(())
}
