use std::fmt;
use std::net::Ipv4Addr;

use super::{mac_to_str, PacketInfo, PacketType};

const ARP_IPV4_LEN: usize = 28;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArpInfo {
    pub operation: u16,
    pub sender_mac: [u8; 6],
    pub sender_ip: Ipv4Addr,
    pub target_ip: Ipv4Addr,
}

impl fmt::Display for ArpInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operation {
            1 => write!(f, "who-has {} tell {}", self.target_ip, self.sender_ip),
            2 => write!(f, "reply {} is-at {}", self.sender_ip, mac_to_str(&self.sender_mac)),
            op => write!(f, "op {} {} > {}", op, self.sender_ip, self.target_ip),
        }
    }
}

/// Decodes Ethernet/IPv4 ARP. Other hardware or protocol types are left as
/// a bare ARP frame.
pub fn parse_arp(payload: &[u8], info: &mut PacketInfo) -> Result<(), &'static str> {
    info.packet_type = PacketType::Arp;

    if payload.len() < 8 {
        return Err("ARP header too short");
    }
    let (hlen, plen) = (payload[4], payload[5]);
    if hlen != 6 || plen != 4 {
        return Ok(());
    }
    if payload.len() < ARP_IPV4_LEN {
        return Err("ARP body too short");
    }

    let mut sender_mac = [0u8; 6];
    sender_mac.copy_from_slice(&payload[8..14]);

    info.arp = Some(ArpInfo {
        operation: u16::from_be_bytes([payload[6], payload[7]]),
        sender_mac,
        sender_ip: Ipv4Addr::new(payload[14], payload[15], payload[16], payload[17]),
        target_ip: Ipv4Addr::new(payload[24], payload[25], payload[26], payload[27]),
    });

    Ok(())
}
