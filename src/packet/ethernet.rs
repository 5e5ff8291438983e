use super::{arp, ipv4, ipv6, PacketInfo, PacketType};
use super::{ETHERTYPE_ARP, ETHERTYPE_IPV4, ETHERTYPE_IPV6};

const ETHERNET_HEADER_LEN: usize = 14;

/// Entry point for decoding Ethernet II frames.
pub fn parse_packet(data: &[u8]) -> Result<PacketInfo, &'static str> {
    if data.len() < ETHERNET_HEADER_LEN {
        return Err("frame too short for Ethernet header");
    }

    let dst_mac = mac_from_slice(&data[0..6]);
    let src_mac = mac_from_slice(&data[6..12]);
    let ethertype = u16::from_be_bytes([data[12], data[13]]);

    let mut info = PacketInfo::new(src_mac, dst_mac, ethertype);
    let payload = &data[ETHERNET_HEADER_LEN..];

    match ethertype {
        ETHERTYPE_IPV4 => ipv4::parse_ipv4(payload, &mut info)?,
        ETHERTYPE_IPV6 => ipv6::parse_ipv6(payload, &mut info)?,
        ETHERTYPE_ARP => arp::parse_arp(payload, &mut info)?,
        other => info.packet_type = PacketType::Other(other),
    }

    Ok(info)
}

fn mac_from_slice(slice: &[u8]) -> [u8; 6] {
    let mut mac = [0u8; 6];
    mac.copy_from_slice(slice);
    mac
}
