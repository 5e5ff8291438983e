use std::net::{IpAddr, Ipv6Addr};

use super::{icmp, tcp, udp, PacketInfo, PacketType};
use super::{IP_PROTO_ICMPV6, IP_PROTO_TCP, IP_PROTO_UDP};

const IPV6_HEADER_LEN: usize = 40;

pub fn parse_ipv6(payload: &[u8], info: &mut PacketInfo) -> Result<(), &'static str> {
    if payload.len() < IPV6_HEADER_LEN {
        return Err("IPv6 header too short");
    }

    let src = address_at(payload, 8);
    let dst = address_at(payload, 24);
    let next_header = payload[6];

    info.packet_type = PacketType::IPv6;
    info.src_ip = Some(IpAddr::V6(src));
    info.dst_ip = Some(IpAddr::V6(dst));
    info.ip_protocol = Some(next_header);

    let body = &payload[IPV6_HEADER_LEN..];
    let transport = match next_header {
        IP_PROTO_TCP => tcp::parse_tcp(body, info),
        IP_PROTO_UDP => udp::parse_udp(body, info),
        IP_PROTO_ICMPV6 => icmp::parse_icmp(body, true, info),
        _ => Ok(()),
    };
    // same as IPv4: a short transport header still renders the addresses
    transport.or(Ok(()))
}

fn address_at(payload: &[u8], offset: usize) -> Ipv6Addr {
    let mut octets = [0u8; 16];
    octets.copy_from_slice(&payload[offset..offset + 16]);
    Ipv6Addr::from(octets)
}
