use std::net::{IpAddr, Ipv4Addr};

use super::{icmp, tcp, udp, PacketInfo, PacketType};
use super::{IP_PROTO_ICMP, IP_PROTO_IPIP, IP_PROTO_TCP, IP_PROTO_UDP};

pub fn parse_ipv4(payload: &[u8], info: &mut PacketInfo) -> Result<(), &'static str> {
    if payload.len() < 20 {
        return Err("IPv4 header too short");
    }

    let header_len = ((payload[0] & 0x0F) as usize) * 4;
    if header_len < 20 || payload.len() < header_len {
        return Err("IPv4 header length exceeds payload size");
    }

    let src = Ipv4Addr::new(payload[12], payload[13], payload[14], payload[15]);
    let dst = Ipv4Addr::new(payload[16], payload[17], payload[18], payload[19]);
    let protocol = payload[9];

    info.packet_type = PacketType::IPv4;
    info.src_ip = Some(IpAddr::V4(src));
    info.dst_ip = Some(IpAddr::V4(dst));
    info.ip_protocol = Some(protocol);

    let body = &payload[header_len..];
    let transport = match protocol {
        IP_PROTO_TCP => tcp::parse_tcp(body, info),
        IP_PROTO_UDP => udp::parse_udp(body, info),
        IP_PROTO_ICMP => icmp::parse_icmp(body, false, info),
        IP_PROTO_IPIP => {
            info.packet_type = PacketType::IpInIp;
            Ok(())
        }
        _ => Ok(()),
    };
    // a transport header cut off by the snapshot length leaves the IP view intact
    transport.or(Ok(()))
}
