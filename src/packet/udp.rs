use super::{dns, PacketInfo, PacketType};

const DNS_PORT: u16 = 53;

/// Fills in ports from a UDP datagram and decodes DNS queries on port 53.
pub fn parse_udp(datagram: &[u8], info: &mut PacketInfo) -> Result<(), &'static str> {
    if datagram.len() < 8 {
        return Err("UDP header too short");
    }

    let src_port = u16::from_be_bytes([datagram[0], datagram[1]]);
    let dst_port = u16::from_be_bytes([datagram[2], datagram[3]]);
    info.src_port = Some(src_port);
    info.dst_port = Some(dst_port);

    if src_port == DNS_PORT || dst_port == DNS_PORT {
        info.packet_type = PacketType::DNS;
        // best effort, a truncated query still renders as DNS
        info.dns_queries = dns::parse_dns_queries(&datagram[8..]).ok();
    } else {
        info.packet_type = PacketType::UDP;
    }

    Ok(())
}
