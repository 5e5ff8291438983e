mod arp;
mod dns;
mod ethernet;
mod icmp;
mod ipv4;
mod ipv6;
mod tcp;
mod udp;

pub use arp::ArpInfo;
pub use icmp::IcmpHeader;
pub use tcp::TcpFlags;

use std::fmt;
use std::net::IpAddr;

pub const ETHERTYPE_IPV4: u16 = 0x0800;
pub const ETHERTYPE_ARP: u16 = 0x0806;
pub const ETHERTYPE_IPV6: u16 = 0x86DD;

pub const IP_PROTO_ICMP: u8 = 1;
pub const IP_PROTO_IPIP: u8 = 4;
pub const IP_PROTO_TCP: u8 = 6;
pub const IP_PROTO_UDP: u8 = 17;
pub const IP_PROTO_ICMPV6: u8 = 58;

#[derive(Hash, Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord)]
pub enum PacketType {
    Ethernet,
    Arp,
    IPv4,
    IPv6,
    IpInIp,
    Icmp,
    TCP,
    UDP,
    DNS,
    Other(u16),
    Malformed,
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketType::Ethernet => write!(f, "Ethernet"),
            PacketType::Arp => write!(f, "ARP"),
            PacketType::IPv4 => write!(f, "IPv4"),
            PacketType::IPv6 => write!(f, "IPv6"),
            PacketType::IpInIp => write!(f, "IP-in-IP"),
            PacketType::Icmp => write!(f, "ICMP"),
            PacketType::TCP => write!(f, "TCP"),
            PacketType::UDP => write!(f, "UDP"),
            PacketType::DNS => write!(f, "DNS"),
            PacketType::Other(t) => write!(f, "EtherType 0x{:04x}", t),
            PacketType::Malformed => write!(f, "Malformed"),
        }
    }
}

/// Decoded view of one Ethernet frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketInfo {
    pub packet_type: PacketType,
    pub src_mac: [u8; 6],
    pub dst_mac: [u8; 6],
    pub ethertype: u16,
    pub src_ip: Option<IpAddr>,
    pub dst_ip: Option<IpAddr>,
    pub ip_protocol: Option<u8>,
    pub src_port: Option<u16>,
    pub dst_port: Option<u16>,
    pub tcp_flags: Option<TcpFlags>,
    pub icmp: Option<IcmpHeader>,
    pub arp: Option<ArpInfo>,
    pub dns_queries: Option<Vec<String>>,
}

impl PacketInfo {
    fn new(src_mac: [u8; 6], dst_mac: [u8; 6], ethertype: u16) -> Self {
        Self {
            packet_type: PacketType::Ethernet,
            src_mac,
            dst_mac,
            ethertype,
            src_ip: None,
            dst_ip: None,
            ip_protocol: None,
            src_port: None,
            dst_port: None,
            tcp_flags: None,
            icmp: None,
            arp: None,
            dns_queries: None,
        }
    }

    fn ip_label(&self) -> &'static str {
        match self.src_ip {
            Some(IpAddr::V6(_)) => "IP6",
            _ => "IP",
        }
    }
}

impl fmt::Display for PacketInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(arp) = &self.arp {
            return write!(f, "ARP {}", arp);
        }

        let (Some(src), Some(dst)) = (self.src_ip, self.dst_ip) else {
            return write!(
                f,
                "ether {} > {}, ethertype 0x{:04x}",
                mac_to_str(&self.src_mac),
                mac_to_str(&self.dst_mac),
                self.ethertype
            );
        };

        let label = self.ip_label();
        match (self.src_port, self.dst_port) {
            (Some(sport), Some(dport)) => {
                write!(f, "{} {}.{} > {}.{}: {}", label, src, sport, dst, dport, self.packet_type)?;
            }
            _ => write!(f, "{} {} > {}: {}", label, src, dst, self.packet_type)?,
        }

        if let Some(flags) = &self.tcp_flags {
            write!(f, " [{}]", flags)?;
        }
        if let Some(icmp) = &self.icmp {
            write!(f, " {}", icmp)?;
        }
        if let Some(queries) = &self.dns_queries {
            if !queries.is_empty() {
                write!(f, " {}", queries.join(", "))?;
            }
        }
        if matches!(self.packet_type, PacketType::IPv4 | PacketType::IPv6) {
            if let Some(proto) = self.ip_protocol {
                write!(f, " proto {}", proto)?;
            }
        }
        Ok(())
    }
}

/// Decode a raw Ethernet frame.
pub fn parse_packet(data: &[u8]) -> Result<PacketInfo, &'static str> {
    ethernet::parse_packet(data)
}

/// Protocol bucket for the end-of-capture tally.
pub fn classify(data: &[u8]) -> PacketType {
    parse_packet(data)
        .map(|info| info.packet_type)
        .unwrap_or(PacketType::Malformed)
}

pub fn mac_to_str(mac: &[u8; 6]) -> String {
    format!(
        "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    )
}
