use std::path::PathBuf;

use clap::Parser;

/// tinydump - capture, filter, dump and replay network traffic
#[derive(Parser, Debug)]
#[command(name = "tinydump", version, about = "Command-line packet sniffer with pcap dump and replay")]
pub struct CliArgs {
    /// Interface to capture on. Defaults to the first available device.
    #[arg(short = 'i', long = "interface", value_name = "IFACE")]
    pub interface: Option<String>,

    /// Write raw frames to this pcap file instead of printing them.
    #[arg(short = 'd', long = "dump", value_name = "FILE")]
    pub dump: Option<PathBuf>,

    /// Replay frames from a pcap file. Live-only options are ignored.
    #[arg(short = 'r', long = "read", value_name = "FILE")]
    pub read: Option<PathBuf>,

    /// Maximum bytes captured per frame.
    #[arg(short = 's', long = "snaplen", default_value_t = 65535)]
    pub snaplen: i32,

    /// Print a hex/ASCII dump after each summary line.
    #[arg(short = 'X', long = "hexdump")]
    pub hexdump: bool,

    /// Stop after this many frames.
    #[arg(short = 'c', long = "count", value_name = "N")]
    pub count: Option<u64>,

    /// Stop after this many seconds.
    #[arg(short = 't', long = "timeout", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// List capture devices and exit.
    #[arg(short = 'D', long = "list-interfaces")]
    pub list_interfaces: bool,

    /// Log debug diagnostics to stderr.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Filter expression, e.g. "tcp port 80".
    #[arg(value_name = "EXPRESSION")]
    pub expression: Option<String>,
}
