use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::core::runner::Outcome;
use crate::packet::PacketType;

/// Frames seen per protocol.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tally {
    counts: BTreeMap<PacketType, u64>,
}

impl Tally {
    pub fn record(&mut self, packet_type: PacketType) {
        *self.counts.entry(packet_type).or_insert(0) += 1;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PacketType, &u64)> {
        self.counts.iter()
    }
}

/// Prints the end-of-capture summary.
pub fn write_summary<W: Write>(out: &mut W, outcome: &Outcome) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{} packets captured", outcome.frames)?;

    for (ptype, count) in outcome.tally.iter() {
        writeln!(out, "  {}: {}", ptype, count)?;
    }

    if let Some(stats) = outcome.stats {
        writeln!(out, "{} packets received by filter", stats.received)?;
        writeln!(out, "{} packets dropped by kernel", stats.dropped)?;
        if stats.if_dropped > 0 {
            writeln!(out, "{} packets dropped by interface", stats.if_dropped)?;
        }
    }

    out.flush()
}
