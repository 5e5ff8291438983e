use std::io::{self, Write};

use pcap::Device;

/// Prints the capture devices, one per line, in the engine's order.
pub fn print_device_list<W: Write>(out: &mut W, devices: &[Device]) -> io::Result<()> {
    if devices.is_empty() {
        writeln!(out, "No capture devices found")?;
        return Ok(());
    }

    for (i, dev) in devices.iter().enumerate() {
        match &dev.desc {
            Some(desc) => writeln!(out, "  [{}] {} ({})", i, dev.name, desc)?,
            None => writeln!(out, "  [{}] {}", i, dev.name)?,
        }
    }
    Ok(())
}
