//! Text rendering of frames: one summary line each, plus an optional
//! hex/ASCII dump.

use std::io::{self, Write};

const BYTES_PER_ROW: usize = 16;

/// What the renderer needs from a decoded frame. It never looks at
/// protocol fields itself.
pub trait Renderable {
    /// Single-line description, without the trailing newline.
    fn summary(&self) -> String;

    fn raw(&self) -> &[u8];
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    hexdump: bool,
}

impl Renderer {
    pub fn new(hexdump: bool) -> Self {
        Self { hexdump }
    }

    pub fn write_frame<W, R>(&self, out: &mut W, frame: &R) -> io::Result<()>
    where
        W: Write,
        R: Renderable + ?Sized,
    {
        writeln!(out, "{}", frame.summary())?;
        if self.hexdump {
            out.write_all(hex_dump(frame.raw()).as_bytes())?;
        }
        Ok(())
    }
}

/// Rows of 16 bytes: `\t0xADDR:`, eight space-led 4-digit groups, a two
/// space gutter and the printable ASCII. A blank line ends the dump.
///
/// An empty frame still yields one all-padding row.
pub fn hex_dump(data: &[u8]) -> String {
    let rows = data.len().div_ceil(BYTES_PER_ROW).max(1);
    let mut text = String::with_capacity(rows * 70 + 1);

    if data.is_empty() {
        dump_row(0, &[], &mut text);
    }
    for (index, row) in data.chunks(BYTES_PER_ROW).enumerate() {
        dump_row(index * BYTES_PER_ROW, row, &mut text);
    }

    text.push('\n');
    text
}

fn dump_row(addr: usize, row: &[u8], text: &mut String) {
    text.push_str(&format!("\t0x{:04x}:", addr));

    for slot in 0..BYTES_PER_ROW {
        if slot % 2 == 0 {
            text.push(' ');
        }
        match row.get(slot) {
            Some(byte) => text.push_str(&format!("{:02x}", byte)),
            None => text.push_str("  "),
        }
    }

    text.push_str("  ");
    text.extend(row.iter().map(|&byte| {
        if (0x20..=0x7e).contains(&byte) {
            byte as char
        } else {
            '.'
        }
    }));
    text.push('\n');
}
