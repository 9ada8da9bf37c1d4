//! Sixel encoder for canvas output
//!
//! Sixel draws six pixel rows per band, one palette color at a time.
//! Transparent pixels are never painted, so the terminal background shows
//! through.

use std::fmt::Write;

use crate::lang::graphics::Canvas;
use crate::lang::value::Color;

/// Sixel encoder
#[derive(Default)]
pub struct SixelEncoder {
    output: String,
}

impl SixelEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode the canvas, each pixel drawn as a `scale`×`scale` block
    pub fn encode(&mut self, canvas: &dyn Canvas, scale: usize) -> &str {
        self.output.clear();

        let scale = scale.max(1);
        let side = usize::try_from(canvas.size()).unwrap_or(0);
        let scaled = side * scale;

        // DCS q; P2=1 leaves unpainted pixels at the background color
        self.output.push_str("\x1bP0;1;q");
        let _ = write!(self.output, "\"1;1;{};{}", scaled, scaled);

        for color in Color::ALL.iter().filter(|c| !c.is_transparent()) {
            let [r, g, b, _] = color.rgba();
            let _ = write!(
                self.output,
                "#{};2;{};{};{}",
                color.index(),
                percent(r),
                percent(g),
                percent(b)
            );
        }

        let mut y = 0;
        while y < scaled {
            let band = 6.min(scaled - y);

            for color in Color::ALL.iter().filter(|c| !c.is_transparent()) {
                let columns: Vec<u8> = (0..scaled)
                    .map(|x| {
                        let mut bits = 0u8;
                        for bit in 0..band {
                            let px = (x / scale) as i32;
                            let py = ((y + bit) / scale) as i32;
                            if canvas.get_pixel(px, py) == *color {
                                bits |= 1 << bit;
                            }
                        }
                        bits
                    })
                    .collect();

                if columns.iter().all(|bits| *bits == 0) {
                    continue;
                }

                let _ = write!(self.output, "#{}", color.index());
                self.push_runs(&columns);
                self.output.push('$');
            }

            self.output.push('-');
            y += 6;
        }

        self.output.push_str("\x1b\\");
        &self.output
    }

    /// Append sixel characters, run-length encoding repeats
    fn push_runs(&mut self, columns: &[u8]) {
        let mut iter = columns.iter().peekable();
        while let Some(&bits) = iter.next() {
            let mut count = 1;
            while iter.peek() == Some(&&bits) {
                iter.next();
                count += 1;
            }
            let ch = char::from(bits + 63);
            if count > 3 {
                let _ = write!(self.output, "!{}{}", count, ch);
            } else {
                for _ in 0..count {
                    self.output.push(ch);
                }
            }
        }
    }

    /// Check the TERM variable for terminals known to speak sixel
    pub fn terminal_supports_sixel() -> bool {
        match std::env::var("TERM") {
            Ok(term) => {
                let term = term.to_lowercase();
                ["xterm", "mlterm", "yaft", "foot", "contour", "wezterm"]
                    .iter()
                    .any(|name| term.contains(name))
            }
            Err(_) => false,
        }
    }
}

/// 0-255 channel to sixel's 0-100 range
fn percent(channel: u8) -> u32 {
    u32::from(channel) * 100 / 255
}
