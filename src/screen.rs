//! Half-block canvas rendering
//!
//! Each text cell shows two vertically stacked pixels: the upper one as the
//! foreground of '▀', the lower one as the background. Animation frames are
//! double-buffered so only changed cells are rewritten.

use std::fmt::Write as _;
use std::io;

use pixel_walle::{Canvas, Color};

use crate::terminal::{to_bg_sgr, to_fg_sgr, Terminal};

/// Largest horizontal scale picked automatically
const MAX_AUTO_SCALE: usize = 8;

/// Two stacked pixels
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cell {
    pub top: Color,
    pub bottom: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            top: Color::Transparent,
            bottom: Color::Transparent,
        }
    }
}

impl Cell {
    /// Glyph, foreground and background for this cell
    fn paint(&self) -> (char, Color, Color) {
        match (self.top.is_transparent(), self.bottom.is_transparent()) {
            (true, true) => (' ', Color::Transparent, Color::Transparent),
            (true, false) => ('▄', self.bottom, Color::Transparent),
            (false, _) => ('▀', self.top, self.bottom),
        }
    }
}

/// Double-buffered grid of half-block cells
#[derive(Default)]
pub struct Screen {
    width: usize,
    height: usize,
    front: Vec<Option<Cell>>, // Currently displayed
    back: Vec<Cell>,          // Being drawn to
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scale that fits a canvas of `side` pixels into `columns` text columns
    pub fn fit_scale(side: usize, columns: usize) -> usize {
        (columns / side.max(1)).clamp(1, MAX_AUTO_SCALE)
    }

    /// Size in text cells (width, height)
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.height && col < self.width {
            Some(self.back[row * self.width + col])
        } else {
            None
        }
    }

    /// Lay out the canvas into the back buffer, every pixel `scale` cells
    /// wide and `scale` half-cells tall
    pub fn draw(&mut self, canvas: &dyn Canvas, scale: usize) {
        let scale = scale.max(1);
        let side = usize::try_from(canvas.size()).unwrap_or(0);
        let pixel_rows = side * scale;
        let width = side * scale;
        let height = pixel_rows.div_ceil(2);

        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.back = vec![Cell::default(); width * height];
            self.invalidate();
        }

        let pixel = |col: usize, pixel_row: usize| {
            if pixel_row >= pixel_rows {
                return Color::Transparent;
            }
            canvas.get_pixel((col / scale) as i32, (pixel_row / scale) as i32)
        };

        for row in 0..height {
            for col in 0..width {
                self.back[row * width + col] = Cell {
                    top: pixel(col, row * 2),
                    bottom: pixel(col, row * 2 + 1),
                };
            }
        }
    }

    /// The back buffer as text lines, one per cell row
    pub fn to_ansi(&self) -> String {
        let mut out = String::new();
        for row in 0..self.height {
            let mut current: Option<(Color, Color)> = None;
            for cell in &self.back[row * self.width..(row + 1) * self.width] {
                let (ch, fg, bg) = cell.paint();
                if current != Some((fg, bg)) {
                    let _ = write!(out, "\x1b[{};{}m", to_fg_sgr(fg), to_bg_sgr(bg));
                    current = Some((fg, bg));
                }
                out.push(ch);
            }
            out.push_str("\x1b[0m\n");
        }
        out
    }

    /// Force a full redraw on the next flush
    pub fn invalidate(&mut self) {
        self.front = vec![None; self.width * self.height];
    }

    /// Write the cells that changed since the last flush, top-left at (1, 1)
    pub fn flush(&mut self, term: &mut Terminal) -> io::Result<()> {
        let (columns, rows) = term.size();
        for row in 0..self.height.min(rows as usize) {
            for col in 0..self.width.min(columns as usize) {
                let idx = row * self.width + col;
                let cell = self.back[idx];
                if self.front[idx] == Some(cell) {
                    continue;
                }
                let (ch, fg, bg) = cell.paint();
                term.goto(row as u16 + 1, col as u16 + 1)?;
                term.set_colors(fg, bg)?;
                term.write_raw(ch.encode_utf8(&mut [0; 4]))?;
                self.front[idx] = Some(cell);
            }
        }
        term.reset_colors()?;
        term.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixel_walle::PixelCanvas;

    #[test]
    fn test_single_pixel() {
        let canvas = PixelCanvas::new(1);
        let mut screen = Screen::new();
        screen.draw(&canvas, 1);
        assert_eq!(screen.size(), (1, 1));
        assert_eq!(screen.to_ansi(), "\x1b[38;2;255;255;255;49m▀\x1b[0m\n");
    }

    #[test]
    fn test_rows_pair_up() {
        let mut canvas = PixelCanvas::new(2);
        canvas.set_pixel(0, 0, Color::Red);
        canvas.set_pixel(1, 1, Color::Blue);
        let mut screen = Screen::new();
        screen.draw(&canvas, 1);
        assert_eq!(screen.size(), (2, 1));
        assert_eq!(
            screen.get(0, 0),
            Some(Cell {
                top: Color::Red,
                bottom: Color::White
            })
        );
        assert_eq!(
            screen.get(0, 1),
            Some(Cell {
                top: Color::White,
                bottom: Color::Blue
            })
        );
        let ansi = screen.to_ansi();
        assert!(ansi.starts_with("\x1b[38;2;255;0;0;48;2;255;255;255m▀"));
        assert!(ansi.contains("\x1b[38;2;255;255;255;48;2;0;0;255m▀"));
    }

    #[test]
    fn test_scale_and_transparent() {
        let mut canvas = PixelCanvas::new(1);
        canvas.set_pixel(0, 0, Color::Transparent);
        let mut screen = Screen::new();
        screen.draw(&canvas, 2);
        assert_eq!(screen.size(), (2, 1));
        // one color change for the whole row
        assert_eq!(screen.to_ansi(), "\x1b[39;49m  \x1b[0m\n");
    }

    #[test]
    fn test_fit_scale() {
        assert_eq!(Screen::fit_scale(32, 80), 2);
        assert_eq!(Screen::fit_scale(100, 80), 1);
        assert_eq!(Screen::fit_scale(2, 200), MAX_AUTO_SCALE);
        assert_eq!(Screen::fit_scale(0, 80), MAX_AUTO_SCALE);
    }
}
