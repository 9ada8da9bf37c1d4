//! Terminal handling with raw ANSI escape sequences

use std::io::{self, Write};

use pixel_walle::Color;

/// Foreground SGR parameters for a palette color (true color). Transparent
/// maps to the terminal's default foreground.
pub fn to_fg_sgr(color: Color) -> String {
    if color.is_transparent() {
        return "39".to_string();
    }
    let [r, g, b, _] = color.rgba();
    format!("38;2;{};{};{}", r, g, b)
}

/// Background SGR parameters for a palette color. Transparent maps to the
/// terminal's default background.
pub fn to_bg_sgr(color: Color) -> String {
    if color.is_transparent() {
        return "49".to_string();
    }
    let [r, g, b, _] = color.rgba();
    format!("48;2;{};{};{}", r, g, b)
}

/// Whether stdout is attached to a terminal
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDOUT_FILENO) == 1 }
}

/// Query (columns, rows) with ioctl
pub fn query_size() -> Option<(u16, u16)> {
    unsafe {
        let mut ws: libc::winsize = std::mem::zeroed();
        if libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) == 0 && ws.ws_col > 0 {
            Some((ws.ws_col, ws.ws_row))
        } else {
            None
        }
    }
}

/// Full-screen output used while animating. The cursor is hidden for the
/// terminal's lifetime and restored on drop.
pub struct Terminal {
    stdout: io::Stdout,
    width: u16,
    height: u16,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let mut term = Self {
            stdout: io::stdout(),
            width: 80,
            height: 24,
        };
        term.update_size();

        term.hide_cursor()?;
        term.clear()?;
        term.goto(1, 1)?;
        term.flush()?;
        Ok(term)
    }

    /// Get terminal dimensions
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn update_size(&mut self) {
        if let Some((width, height)) = query_size() {
            self.width = width;
            self.height = height;
        }
    }

    pub fn write_raw(&mut self, s: &str) -> io::Result<()> {
        self.stdout.write_all(s.as_bytes())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }

    /// Move cursor to position (1-based, like ANSI)
    pub fn goto(&mut self, row: u16, col: u16) -> io::Result<()> {
        write!(self.stdout, "\x1b[{};{}H", row, col)
    }

    pub fn set_colors(&mut self, fg: Color, bg: Color) -> io::Result<()> {
        write!(self.stdout, "\x1b[{};{}m", to_fg_sgr(fg), to_bg_sgr(bg))
    }

    pub fn reset_colors(&mut self) -> io::Result<()> {
        self.write_raw("\x1b[0m")
    }

    pub fn clear(&mut self) -> io::Result<()> {
        self.write_raw("\x1b[2J")
    }

    pub fn show_cursor(&mut self) -> io::Result<()> {
        self.write_raw("\x1b[?25h")
    }

    pub fn hide_cursor(&mut self) -> io::Result<()> {
        self.write_raw("\x1b[?25l")
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.reset_colors();
        let _ = self.show_cursor();
        let _ = self.flush();
    }
}
