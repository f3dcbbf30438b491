// src/status/terminal.rs

//! Terminal capability used by the status surface.
//!
//! All escape-sequence handling lives behind [`TerminalBackend`]:
//! - [`CrosstermTerminal`] drives a real interactive terminal.
//! - [`NoopTerminal`] is used when stdout is not a terminal; every operation
//!   succeeds without writing anything.

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU16, Ordering};

use crossterm::cursor::{MoveTo, RestorePosition, SavePosition};
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};

use super::frames::compose_bar;

/// Operations the status surface needs from a terminal.
pub trait TerminalBackend: Send + Sync {
    /// Whether this backend renders anything at all.
    fn is_interactive(&self) -> bool;

    /// Confine scrolling to every row but the last and park the cursor at the
    /// top of the scrolling region.
    fn reserve_bottom_row(&self) -> io::Result<()>;

    /// Draw the bar on the reserved row, leaving the cursor where it was.
    fn draw_bar(&self, text: &str, frame: usize) -> io::Result<()>;

    /// Undo [`reserve_bottom_row`](Self::reserve_bottom_row): full-screen
    /// scrolling, cleared bar row, trailing newline.
    fn restore(&self) -> io::Result<()>;
}

/// Backend for non-interactive output.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTerminal;

impl TerminalBackend for NoopTerminal {
    fn is_interactive(&self) -> bool {
        false
    }

    fn reserve_bottom_row(&self) -> io::Result<()> {
        Ok(())
    }

    fn draw_bar(&self, _text: &str, _frame: usize) -> io::Result<()> {
        Ok(())
    }

    fn restore(&self) -> io::Result<()> {
        Ok(())
    }
}

/// DECSTBM: limit scrolling to rows `top..=bottom` (1-based).
#[derive(Debug, Clone, Copy)]
struct SetScrollRegion(u16, u16);

impl crossterm::Command for SetScrollRegion {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(f, "\x1b[{};{}r", self.0, self.1)
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        Err(io::Error::other("scroll regions require ANSI support"))
    }

    #[cfg(windows)]
    fn is_ansi_code_supported(&self) -> bool {
        true
    }
}

/// DECSTBM without arguments: scrolling region back to the full screen.
#[derive(Debug, Clone, Copy)]
struct ResetScrollRegion;

impl crossterm::Command for ResetScrollRegion {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[r")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        Err(io::Error::other("scroll regions require ANSI support"))
    }

    #[cfg(windows)]
    fn is_ansi_code_supported(&self) -> bool {
        true
    }
}

/// Crossterm-backed terminal writing to stdout.
///
/// The terminal size is captured once in `reserve_bottom_row`; the reserved
/// row and the scroll region are both derived from it.
#[derive(Debug, Default)]
pub struct CrosstermTerminal {
    rows: AtomicU16,
    cols: AtomicU16,
}

impl CrosstermTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    fn bar_row(&self) -> u16 {
        self.rows.load(Ordering::Relaxed).saturating_sub(1)
    }
}

impl TerminalBackend for CrosstermTerminal {
    fn is_interactive(&self) -> bool {
        true
    }

    fn reserve_bottom_row(&self) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        if rows < 2 || cols == 0 {
            return Err(io::Error::other(format!(
                "terminal too small for a status bar ({cols}x{rows})"
            )));
        }
        self.cols.store(cols, Ordering::Relaxed);
        self.rows.store(rows, Ordering::Relaxed);

        let mut out = io::stdout().lock();
        queue!(out, SetScrollRegion(1, rows - 1), MoveTo(0, 0))?;
        out.flush()
    }

    fn draw_bar(&self, text: &str, frame: usize) -> io::Result<()> {
        let width = usize::from(self.cols.load(Ordering::Relaxed));
        if width == 0 {
            return Ok(());
        }
        let line = compose_bar(text, frame, width);

        let mut out = io::stdout().lock();
        queue!(
            out,
            SavePosition,
            MoveTo(0, self.bar_row()),
            Clear(ClearType::CurrentLine),
            SetAttribute(Attribute::Bold),
            SetForegroundColor(Color::Cyan),
            Print(line),
            ResetColor,
            SetAttribute(Attribute::Reset),
            RestorePosition,
        )?;
        out.flush()
    }

    fn restore(&self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        queue!(
            out,
            SavePosition,
            ResetScrollRegion,
            MoveTo(0, self.bar_row()),
            Clear(ClearType::CurrentLine),
            RestorePosition,
            Print("\n"),
        )?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::Command;

    #[test]
    fn scroll_region_sequences() {
        let mut s = String::new();
        SetScrollRegion(1, 23).write_ansi(&mut s).unwrap();
        assert_eq!(s, "\x1b[1;23r");

        let mut s = String::new();
        ResetScrollRegion.write_ansi(&mut s).unwrap();
        assert_eq!(s, "\x1b[r");
    }

    #[test]
    fn noop_terminal_is_silent() {
        let t = NoopTerminal;
        assert!(!t.is_interactive());
        assert!(t.reserve_bottom_row().is_ok());
        assert!(t.draw_bar("x", 3).is_ok());
        assert!(t.restore().is_ok());
    }
}
