//! Scoped raw terminal sessions
//!
//! Reading keys one byte at a time needs raw, non-echoing input. A
//! [`RawSession`] switches the terminal into that mode for exactly one
//! input-reading phase and always switches it back when dropped, including
//! on early return, error propagation and unwinding.

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal,
};
use tracing::warn;

/// Terminal mode switching used by the menu.
pub trait TerminalControl {
    fn enable_raw(&mut self) -> io::Result<()>;
    fn disable_raw(&mut self) -> io::Result<()>;
    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()>;
}

/// The real terminal, via crossterm.
#[derive(Debug, Default)]
pub struct CrosstermTerminal;

impl CrosstermTerminal {
    pub fn new() -> Self {
        Self
    }
}

impl TerminalControl for CrosstermTerminal {
    fn enable_raw(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()
    }

    fn disable_raw(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        let mut stdout = io::stdout();
        if visible {
            execute!(stdout, Show)?;
        } else {
            execute!(stdout, Hide)?;
        }
        stdout.flush()
    }
}

/// RAII guard holding the terminal in raw mode.
///
/// Failures while switching modes are logged and otherwise ignored: a menu
/// that cannot hide the cursor is still usable. Restoration is attempted
/// exactly once per acquisition whether or not acquisition succeeded.
pub struct RawSession<'a, T: TerminalControl + ?Sized> {
    terminal: &'a mut T,
    hide_cursor: bool,
}

impl<'a, T: TerminalControl + ?Sized> RawSession<'a, T> {
    pub fn acquire(terminal: &'a mut T, hide_cursor: bool) -> Self {
        if let Err(e) = terminal.enable_raw() {
            warn!("Failed to enable raw mode: {}", e);
        }
        if hide_cursor {
            if let Err(e) = terminal.set_cursor_visible(false) {
                warn!("Failed to hide cursor: {}", e);
            }
        }
        Self { terminal, hide_cursor }
    }
}

impl<T: TerminalControl + ?Sized> Drop for RawSession<'_, T> {
    fn drop(&mut self) {
        if self.hide_cursor {
            if let Err(e) = self.terminal.set_cursor_visible(true) {
                warn!("Failed to show cursor: {}", e);
            }
        }
        if let Err(e) = self.terminal.disable_raw() {
            warn!("Failed to restore terminal mode: {}", e);
        }
    }
}

/// Records mode switches for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingTerminal {
    pub calls: Vec<&'static str>,
    pub fail_enable: bool,
    pub raw: bool,
}

#[cfg(test)]
impl TerminalControl for RecordingTerminal {
    fn enable_raw(&mut self) -> io::Result<()> {
        self.calls.push("raw");
        if self.fail_enable {
            return Err(io::Error::new(io::ErrorKind::Other, "not a tty"));
        }
        self.raw = true;
        Ok(())
    }

    fn disable_raw(&mut self) -> io::Result<()> {
        self.calls.push("cooked");
        self.raw = false;
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        self.calls.push(if visible { "show" } else { "hide" });
        Ok(())
    }
}
