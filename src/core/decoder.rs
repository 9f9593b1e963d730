//! Key decoder
//!
//! Classifies raw input bytes into menu key events, one byte at a time.
//!
//! # Lone ESC versus arrow keys
//!
//! An arrow key arrives as `ESC [ A` (or `ESC O A` in application cursor
//! mode), a bare Escape keypress as a single `ESC`. The decoder tells them
//! apart by asking whether more bytes are *already buffered* when the `ESC`
//! is seen. This depends on input latency: a slow link that delivers an
//! arrow sequence split across reads decodes as a lone ESC followed by
//! ignored bytes. That is an accepted limitation, not a bug to paper over
//! with a timeout.
//!
//! For the same reason a sequence is only matched once nothing more is
//! buffered. A key-repeat burst such as `ESC [ B ESC [ B` read in one go
//! collapses into a single `ArrowDown` (the trailing three bytes), with the
//! earlier bytes reported as `Ignored`.

/// Carriage return, sent by Enter in raw mode.
pub const CONFIRM: u8 = b'\r';
/// Escape lead byte.
pub const ESCAPE: u8 = 0x1b;
/// DEL, sent by Backspace in raw mode.
pub const BACKSPACE: u8 = 0x7f;

const ARROW_UP: [&[u8]; 2] = [b"\x1b[A", b"\x1bOA"];
const ARROW_DOWN: [&[u8]; 2] = [b"\x1b[B", b"\x1bOB"];
const ARROW_SEQ_LEN: usize = 3;

/// Semantic input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// Decimal digit 0-9.
    Digit(u8),
    Backspace,
    Confirm,
    /// ESC with nothing buffered behind it.
    EscapeLead,
    ArrowUp,
    ArrowDown,
    /// No effect on the selection (including partial escape sequences).
    Ignored,
}

/// Arrow sequence alphabet.
#[inline]
fn is_sequence_byte(byte: u8) -> bool {
    matches!(byte, ESCAPE | b'[' | b'O' | b'A' | b'B')
}

/// Stateful byte-to-event decoder.
///
/// The only state carried between calls is the partial escape sequence.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    sequence: Vec<u8>,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self {
            sequence: Vec::with_capacity(ARROW_SEQ_LEN * 2),
        }
    }

    /// Decode one byte.
    ///
    /// `pending` must report whether further input is already buffered at
    /// the moment this byte was read.
    pub fn feed(&mut self, byte: u8, pending: bool) -> KeyEvent {
        match byte {
            CONFIRM => KeyEvent::Confirm,
            ESCAPE if !pending => {
                self.sequence.clear();
                KeyEvent::EscapeLead
            }
            BACKSPACE => KeyEvent::Backspace,
            b'0'..=b'9' => KeyEvent::Digit(byte - b'0'),
            b if is_sequence_byte(b) => self.push_sequence(b, pending),
            _ => KeyEvent::Ignored,
        }
    }

    /// Whether a partial escape sequence is buffered.
    pub fn in_sequence(&self) -> bool {
        !self.sequence.is_empty()
    }

    fn push_sequence(&mut self, byte: u8, pending: bool) -> KeyEvent {
        self.sequence.push(byte);
        if pending || self.sequence.len() < ARROW_SEQ_LEN {
            return KeyEvent::Ignored;
        }

        let tail = &self.sequence[self.sequence.len() - ARROW_SEQ_LEN..];
        let event = if ARROW_UP.contains(&tail) {
            KeyEvent::ArrowUp
        } else if ARROW_DOWN.contains(&tail) {
            KeyEvent::ArrowDown
        } else {
            tracing::debug!("Unknown escape sequence: {:?}", self.sequence);
            KeyEvent::Ignored
        };
        self.sequence.clear();
        event
    }
}
