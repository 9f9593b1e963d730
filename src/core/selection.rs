//! Selection state machine
//!
//! Tracks the digit buffer the user is typing and the cursor it resolves to.
//! Cursor `0` is the "nothing selected" sentinel and only occurs while the
//! buffer is empty; every other value lies within `[first, last]`.

use super::decoder::KeyEvent;

/// Inclusive range of selectable display positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub first: usize,
    pub last: usize,
}

impl Bounds {
    pub fn new(first: usize, last: usize) -> Self {
        debug_assert!(first >= 1 && first <= last);
        Self { first, last }
    }

    pub fn contains(&self, pos: usize) -> bool {
        (self.first..=self.last).contains(&pos)
    }

    pub fn clamp(&self, pos: usize) -> usize {
        pos.clamp(self.first, self.last)
    }
}

/// Outcome of applying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Keep reading; the cursor may or may not have moved.
    Continue,
    /// A valid selection was confirmed.
    Confirmed(usize),
}

/// Digit buffer plus resolved cursor for one menu frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    buffer: String,
    cursor: usize,
    bounds: Bounds,
}

impl SelectionState {
    /// Start a frame, seeding the buffer with the previously confirmed cursor.
    ///
    /// A seed outside the current bounds (the layout shrank) starts empty.
    pub fn new(bounds: Bounds, seed: usize) -> Self {
        let mut state = Self {
            buffer: String::new(),
            cursor: 0,
            bounds,
        };
        if bounds.contains(seed) {
            state.set_cursor(seed);
        }
        state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Apply one key event.
    pub fn apply(&mut self, event: KeyEvent) -> Transition {
        match event {
            KeyEvent::Digit(d) => {
                self.buffer.push(char::from(b'0' + d));
                // Overflow parses as 0 and clamps up to the first position.
                let pos = parse_buffer(&self.buffer).unwrap_or(0);
                self.set_cursor(self.bounds.clamp(pos));
            }
            KeyEvent::Backspace => {
                if self.buffer.pop().is_some() {
                    self.cursor = parse_buffer(&self.buffer).unwrap_or(0);
                }
            }
            KeyEvent::ArrowUp => {
                let pos = match self.cursor {
                    0 => self.bounds.last,
                    c if c <= self.bounds.first => self.bounds.first,
                    c => c - 1,
                };
                self.set_cursor(pos);
            }
            KeyEvent::ArrowDown => {
                let pos = if self.cursor >= self.bounds.last {
                    self.bounds.last
                } else {
                    self.cursor + 1
                };
                self.set_cursor(pos);
            }
            KeyEvent::EscapeLead => self.reset(),
            KeyEvent::Confirm => {
                if let Some(pos) = self.confirmable() {
                    return Transition::Confirmed(pos);
                }
            }
            KeyEvent::Ignored => {}
        }
        Transition::Continue
    }

    /// The position a Confirm would accept right now, if any.
    pub fn confirmable(&self) -> Option<usize> {
        parse_buffer(&self.buffer).filter(|pos| self.bounds.contains(*pos))
    }

    fn set_cursor(&mut self, pos: usize) {
        self.cursor = pos;
        self.buffer = pos.to_string();
    }

    fn reset(&mut self) {
        self.cursor = 0;
        self.buffer.clear();
    }
}

/// Parse the digit buffer; `None` when empty or not a valid number.
fn parse_buffer(buffer: &str) -> Option<usize> {
    if buffer.is_empty() {
        return None;
    }
    buffer.parse().ok()
}
