//! Byte-level input sources
//!
//! The menu reads the terminal one byte at a time and needs to know whether
//! more bytes are *already buffered* to tell a lone ESC apart from the start
//! of an arrow sequence. `StdinInput` therefore bypasses `std::io::Stdin`'s
//! internal buffer and talks to file descriptor 0 directly.

use std::io;

/// A source of raw input bytes.
pub trait InputSource {
    /// Blocking read of a single byte. `Ok(None)` means end of input.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Wait up to `timeout_ms` for input to become readable.
    ///
    /// A negative timeout blocks indefinitely, zero polls once.
    fn poll_pending(&mut self, timeout_ms: i32) -> io::Result<bool>;

    /// Whether at least one byte can be read without blocking.
    fn has_pending(&mut self) -> io::Result<bool> {
        self.poll_pending(0)
    }
}

/// Unbuffered standard input.
#[derive(Debug, Default)]
pub struct StdinInput;

impl StdinInput {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl InputSource for StdinInput {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        loop {
            let n = unsafe {
                libc::read(
                    libc::STDIN_FILENO,
                    &mut byte as *mut u8 as *mut libc::c_void,
                    1,
                )
            };
            if n == 1 {
                return Ok(Some(byte));
            }
            if n == 0 {
                return Ok(None);
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    fn poll_pending(&mut self, timeout_ms: i32) -> io::Result<bool> {
        let mut fds = libc::pollfd {
            fd: libc::STDIN_FILENO,
            events: libc::POLLIN,
            revents: 0,
        };
        loop {
            let ready = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
            if ready >= 0 {
                return Ok(ready > 0 && fds.revents & libc::POLLIN != 0);
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }
}

#[cfg(not(unix))]
impl InputSource for StdinInput {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        use std::io::Read;

        let mut buf = [0u8; 1];
        match io::stdin().lock().read(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }

    // No readiness primitive here: every ESC decodes as a lone ESC.
    fn poll_pending(&mut self, _timeout_ms: i32) -> io::Result<bool> {
        Ok(false)
    }
}

/// Check whether Enter has been pressed on standard input within `timeout_ms`.
///
/// Negative timeout blocks until input arrives, zero checks once without
/// blocking. When input is ready, everything up to and including the next
/// line terminator is consumed. Must not run while a menu session is reading
/// the same stream.
pub fn is_confirm_pending(timeout_ms: i32) -> io::Result<bool> {
    confirm_pending_in(&mut StdinInput::new(), timeout_ms)
}

/// [`is_confirm_pending`] over an arbitrary source.
pub fn confirm_pending_in<I: InputSource + ?Sized>(
    source: &mut I,
    timeout_ms: i32,
) -> io::Result<bool> {
    if !source.poll_pending(timeout_ms)? {
        return Ok(false);
    }
    loop {
        match source.read_byte()? {
            Some(b'\n') | Some(b'\r') => return Ok(true),
            Some(_) => continue,
            None => return Ok(false),
        }
    }
}

/// Scripted input for tests.
///
/// Bytes are delivered in chunks. Bytes left in the current chunk count as
/// already buffered; the next chunk only arrives on a blocking read or a
/// blocking poll.
#[cfg(test)]
pub(crate) struct ScriptedInput {
    current: std::collections::VecDeque<u8>,
    chunks: std::collections::VecDeque<std::collections::VecDeque<u8>>,
}

#[cfg(test)]
impl ScriptedInput {
    pub(crate) fn new(chunks: &[&[u8]]) -> Self {
        let mut chunks: std::collections::VecDeque<std::collections::VecDeque<u8>> =
            chunks.iter().map(|c| c.iter().copied().collect()).collect();
        Self {
            current: chunks.pop_front().unwrap_or_default(),
            chunks,
        }
    }

    /// One chunk per byte: nothing is ever pending.
    pub(crate) fn keystrokes(bytes: &[u8]) -> Self {
        let chunks: Vec<&[u8]> = bytes.chunks(1).collect();
        Self::new(&chunks)
    }

    pub(crate) fn remaining(&self) -> usize {
        self.current.len() + self.chunks.iter().map(|c| c.len()).sum::<usize>()
    }

    fn arrive(&mut self) {
        while self.current.is_empty() {
            match self.chunks.pop_front() {
                Some(next) => self.current = next,
                None => break,
            }
        }
    }
}

#[cfg(test)]
impl InputSource for ScriptedInput {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        self.arrive();
        Ok(self.current.pop_front())
    }

    fn poll_pending(&mut self, timeout_ms: i32) -> io::Result<bool> {
        if timeout_ms != 0 {
            self.arrive();
        }
        Ok(!self.current.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_pending_respects_chunks() {
        let mut input = ScriptedInput::new(&[b"\x1b[A", b"1"]);
        assert_eq!(input.read_byte().unwrap(), Some(0x1b));
        assert!(input.has_pending().unwrap());
        input.read_byte().unwrap();
        input.read_byte().unwrap();
        // Chunk boundary: nothing buffered yet.
        assert!(!input.has_pending().unwrap());
        assert!(input.poll_pending(-1).unwrap());
        assert_eq!(input.read_byte().unwrap(), Some(b'1'));
        assert_eq!(input.read_byte().unwrap(), None);
    }

    #[test]
    fn test_confirm_pending_drains_through_newline() {
        let mut input = ScriptedInput::new(&[b"abc\nrest"]);
        assert!(confirm_pending_in(&mut input, 0).unwrap());
        assert_eq!(input.remaining(), 4);
    }

    #[test]
    fn test_confirm_pending_nothing_ready() {
        let mut input = ScriptedInput::new(&[]);
        assert!(!confirm_pending_in(&mut input, 0).unwrap());
        assert!(!confirm_pending_in(&mut input, 50).unwrap());
    }

    #[test]
    fn test_confirm_pending_eof_before_terminator() {
        let mut input = ScriptedInput::new(&[b"xyz"]);
        assert!(!confirm_pending_in(&mut input, -1).unwrap());
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn test_confirm_pending_accepts_carriage_return() {
        let mut input = ScriptedInput::new(&[b"\r"]);
        assert!(confirm_pending_in(&mut input, -1).unwrap());
    }
}
