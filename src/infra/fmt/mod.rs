//! Truncation-safe text formatting into caller-supplied buffers.
//!
//! Firmware has no heap, so every piece of text (log lines, rendered
//! diagnostic values) is produced through [`BoundedWriter`]: a
//! [`core::fmt::Write`] adapter that copies what fits into a fixed byte
//! buffer and silently discards the rest. Writes never fail and never touch
//! memory past the buffer.

use core::fmt;

/// `fmt::Write` sink over a borrowed byte buffer.
///
/// Output is cut at the last UTF-8 character boundary that fits, so the
/// written prefix is always valid UTF-8.
pub struct BoundedWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
    truncated: bool,
}

impl<'a> BoundedWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            len: 0,
            truncated: false,
        }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether any output was discarded for lack of space.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// View the written prefix as text.
    pub fn as_str(&self) -> &str {
        // Only whole characters are ever copied in, see write_str.
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    /// Consume the writer and return the written prefix with the buffer's
    /// lifetime.
    pub fn into_str(self) -> &'a str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }
}

impl fmt::Write for BoundedWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let available = self.buf.len() - self.len;
        if s.len() <= available {
            self.buf[self.len..self.len + s.len()].copy_from_slice(s.as_bytes());
            self.len += s.len();
            return Ok(());
        }

        // Back off to a character boundary so the prefix stays valid UTF-8.
        let mut cut = available;
        while cut > 0 && !s.is_char_boundary(cut) {
            cut -= 1;
        }
        self.buf[self.len..self.len + cut].copy_from_slice(&s.as_bytes()[..cut]);
        self.len += cut;
        self.truncated = true;
        // Truncation is the documented behavior, not a formatting failure.
        Ok(())
    }
}
