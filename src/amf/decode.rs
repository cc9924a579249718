// AMF decoder utilities

use thiserror::Error;

/// Error decoding AMF values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmfDecodeError {
    /// The buffer ended before the value was complete
    #[error("unexpected end of buffer: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// The type marker did not match the expected type
    #[error("unexpected type marker: expected 0x{expected:02x}, found 0x{found:02x}")]
    UnexpectedMarker { expected: u8, found: u8 },

    /// The type marker is valid AMF0 but cannot be decoded or skipped here
    #[error("unsupported type marker: 0x{0:02x}")]
    UnsupportedMarker(u8),

    /// A string value was not valid UTF-8
    #[error("string is not valid UTF-8")]
    InvalidUtf8,
}

/// Cursor for AMF decoding
///
/// The position only moves forward, and only when a read succeeds
pub struct AMFDecodingCursor<'a> {
    /// Buffer being decoded
    buffer: &'a [u8],

    /// Current position
    pos: usize,
}

impl<'a> AMFDecodingCursor<'a> {
    /// Creates new cursor for a buffer
    pub fn new(buffer: &'a [u8]) -> AMFDecodingCursor<'a> {
        AMFDecodingCursor { buffer, pos: 0 }
    }

    /// Current position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes not consumed yet
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.pos
    }

    /// Checks that n more bytes are available
    fn ensure(&self, n: usize) -> Result<(), AmfDecodeError> {
        if n > self.remaining() {
            return Err(AmfDecodeError::UnexpectedEnd {
                needed: n,
                remaining: self.remaining(),
            });
        }

        Ok(())
    }

    /// Reads bytes
    /// Errors on buffer overflow
    pub fn read(&mut self, n: usize) -> Result<&'a [u8], AmfDecodeError> {
        self.ensure(n)?;

        let r = &self.buffer[self.pos..self.pos + n];
        self.pos += n;

        Ok(r)
    }

    /// Reads byte
    pub fn read_byte(&mut self) -> Result<u8, AmfDecodeError> {
        Ok(self.read(1)?[0])
    }

    /// Looks byte, without changing the cursor
    pub fn look_byte(&self) -> Result<u8, AmfDecodeError> {
        self.ensure(1)?;

        Ok(self.buffer[self.pos])
    }

    /// Skips bytes
    pub fn skip(&mut self, n: usize) -> Result<(), AmfDecodeError> {
        self.ensure(n)?;

        self.pos += n;

        Ok(())
    }

    /// Returns true if the cursor is at the end
    pub fn ended(&self) -> bool {
        self.pos >= self.buffer.len()
    }
}
