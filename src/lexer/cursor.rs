use std::io::Read;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::buffer::DoubleBuffer;

/// Byte reported by [`Cursor::current`] and [`Cursor::peek`] past the end of input.
pub const EOF_BYTE: u8 = 0;

/// Current byte plus line/column bookkeeping over a [`DoubleBuffer`].
///
/// `line`/`column` describe the current byte. Columns count from 1 on each
/// line; the newline byte itself belongs to the line it ends, and the line
/// counter moves on when the cursor advances past it.
pub struct Cursor {
    buffer: DoubleBuffer,
    current: u8,
    at_end: bool,
    line: u32,
    column: u32,
}

impl Cursor {
    /// Opens the buffer and moves onto the first byte of input.
    pub fn new<R>(reader: R, capacity: usize) -> Result<Self, Error>
    where
        R: Read + Send + 'static,
    {
        let buffer = DoubleBuffer::new(reader, capacity)
            .map_err(|err| Error::new(ErrorImpl::Io(err), Position::new(1, 0)))?;

        let mut cursor = Cursor {
            buffer,
            current: EOF_BYTE,
            at_end: false,
            line: 1,
            column: 0,
        };
        cursor.advance()?;
        Ok(cursor)
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn is_eof(&self) -> bool {
        self.at_end
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Moves to the next byte. A no-op once end of input is reached, so the
    /// reported position stays put from then on.
    pub fn advance(&mut self) -> Result<(), Error> {
        if self.at_end {
            return Ok(());
        }

        if self.current == b'\n' {
            self.line += 1;
            self.column = 0;
        }

        let next = self
            .buffer
            .next_byte()
            .map_err(|err| Error::new(ErrorImpl::Io(err), self.position()))?;

        self.column += 1;
        match next {
            Some(byte) => self.current = byte,
            None => {
                self.current = EOF_BYTE;
                self.at_end = true;
            }
        }

        Ok(())
    }

    /// Returns the byte after the current one without moving.
    pub fn peek(&mut self) -> Result<u8, Error> {
        if self.at_end {
            return Ok(EOF_BYTE);
        }

        let next = self
            .buffer
            .peek_byte()
            .map_err(|err| Error::new(ErrorImpl::Io(err), self.position()))?;
        Ok(next.unwrap_or(EOF_BYTE))
    }
}
