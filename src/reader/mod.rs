#![doc = r#"
A forward-only cursor over an in-memory MIDI buffer.

The [`Reader`] never copies: every read hands back either a small
fixed-size array or a sub-slice of the original buffer. Positions reported
in errors are absolute, offset by the `base` the reader was created with,
so a reader over one track chunk still reports offsets into the file.
"#]

mod error;
pub use error::*;

use crate::{ParseError, vlq};

/// A byte cursor with position-tagged errors.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    position: usize,
    base: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader over the full slice, starting at offset 0.
    pub const fn from_byte_slice(data: &'a [u8]) -> Self {
        Self::with_base(data, 0)
    }

    /// Create a reader whose reported positions start at `base`.
    pub const fn with_base(data: &'a [u8], base: usize) -> Self {
        Self {
            data,
            position: 0,
            base,
        }
    }

    /// The absolute position of the next unread byte.
    #[inline]
    pub const fn buffer_position(&self) -> usize {
        self.base + self.position
    }

    /// Bytes left to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// True once every byte has been consumed.
    #[inline]
    pub const fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    /// The unread tail of the buffer.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    /// An error of `kind` at the current position.
    #[inline]
    pub const fn error(&self, kind: ParseError) -> ReaderError {
        ReaderError::new(self.buffer_position(), kind)
    }

    /// Look at the next byte without consuming it.
    #[inline]
    pub fn peek_next(&self) -> ReadResult<u8> {
        self.data
            .get(self.position)
            .copied()
            .ok_or_else(|| ReaderError::eof(self.buffer_position()))
    }

    /// Consume one byte.
    #[inline]
    pub fn read_next(&mut self) -> ReadResult<u8> {
        let byte = self.peek_next()?;
        self.position += 1;
        Ok(byte)
    }

    /// Consume exactly `N` bytes.
    pub fn read_exact_size<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let slice = self.read_slice(N)?;
        let mut out = [0; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    /// Consume `len` bytes as a borrowed slice.
    pub fn read_slice(&mut self, len: usize) -> ReadResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(ReaderError::eof(self.base + self.data.len()));
        }
        let start = self.position;
        self.position += len;
        Ok(&self.data[start..self.position])
    }

    /// Advance past `len` bytes.
    pub fn skip(&mut self, len: usize) -> ReadResult<()> {
        self.read_slice(len).map(|_| ())
    }

    /// Consume a big-endian u16.
    pub fn read_u16(&mut self) -> ReadResult<u16> {
        self.read_exact_size().map(u16::from_be_bytes)
    }

    /// Consume a big-endian u32.
    pub fn read_u32(&mut self) -> ReadResult<u32> {
        self.read_exact_size().map(u32::from_be_bytes)
    }

    /// Consume one variable-length quantity.
    #[inline]
    pub fn read_vlq(&mut self) -> ReadResult<u32> {
        match vlq::decode(self.rest()) {
            Ok(res) => {
                self.position += res.bytes_consumed;
                Ok(res.value)
            }
            Err(kind) => Err(self.error(kind)),
        }
    }
}

#[test]
fn positions_are_absolute() {
    let bytes = [0x01, 0x02, 0x03];
    let mut reader = Reader::with_base(&bytes, 100);
    assert_eq!(reader.read_next().unwrap(), 0x01);
    assert_eq!(reader.buffer_position(), 101);
    let err = reader.read_slice(5).unwrap_err();
    assert!(err.is_eof());
    assert_eq!(err.position(), 103);
}

#[test]
fn reads_big_endian_fields() {
    let bytes = [0x00, 0x00, 0x00, 0x06, 0x01, 0xE0];
    let mut reader = Reader::from_byte_slice(&bytes);
    assert_eq!(reader.read_u32().unwrap(), 6);
    assert_eq!(reader.read_u16().unwrap(), 480);
    assert!(reader.is_at_end());
    assert!(reader.read_next().unwrap_err().is_eof());
}

#[test]
fn vlq_advances_cursor() {
    let bytes = [0x81, 0x00, 0x7F];
    let mut reader = Reader::from_byte_slice(&bytes);
    assert_eq!(reader.read_vlq().unwrap(), 128);
    assert_eq!(reader.read_vlq().unwrap(), 127);
    assert_eq!(reader.remaining(), 0);
}
