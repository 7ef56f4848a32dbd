#![doc = r#"
Skipping manufacturer-exclusive blocks.

A block opens with the `0xF0` status and runs until a `0xF7` terminator.
Its contents are opaque, so they are only walked, never stored:

- every byte before the terminator must be a data byte (`< 0x80`);
- the terminator must appear within the configured limit;
- the input must not end first.

The leading bytes name the manufacturer, either one byte or `0x00`
followed by two more. The id is only reported to diagnostics.
"#]

use crate::{
    SysExError,
    reader::{ReadResult, Reader},
};

const TERMINATOR: u8 = 0xF7;

/// The default limit on the length of a block, 64 KiB.
pub const DEFAULT_SYSEX_LIMIT: usize = 64 * 1024;

/// Who a system-exclusive block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ManufacturerId {
    /// A one byte id, `0x01..=0x7F`
    Short(u8),
    /// `0x00` followed by two bytes
    Extended(u8, u8),
}

impl ManufacturerId {
    /// Read the id from the start of a block's body.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        match body {
            [0x00, a, b, ..] => Some(Self::Extended(*a, *b)),
            [0x00, ..] => None,
            [id, ..] => Some(Self::Short(*id)),
            [] => None,
        }
    }
}

/// Consume one block, the `0xF0` status already read.
///
/// On success the reader sits just past the terminator and the number of
/// body bytes skipped is returned.
pub(crate) fn skip(reader: &mut Reader<'_>, limit: usize) -> ReadResult<usize> {
    let rest = reader.rest();
    let window = &rest[..rest.len().min(limit.saturating_add(1))];

    for (len, &byte) in window.iter().enumerate() {
        if byte == TERMINATOR {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                position = reader.buffer_position(),
                len,
                manufacturer = ?ManufacturerId::from_body(&window[..len]),
                "skipping system exclusive block"
            );
            reader.skip(len + 1)?;
            return Ok(len);
        }
        if byte & 0x80 != 0 {
            reader.skip(len)?;
            return Err(reader.error(SysExError::Framing(byte).into()));
        }
    }

    if rest.len() > limit {
        reader.skip(limit)?;
        Err(reader.error(SysExError::Limit(limit).into()))
    } else {
        reader.skip(rest.len())?;
        Err(reader.error(SysExError::Unterminated.into()))
    }
}

#[cfg(test)]
use crate::ParseError;

#[test]
fn skips_to_terminator() {
    let bytes = [0x43, 0x12, 0x00, 0xF7, 0x00];
    let mut reader = Reader::from_byte_slice(&bytes);
    assert_eq!(skip(&mut reader, DEFAULT_SYSEX_LIMIT).unwrap(), 3);
    assert_eq!(reader.buffer_position(), 4);
}

#[test]
fn empty_block() {
    let mut reader = Reader::from_byte_slice(&[0xF7]);
    assert_eq!(skip(&mut reader, DEFAULT_SYSEX_LIMIT).unwrap(), 0);
    assert!(reader.is_at_end());
}

#[test]
fn rejects_status_inside_block() {
    let bytes = [0x43, 0x90, 0xF7];
    let mut reader = Reader::from_byte_slice(&bytes);
    let err = skip(&mut reader, DEFAULT_SYSEX_LIMIT).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ParseError::TruncatedSysEx(SysExError::Framing(0x90))
    );
    assert_eq!(err.position(), 1);
}

#[test]
fn rejects_unterminated_block() {
    let bytes = [0x43, 0x12, 0x00];
    let mut reader = Reader::from_byte_slice(&bytes);
    let err = skip(&mut reader, DEFAULT_SYSEX_LIMIT).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ParseError::TruncatedSysEx(SysExError::Unterminated)
    );
}

#[test]
fn enforces_limit() {
    let mut bytes = alloc::vec![0x01; DEFAULT_SYSEX_LIMIT + 10];
    bytes.push(0xF7);
    let mut reader = Reader::from_byte_slice(&bytes);
    let err = skip(&mut reader, DEFAULT_SYSEX_LIMIT).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ParseError::TruncatedSysEx(SysExError::Limit(DEFAULT_SYSEX_LIMIT))
    );

    // a terminator exactly at the limit is still accepted
    let mut bytes = alloc::vec![0x01; 4];
    bytes.push(0xF7);
    let mut reader = Reader::from_byte_slice(&bytes);
    assert_eq!(skip(&mut reader, 4).unwrap(), 4);
}

#[test]
fn manufacturer_ids() {
    assert_eq!(
        ManufacturerId::from_body(&[0x43, 0x10]),
        Some(ManufacturerId::Short(0x43))
    );
    assert_eq!(
        ManufacturerId::from_body(&[0x00, 0x20, 0x29, 0x01]),
        Some(ManufacturerId::Extended(0x20, 0x29))
    );
    assert_eq!(ManufacturerId::from_body(&[0x00, 0x20]), None);
    assert_eq!(ManufacturerId::from_body(&[]), None);
}
