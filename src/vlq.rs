#![doc = r#"
Variable-length quantities.

Delta-times and meta-event lengths are stored big-endian with seven data
bits per byte. A set high bit means another byte follows. At most four
bytes are allowed, which caps the value at `0x0FFFFFFF`.

```text
0x00000000    00
0x0000007F    7F
0x00000080    81 00
0x00003FFF    FF 7F
0x00004000    81 80 00
0x0FFFFFFF    FF FF FF 7F
```
"#]

use crate::ParseError;

/// The largest value a four byte quantity can hold.
pub const MAX_VALUE: u32 = 0x0FFF_FFFF;

const MAX_BYTES: usize = 4;

/// A decoded quantity and how many bytes it occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlqResult {
    /// The decoded value, `0..=0x0FFFFFFF`.
    pub value: u32,
    /// How far to advance the cursor, `1..=4`.
    pub bytes_consumed: usize,
}

/// Decode one quantity from the front of `bytes`.
///
/// # Errors
/// - [`ParseError::UnexpectedEndOfFile`] if `bytes` ends before a byte with
///   a clear high bit.
/// - [`ParseError::InvalidVlqEncoding`] if the fourth byte still has its
///   continuation bit set.
#[inline]
pub fn decode(bytes: &[u8]) -> Result<VlqResult, ParseError> {
    let Some(&first) = bytes.first() else {
        return Err(ParseError::UnexpectedEndOfFile);
    };
    if first & 0x80 == 0 {
        return Ok(VlqResult {
            value: first as u32,
            bytes_consumed: 1,
        });
    }
    decode_multi(bytes, first)
}

#[cold]
fn decode_multi(bytes: &[u8], first: u8) -> Result<VlqResult, ParseError> {
    let mut value = (first & 0x7F) as u32;
    for (i, &byte) in bytes.iter().enumerate().take(MAX_BYTES).skip(1) {
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Ok(VlqResult {
                value,
                bytes_consumed: i + 1,
            });
        }
    }
    if bytes.len() < MAX_BYTES {
        Err(ParseError::UnexpectedEndOfFile)
    } else {
        Err(ParseError::InvalidVlqEncoding)
    }
}

/// Encode `value` into `buf`, returning the minimal encoded slice.
///
/// # Errors
/// [`ParseError::InvalidVlqEncoding`] if `value` exceeds [`MAX_VALUE`].
pub fn encode(value: u32, buf: &mut [u8; 4]) -> Result<&[u8], ParseError> {
    if value > MAX_VALUE {
        return Err(ParseError::InvalidVlqEncoding);
    }
    let mut start = MAX_BYTES - 1;
    buf[start] = (value & 0x7F) as u8;
    let mut rest = value >> 7;
    while rest != 0 {
        start -= 1;
        buf[start] = 0x80 | (rest & 0x7F) as u8;
        rest >>= 7;
    }
    Ok(&buf[start..])
}

#[test]
fn decodes_canonical_vectors() {
    use pretty_assertions::assert_eq;
    let cases: [(&[u8], u32, usize); 6] = [
        (&[0x00], 0, 1),
        (&[0x7F], 127, 1),
        (&[0x81, 0x00], 128, 2),
        (&[0xFF, 0x7F], 16_383, 2),
        (&[0x81, 0x80, 0x00], 16_384, 3),
        (&[0xFF, 0xFF, 0xFF, 0x7F], MAX_VALUE, 4),
    ];
    for (bytes, value, consumed) in cases {
        let res = decode(bytes).unwrap();
        assert_eq!(res.value, value);
        assert_eq!(res.bytes_consumed, consumed);
    }
}

#[test]
fn ignores_trailing_bytes() {
    let res = decode(&[0x81, 0x00, 0x90, 0x3C]).unwrap();
    assert_eq!(res, VlqResult { value: 128, bytes_consumed: 2 });
}

#[test]
fn rejects_five_byte_quantities() {
    assert_eq!(
        decode(&[0x80, 0x80, 0x80, 0x80, 0x00]),
        Err(ParseError::InvalidVlqEncoding)
    );
    assert_eq!(
        decode(&[0xFF, 0xFF, 0xFF, 0xFF]),
        Err(ParseError::InvalidVlqEncoding)
    );
}

#[test]
fn reports_truncation() {
    assert_eq!(decode(&[]), Err(ParseError::UnexpectedEndOfFile));
    assert_eq!(decode(&[0x81, 0x80]), Err(ParseError::UnexpectedEndOfFile));
}

#[test]
fn encodes_minimally() {
    let mut buf = [0; 4];
    assert_eq!(encode(0, &mut buf).unwrap(), &[0x00]);
    assert_eq!(encode(128, &mut buf).unwrap(), &[0x81, 0x00]);
    assert_eq!(encode(16_384, &mut buf).unwrap(), &[0x81, 0x80, 0x00]);
    assert_eq!(encode(MAX_VALUE, &mut buf).unwrap(), &[0xFF, 0xFF, 0xFF, 0x7F]);
    assert_eq!(
        encode(MAX_VALUE + 1, &mut buf),
        Err(ParseError::InvalidVlqEncoding)
    );
}
