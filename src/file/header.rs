use crate::{
    HeaderError, ParseError,
    file::{Division, FormatType},
    reader::{ReadResult, Reader},
};

/// The four byte magic that opens every file.
pub const HEADER_MAGIC: [u8; 4] = *b"MThd";

/// Length of the header chunk including its magic and length fields.
pub const HEADER_LEN: usize = 14;

#[doc = r#"
The decoded `MThd` chunk.

```text
4D 54 68 64   "MThd"
00 00 00 06   chunk length, always 6
ff ff         format 0, 1 or 2
nn nn         track count
dd dd         division
```

A header is only ever returned whole; any invalid field is an error.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    format: FormatType,
    track_count: u16,
    division: Division,
}

impl Header {
    /// Build a header, checking the track count against the format.
    pub const fn new(
        format: FormatType,
        track_count: u16,
        division: Division,
    ) -> Result<Self, HeaderError> {
        if !format.accepts_track_count(track_count) {
            return Err(HeaderError::TrackCount {
                format: format as u16,
                count: track_count,
            });
        }
        Ok(Self {
            format,
            track_count,
            division,
        })
    }

    /// Decode the header from the front of `bytes`.
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        Self::read(&mut Reader::from_byte_slice(bytes))
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        if reader.remaining() < HEADER_LEN {
            return Err(reader.error(ParseError::IncompleteHeader));
        }
        let magic = reader.read_exact_size::<4>()?;
        if magic != HEADER_MAGIC {
            return Err(reader.error(ParseError::InvalidMagicNumber(magic)));
        }
        let length = reader.read_u32()?;
        if length != 6 {
            return Err(reader.error(HeaderError::ChunkLength(length).into()));
        }
        let raw_format = reader.read_u16()?;
        let format = FormatType::try_from(raw_format)
            .map_err(|_| reader.error(HeaderError::Format(raw_format).into()))?;
        let track_count = reader.read_u16()?;
        let division = Division::from_raw(reader.read_u16()?)
            .map_err(|e| reader.error(e.into()))?;

        Self::new(format, track_count, division).map_err(|e| reader.error(e.into()))
    }

    /// Encode the header back into its 14 bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0; HEADER_LEN];
        out[0..4].copy_from_slice(&HEADER_MAGIC);
        out[4..8].copy_from_slice(&6u32.to_be_bytes());
        out[8..10].copy_from_slice(&(self.format as u16).to_be_bytes());
        out[10..12].copy_from_slice(&self.track_count.to_be_bytes());
        out[12..14].copy_from_slice(&self.division.to_raw().to_be_bytes());
        out
    }

    /// How the tracks relate
    pub const fn format(&self) -> FormatType {
        self.format
    }
    /// The declared number of track chunks
    pub const fn track_count(&self) -> u16 {
        self.track_count
    }
    /// The length of a tick
    pub const fn division(&self) -> Division {
        self.division
    }
}

#[cfg(test)]
fn header_bytes(format: u16, tracks: u16, division: u16) -> [u8; HEADER_LEN] {
    let mut out = [0; HEADER_LEN];
    out[0..4].copy_from_slice(b"MThd");
    out[4..8].copy_from_slice(&6u32.to_be_bytes());
    out[8..10].copy_from_slice(&format.to_be_bytes());
    out[10..12].copy_from_slice(&tracks.to_be_bytes());
    out[12..14].copy_from_slice(&division.to_be_bytes());
    out
}

#[test]
fn parses_valid_headers() {
    use pretty_assertions::assert_eq;
    let header = Header::parse(&header_bytes(1, 4, 480)).unwrap();
    assert_eq!(header.format(), FormatType::MultiSync);
    assert_eq!(header.track_count(), 4);
    assert_eq!(header.division().ticks_per_quarter(), Some(480));
    assert_eq!(header.to_bytes(), header_bytes(1, 4, 480));

    let header = Header::parse(&header_bytes(0, 1, 0xE250)).unwrap();
    assert_eq!(header.format(), FormatType::Single);
    let smpte = header.division().smpte().unwrap();
    assert_eq!(smpte.ticks_per_frame(), 80);
}

#[test]
fn format_zero_needs_one_track() {
    let err = Header::parse(&header_bytes(0, 2, 96)).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ParseError::InvalidHeaderLength(HeaderError::TrackCount {
            format: 0,
            count: 2
        })
    );
    assert!(Header::parse(&header_bytes(2, 0, 96)).is_err());
}

#[test]
fn rejects_bad_framing() {
    let bytes = header_bytes(1, 1, 96);
    assert_eq!(
        Header::parse(&bytes[..10]).unwrap_err().error_kind(),
        &ParseError::IncompleteHeader
    );

    let mut bad_magic = bytes;
    bad_magic[0] = b'X';
    assert_eq!(
        Header::parse(&bad_magic).unwrap_err().error_kind(),
        &ParseError::InvalidMagicNumber(*b"XThd")
    );

    let mut bad_len = bytes;
    bad_len[7] = 7;
    assert_eq!(
        Header::parse(&bad_len).unwrap_err().error_kind(),
        &ParseError::InvalidHeaderLength(HeaderError::ChunkLength(7))
    );

    assert_eq!(
        Header::parse(&header_bytes(3, 1, 96)).unwrap_err().error_kind(),
        &ParseError::InvalidHeaderLength(HeaderError::Format(3))
    );
}

#[test]
fn rejects_zero_ticks_per_quarter() {
    let err = Header::parse(&header_bytes(0, 1, 0)).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ParseError::InvalidHeaderLength(HeaderError::TicksPerQuarter(0))
    );

    let division = Division::new_ticks_per_quarter_note(96).unwrap();
    let header = Header::new(FormatType::Single, 1, division).unwrap();
    assert_eq!(header.to_bytes(), header_bytes(0, 1, 96));
}

#[test]
fn rejects_invalid_smpte_rate() {
    // -23 fps in the high byte
    let err = Header::parse(&header_bytes(1, 1, 0xE904)).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ParseError::InvalidHeaderLength(HeaderError::SmpteFrameRate(-23))
    );
}
