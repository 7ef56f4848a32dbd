use crate::{
    ParseError, ParseOptions,
    reader::{ReadResult, Reader, ReaderError},
    track::{TRACK_MAGIC, TrackEvents, TrackParser},
};

#[doc = r#"
One chunk of a file: a four byte id, a big-endian length and that many
bytes of data.

Only `MTrk` chunks are decoded. Other chunks with a printable ASCII id are
carried through untouched so a caller can inspect or skip them.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    id: [u8; 4],
    data: &'a [u8],
    offset: usize,
}

impl<'a> Chunk<'a> {
    /// Read the chunk at the reader's position.
    ///
    /// # Errors
    /// - [`ParseError::UnexpectedEndOfFile`] if fewer than 8 bytes remain.
    /// - [`ParseError::InvalidChunkType`] if the id is not printable ASCII.
    /// - [`ParseError::IncompleteData`] if the length overruns the buffer.
    pub fn read(reader: &mut Reader<'a>) -> ReadResult<Self> {
        let start = reader.buffer_position();
        let id = reader.read_exact_size::<4>()?;
        if !id.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            return Err(ReaderError::new(start, ParseError::InvalidChunkType(id)));
        }
        let declared = reader.read_u32()?;
        let available = reader.remaining();
        if declared as usize > available {
            return Err(ReaderError::new(
                start + 4,
                ParseError::IncompleteData {
                    declared,
                    available,
                },
            ));
        }
        let offset = reader.buffer_position();
        let data = reader.read_slice(declared as usize)?;
        Ok(Self { id, data, offset })
    }

    /// The four byte id
    pub const fn id(&self) -> [u8; 4] {
        self.id
    }

    /// The chunk body, without id or length
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Absolute offset of the body in the file
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// True for `MTrk`
    pub fn is_track(&self) -> bool {
        self.id == TRACK_MAGIC
    }

    /// Decode the body as a track.
    pub fn parse_track(&self, options: &ParseOptions) -> ReadResult<TrackEvents> {
        TrackParser::new(Reader::with_base(self.data, self.offset), options).run()
    }
}

#[test]
fn reads_track_chunk() {
    let bytes = [b'M', b'T', b'r', b'k', 0, 0, 0, 4, 0x00, 0xFF, 0x2F, 0x00, 0xAA];
    let mut reader = Reader::from_byte_slice(&bytes);
    let chunk = Chunk::read(&mut reader).unwrap();
    assert!(chunk.is_track());
    assert_eq!(chunk.offset(), 8);
    assert_eq!(chunk.data(), &[0x00, 0xFF, 0x2F, 0x00]);
    assert_eq!(reader.remaining(), 1);

    let events = chunk.parse_track(&ParseOptions::default()).unwrap();
    assert!(events.ended_explicitly);
}

#[test]
fn rejects_overlong_chunk() {
    let bytes = [b'M', b'T', b'r', b'k', 0, 0, 1, 0, 0x00];
    let err = Chunk::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ParseError::IncompleteData {
            declared: 256,
            available: 1
        }
    );
}

#[test]
fn rejects_binary_ids() {
    let bytes = [0x00, 0x01, 0x02, 0x03, 0, 0, 0, 0];
    let err = Chunk::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ParseError::InvalidChunkType([0x00, 0x01, 0x02, 0x03])
    );
}

#[test]
fn unknown_chunks_are_readable() {
    let bytes = [b'X', b'F', b'I', b'H', 0, 0, 0, 2, 0x01, 0x02];
    let chunk = Chunk::read(&mut Reader::from_byte_slice(&bytes)).unwrap();
    assert!(!chunk.is_track());
    assert_eq!(&chunk.id(), b"XFIH");
}
