#![doc = r#"
Rusty representation of a whole [`MidiFile`]

```text
[Header Chunk: "MThd"]
[Track Chunk 1: "MTrk"]
[Track Chunk 2: "MTrk"]
...
[Optional Unknown Chunks]
```

Each track is decoded independently; tempo events from every track are
then merged into a single [`TempoMap`].
"#]

mod chunk;
pub use chunk::*;

mod format;
pub use format::*;

mod header;
pub use header::*;

mod timing;
pub use timing::*;

use crate::{
    NoteDurations, ParseError, ParseOptions, TempoEvent, TempoMap,
    reader::{ReadResult, Reader, ReaderError},
    track::TrackEvents,
};
use alloc::vec::Vec;

#[doc = r#"
A decoded file: its header and the events of every track chunk.

# Example
```rust
# use midiscore::prelude::*;
let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96,
    b'M', b'T', b'r', b'k', 0, 0, 0, 12,
    0x00, 0x90, 0x3C, 0x64,
    0x60, 0x80, 0x3C, 0x40,
    0x00, 0xFF, 0x2F, 0x00,
];
let file = MidiFile::parse(&bytes).unwrap();
let notes = file.tracks()[0].note_durations();
assert_eq!(notes.completed[0].duration_ticks, 96);

let tempo = file.tempo_map();
assert_eq!(tempo.note_duration_us(0, 96), 500_000);
```
"#]
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFile {
    header: Header,
    tracks: Vec<TrackEvents>,
}

impl MidiFile {
    /// Parse a set of bytes into a file struct
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        Self::parse_with(bytes, &ParseOptions::default())
    }

    /// [`MidiFile::parse`] with explicit options.
    pub fn parse_with(bytes: &[u8], options: &ParseOptions) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(bytes);
        let header = Header::read(&mut reader)?;
        let mut tracks = Vec::with_capacity(header.track_count() as usize);

        while !reader.is_at_end() {
            let chunk = Chunk::read(&mut reader)?;
            if chunk.is_track() {
                tracks.push(chunk.parse_track(options)?);
            } else {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    offset = chunk.offset(),
                    len = chunk.data().len(),
                    "skipping unknown chunk"
                );
            }
        }

        if tracks.len() != header.track_count() as usize {
            if options.strict_track_count {
                return Err(ReaderError::new(
                    reader.buffer_position(),
                    ParseError::TrackCountMismatch {
                        declared: header.track_count(),
                        found: tracks.len(),
                    },
                ));
            }
            #[cfg(feature = "tracing")]
            tracing::warn!(
                declared = header.track_count(),
                found = tracks.len(),
                "track count does not match header"
            );
        }

        Ok(Self { header, tracks })
    }

    /// Returns header info
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The file's division
    pub fn division(&self) -> Division {
        self.header.division()
    }

    /// Returns the format type for the file.
    pub fn format_type(&self) -> FormatType {
        self.header.format()
    }

    /// The decoded tracks in file order.
    pub fn tracks(&self) -> &[TrackEvents] {
        &self.tracks
    }

    /// Take ownership of the decoded tracks.
    pub fn into_tracks(self) -> Vec<TrackEvents> {
        self.tracks
    }

    /// Every tempo event in the file, track by track.
    pub fn tempo_events(&self) -> Vec<TempoEvent> {
        self.tracks
            .iter()
            .flat_map(|t| t.tempos.iter().copied())
            .collect()
    }

    /// Build the file's tempo map.
    ///
    /// Tempo events may live on any track; when two tracks change tempo on
    /// the same tick the later track wins.
    pub fn tempo_map(&self) -> TempoMap {
        TempoMap::new(self.tempo_events(), self.division())
    }

    /// Reconcile the notes of every track.
    pub fn note_durations(&self) -> Vec<NoteDurations> {
        self.tracks.iter().map(TrackEvents::note_durations).collect()
    }
}
