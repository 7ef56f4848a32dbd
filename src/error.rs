#![doc = r#"
Error types produced while decoding a Standard MIDI File.

Every decode failure is fatal for the unit being parsed (the header or a
single track). Once a byte is misread the cursor can no longer be trusted
to sit on an event boundary, so nothing is resynchronized.
"#]

use thiserror::Error;

/// The complete set of decode failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Fewer than 14 bytes were available for the file header.
    #[error("Incomplete header: the file header needs 14 bytes")]
    IncompleteHeader,
    /// The header did not start with `MThd`.
    #[error("Invalid magic number: expected `MThd`, found {0:?}")]
    InvalidMagicNumber([u8; 4]),
    /// The header chunk was well framed but carried an invalid field.
    #[error("Invalid header: {0}")]
    InvalidHeaderLength(#[from] HeaderError),
    /// A chunk identifier was not four printable ASCII bytes, or a
    /// track chunk was expected and something else was found.
    #[error("Invalid chunk type {0:?}")]
    InvalidChunkType([u8; 4]),
    /// A chunk declared more bytes than the buffer holds.
    #[error("Incomplete data: chunk declares {declared} bytes but only {available} remain")]
    IncompleteData {
        /// The length written in the chunk header.
        declared: u32,
        /// The number of bytes actually left in the buffer.
        available: usize,
    },
    /// Input ran out in the middle of a structure.
    #[error("Unexpected end of file")]
    UnexpectedEndOfFile,
    /// A variable-length quantity used more than four bytes.
    #[error("Invalid variable-length quantity")]
    InvalidVlqEncoding,
    /// A data byte appeared before any channel status byte.
    #[error("Data byte found with no running status")]
    MissingRunningStatus,
    /// A field held a value outside its legal range.
    #[error("Invalid event data: {0}")]
    InvalidEventData(#[from] EventDataError),
    /// A system-exclusive block was not properly terminated.
    #[error("Truncated system exclusive block: {0}")]
    TruncatedSysEx(#[from] SysExError),
    /// The number of track chunks disagrees with the header.
    ///
    /// Only produced when
    /// [`ParseOptions::strict_track_count`](crate::ParseOptions::strict_track_count)
    /// is set.
    #[error("Header declares {declared} tracks but {found} were found")]
    TrackCountMismatch {
        /// The header's track count.
        declared: u16,
        /// The number of `MTrk` chunks in the file.
        found: usize,
    },
}

/// Why a header chunk was rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    /// The header chunk length must be exactly 6.
    #[error("chunk length must be 6, found {0}")]
    ChunkLength(u32),
    /// The format field must be 0, 1 or 2.
    #[error("unknown format {0}")]
    Format(u16),
    /// Format 0 needs exactly one track, other formats at least one.
    #[error("format {format} cannot declare {count} tracks")]
    TrackCount {
        /// The raw format field.
        format: u16,
        /// The declared track count.
        count: u16,
    },
    /// Ticks per quarter note must be in `1..=32767`.
    #[error("ticks per quarter note {0} outside 1..=32767")]
    TicksPerQuarter(u16),
    /// The SMPTE frame rate was not one of -24, -25, -29 or -30.
    #[error("invalid smpte frame rate {0}")]
    SmpteFrameRate(i8),
    /// SMPTE ticks per frame cannot be zero.
    #[error("smpte ticks per frame must be nonzero")]
    ZeroTicksPerFrame,
}

/// Why an event's payload was rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EventDataError {
    /// A data byte had its high bit set.
    #[error("data byte {0:#04X} is outside 0..=127")]
    DataByte(u8),
    /// A fixed-length meta-event declared the wrong length.
    #[error("meta event {kind:#04X} must have length {expected}, found {found}")]
    MetaLength {
        /// The meta-event type byte.
        kind: u8,
        /// The length the type requires.
        expected: u32,
        /// The declared length.
        found: u32,
    },
    /// A time signature numerator of zero.
    #[error("time signature numerator must be nonzero")]
    TimeSignatureNumerator,
    /// A time signature denominator above 2^7.
    #[error("time signature denominator power {0} is too large")]
    TimeSignatureDenominator(u8),
    /// Key signature sharps/flats outside -7..=7.
    #[error("key signature accidentals {0} outside -7..=7")]
    KeySignatureAccidentals(i8),
    /// Key signature mode byte other than 0 or 1.
    #[error("key signature mode {0} is neither major nor minor")]
    KeySignatureMode(u8),
}

/// Why a system-exclusive block was rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SysExError {
    /// A status byte other than `0xF7` appeared inside the block.
    #[error("status byte {0:#04X} inside the block")]
    Framing(u8),
    /// The block ran past the configured size limit.
    #[error("no terminator within {0} bytes")]
    Limit(usize),
    /// Input ended before the terminator.
    #[error("input ended before the terminator")]
    Unterminated,
}
