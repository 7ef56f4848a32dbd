use crate::ParseError;
use thiserror::Error;

#[doc = r#"
A decode failure together with the byte offset where it happened.

Offsets are absolute within the buffer handed to the parse entry point,
so an error inside the third track of a file points into the file, not
into the track.
"#]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Reading at Position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    kind: ParseError,
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ParseError) -> Self {
        Self { position, kind }
    }
    /// Shorthand for an [`ParseError::UnexpectedEndOfFile`] at `position`.
    pub const fn eof(position: usize) -> Self {
        Self::new(position, ParseError::UnexpectedEndOfFile)
    }
    /// True if the input ran out mid-structure
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, ParseError::UnexpectedEndOfFile)
    }
    /// Returns the error kind of the reader.
    pub const fn error_kind(&self) -> &ParseError {
        &self.kind
    }
    /// Returns the position where the read error occurred.
    pub const fn position(&self) -> usize {
        self.position
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;

#[test]
fn display_includes_position() {
    use alloc::string::ToString;
    let err = ReaderError::new(12, ParseError::MissingRunningStatus);
    assert_eq!(
        err.to_string(),
        "Reading at Position 12, Data byte found with no running status"
    );
    assert!(!err.is_eof());
    assert!(ReaderError::eof(3).is_eof());
}
