use crate::track::DEFAULT_SYSEX_LIMIT;

/// Knobs for the parse entry points.
///
/// # Example
/// ```rust
/// # use midiscore::prelude::*;
/// let options = ParseOptions::default()
///     .with_sysex_limit(1024)
///     .with_strict_track_count(true);
/// assert_eq!(options.sysex_limit, 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseOptions {
    /// The longest system-exclusive body accepted before the block is
    /// considered truncated. Defaults to 64 KiB.
    pub sysex_limit: usize,
    /// Fail when the number of `MTrk` chunks differs from the header's
    /// track count. Off by default, in which case the mismatch is logged.
    pub strict_track_count: bool,
}

impl ParseOptions {
    /// The default options.
    pub const fn new() -> Self {
        Self {
            sysex_limit: DEFAULT_SYSEX_LIMIT,
            strict_track_count: false,
        }
    }

    /// Set [`ParseOptions::sysex_limit`].
    pub const fn with_sysex_limit(mut self, limit: usize) -> Self {
        self.sysex_limit = limit;
        self
    }

    /// Set [`ParseOptions::strict_track_count`].
    pub const fn with_strict_track_count(mut self, strict: bool) -> Self {
        self.strict_track_count = strict;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}
