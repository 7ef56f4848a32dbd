use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The header's format field: how the file's tracks relate to each other.

```text
0  one track holding every channel
1  several tracks played simultaneously, sharing one tempo map
2  several independent single-track patterns
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0
    Single = 0,
    /// Format 1
    MultiSync = 1,
    /// Format 2
    MultiAsync = 2,
}

impl FormatType {
    /// True if `count` tracks is a legal declaration for this format.
    ///
    /// [`FormatType::Single`] requires exactly one, the others at least one.
    pub const fn accepts_track_count(&self, count: u16) -> bool {
        match self {
            Self::Single => count == 1,
            Self::MultiSync | Self::MultiAsync => count >= 1,
        }
    }
}

#[test]
fn from_raw_field() {
    assert_eq!(FormatType::try_from(1u16).ok(), Some(FormatType::MultiSync));
    assert!(FormatType::try_from(3u16).is_err());
    assert_eq!(u16::from(FormatType::MultiAsync), 2);
}

#[test]
fn single_needs_one_track() {
    assert!(FormatType::Single.accepts_track_count(1));
    assert!(!FormatType::Single.accepts_track_count(2));
    assert!(!FormatType::MultiSync.accepts_track_count(0));
    assert!(FormatType::MultiAsync.accepts_track_count(16));
}
