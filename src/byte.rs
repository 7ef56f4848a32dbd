use crate::{EventDataError, ParseError};

/// A byte with a leading 0 bit: every data byte that follows a status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataByte(pub(crate) u8);

impl DataByte {
    /// Validates that the high bit is clear.
    #[inline]
    pub const fn new(byte: u8) -> Result<Self, ParseError> {
        if byte > 0x7F {
            return Err(ParseError::InvalidEventData(EventDataError::DataByte(byte)));
        }
        Ok(Self(byte))
    }

    /// Returns the value, `0..=127`.
    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DataByte {
    type Error = ParseError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DataByte> for u8 {
    fn from(value: DataByte) -> Self {
        value.0
    }
}

/// Combines a least and most significant data byte into a 14-bit value.
#[inline]
pub const fn combine_14bit(lsb: DataByte, msb: DataByte) -> u16 {
    ((msb.0 as u16) << 7) | lsb.0 as u16
}

#[test]
fn rejects_status_bytes() {
    assert_eq!(DataByte::new(127).unwrap().value(), 127);
    assert_eq!(
        DataByte::new(0x80),
        Err(ParseError::InvalidEventData(EventDataError::DataByte(0x80)))
    );
}

#[test]
fn combines_pitch_bend_halves() {
    let center = combine_14bit(DataByte(0x00), DataByte(0x40));
    assert_eq!(center, 8192);
    let max = combine_14bit(DataByte(0x7F), DataByte(0x7F));
    assert_eq!(max, 0x3FFF);
}
