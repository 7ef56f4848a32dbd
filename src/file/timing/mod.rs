mod smpte;
pub use smpte::*;

use crate::HeaderError;

/// The header's division field: how long a tick is.
///
/// This is either a number of ticks per quarter note, in which case wall
/// clock time depends on the tempo map, or a frame-based SMPTE rate, in
/// which case every tick has a fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u16", into = "u16")
)]
pub enum Division {
    /// Ticks per quarter note.
    TicksPerQuarter(TicksPerQuarter),

    /// Frames per second and ticks per frame.
    Smpte(SmpteDivision),
}

impl Division {
    /// Decode the raw 16-bit field.
    ///
    /// Bit 15 clear means the low 15 bits are ticks per quarter note. Bit 15
    /// set means the high byte is a negated frame rate and the low byte is
    /// ticks per frame.
    pub const fn from_raw(raw: u16) -> Result<Self, HeaderError> {
        if raw & 0x8000 == 0 {
            return match TicksPerQuarter::new(raw) {
                Ok(tpq) => Ok(Self::TicksPerQuarter(tpq)),
                Err(e) => Err(e),
            };
        }
        let [hi, lo] = raw.to_be_bytes();
        let rate = hi as i8;
        let Some(fps) = SmpteFps::from_header_byte(rate) else {
            return Err(HeaderError::SmpteFrameRate(rate));
        };
        match SmpteDivision::new(fps, lo) {
            Ok(smpte) => Ok(Self::Smpte(smpte)),
            Err(e) => Err(e),
        }
    }

    /// A ticks-per-quarter division, `1..=32767`.
    pub const fn new_ticks_per_quarter_note(tpq: u16) -> Result<Self, HeaderError> {
        match TicksPerQuarter::new(tpq) {
            Ok(tpq) => Ok(Self::TicksPerQuarter(tpq)),
            Err(e) => Err(e),
        }
    }

    /// Encode back into the 16-bit header field.
    pub const fn to_raw(&self) -> u16 {
        match self {
            Self::TicksPerQuarter(tpq) => tpq.get(),
            Self::Smpte(s) => u16::from_be_bytes([s.fps.as_header_byte() as u8, s.ticks_per_frame]),
        }
    }

    /// Returns Some if the division is ticks per quarter note.
    pub const fn ticks_per_quarter(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarter(tpq) => Some(tpq.get()),
            Self::Smpte(_) => None,
        }
    }

    /// Returns Some if the division is frame based.
    pub const fn smpte(&self) -> Option<SmpteDivision> {
        match self {
            Self::Smpte(s) => Some(*s),
            Self::TicksPerQuarter(_) => None,
        }
    }
}

impl TryFrom<u16> for Division {
    type Error = HeaderError;
    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        Self::from_raw(raw)
    }
}

impl From<Division> for u16 {
    fn from(value: Division) -> Self {
        value.to_raw()
    }
}

/// A ticks-per-quarter-note count, always in `1..=32767`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TicksPerQuarter(u16);

impl TicksPerQuarter {
    /// Rejects zero and anything with bit 15 set.
    pub const fn new(tpq: u16) -> Result<Self, HeaderError> {
        if tpq == 0 || tpq & 0x8000 != 0 {
            return Err(HeaderError::TicksPerQuarter(tpq));
        }
        Ok(Self(tpq))
    }

    /// Returns the ticks per quarter note.
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Frame-based division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SmpteDivision {
    pub(crate) fps: SmpteFps,
    pub(crate) ticks_per_frame: u8,
}

impl SmpteDivision {
    /// Rejects zero ticks per frame.
    pub const fn new(fps: SmpteFps, ticks_per_frame: u8) -> Result<Self, HeaderError> {
        if ticks_per_frame == 0 {
            return Err(HeaderError::ZeroTicksPerFrame);
        }
        Ok(Self {
            fps,
            ticks_per_frame,
        })
    }

    /// Returns the frames per second
    pub const fn fps(&self) -> SmpteFps {
        self.fps
    }

    /// Returns the ticks per frame
    pub const fn ticks_per_frame(&self) -> u8 {
        self.ticks_per_frame
    }

    /// Ticks in one second at the nominal frame rate.
    pub const fn ticks_per_second(&self) -> u32 {
        self.fps.as_division() as u32 * self.ticks_per_frame as u32
    }
}

#[test]
fn decodes_ticks_per_quarter() {
    let div = Division::from_raw(0x01E0).unwrap();
    assert_eq!(div.ticks_per_quarter(), Some(480));
    assert_eq!(div, Division::new_ticks_per_quarter_note(480).unwrap());
    assert_eq!(div.to_raw(), 0x01E0);
    assert_eq!(Division::from_raw(0x0000), Err(HeaderError::TicksPerQuarter(0)));
}

#[test]
fn ticks_per_quarter_must_fit_fifteen_bits() {
    assert_eq!(TicksPerQuarter::new(0), Err(HeaderError::TicksPerQuarter(0)));
    assert_eq!(
        Division::new_ticks_per_quarter_note(0x8060),
        Err(HeaderError::TicksPerQuarter(0x8060))
    );
    assert_eq!(TicksPerQuarter::new(0x7FFF).unwrap().get(), 0x7FFF);
    assert_eq!(
        SmpteDivision::new(SmpteFps::Thirty, 0),
        Err(HeaderError::ZeroTicksPerFrame)
    );
}

#[test]
fn decodes_smpte() {
    // -25 fps, 40 ticks per frame
    let div = Division::from_raw(0xE728).unwrap();
    let smpte = div.smpte().unwrap();
    assert_eq!(smpte.fps(), SmpteFps::TwentyFive);
    assert_eq!(smpte.ticks_per_frame(), 40);
    assert_eq!(smpte.ticks_per_second(), 1000);
    assert_eq!(div.to_raw(), 0xE728);
    assert_eq!(div.ticks_per_quarter(), None);
}

#[test]
fn rejects_illegal_frame_rates() {
    // -23 fps
    assert_eq!(
        Division::from_raw(0xE904),
        Err(HeaderError::SmpteFrameRate(-23))
    );
    assert_eq!(Division::from_raw(0xE200), Err(HeaderError::ZeroTicksPerFrame));
}
