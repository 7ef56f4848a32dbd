use alloc::string::String;
use num_enum::FromPrimitive;

/// Whether a [`NoteEvent`] starts or ends a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteKind {
    /// Status `0x8n`
    NoteOff,
    /// Status `0x9n`
    NoteOn,
}

/// A note-on or note-off at an absolute tick.
///
/// A [`NoteKind::NoteOn`] with velocity 0 is kept as written; it is the
/// [`NoteTracker`](crate::NoteTracker) that treats it as a note-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteEvent {
    /// On or off
    pub kind: NoteKind,
    /// `0..=15`
    pub channel: u8,
    /// `0..=127`, 60 is middle C
    pub pitch: u8,
    /// `0..=127`
    pub velocity: u8,
    /// Absolute tick
    pub tick: u32,
}

impl NoteEvent {
    /// True for a note-off, or a note-on with velocity 0.
    pub const fn ends_note(&self) -> bool {
        matches!(self.kind, NoteKind::NoteOff) || self.velocity == 0
    }
}

/// Registered or non-registered parameter numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParameterKind {
    /// Selected with controllers 101/100
    Registered,
    /// Selected with controllers 99/98
    NonRegistered,
}

/// A reconstructed RPN or NRPN data entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterChange {
    /// Which parameter space
    pub kind: ParameterKind,
    /// 14-bit parameter number, `(msb << 7) | lsb`
    pub parameter: u16,
    /// Data entry MSB (controller 6)
    pub value_msb: u8,
    /// Data entry LSB (controller 38), if one has arrived
    pub value_lsb: Option<u8>,
}

impl ParameterChange {
    /// Registered parameter 0: pitch bend sensitivity.
    pub const PITCH_BEND_RANGE: u16 = 0x0000;
    /// Registered parameter 1: channel fine tuning.
    pub const FINE_TUNING: u16 = 0x0001;
    /// Registered parameter 2: channel coarse tuning.
    pub const COARSE_TUNING: u16 = 0x0002;

    /// The 14-bit value, treating a missing LSB as 0.
    pub const fn value(&self) -> u16 {
        let lsb = match self.value_lsb {
            Some(lsb) => lsb,
            None => 0,
        };
        ((self.value_msb as u16) << 7) | lsb as u16
    }
}

/// The payload of a non-note channel voice message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControllerMessage {
    /// Status `0xAn`
    PolyphonicPressure {
        /// Key under pressure
        pitch: u8,
        /// Pressure amount
        pressure: u8,
    },
    /// Status `0xBn`
    ControlChange {
        /// Controller number
        controller: u8,
        /// New value
        value: u8,
    },
    /// Status `0xCn`
    ProgramChange {
        /// Program number
        program: u8,
    },
    /// Status `0xDn`
    ChannelPressure {
        /// Pressure amount
        pressure: u8,
    },
    /// Status `0xEn`, 14 bits with 8192 at rest
    PitchBend {
        /// `0..=16383`
        value: u16,
    },
    /// Derived from a run of control changes
    Parameter(ParameterChange),
}

/// A controller-family event at an absolute tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerEvent {
    /// Absolute tick
    pub tick: u32,
    /// `0..=15`
    pub channel: u8,
    /// What changed
    pub message: ControllerMessage,
}

/// A set-tempo meta-event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoEvent {
    /// Absolute tick
    pub tick: u32,
    /// Length of a quarter note, 24-bit on the wire
    pub microseconds_per_quarter: u32,
}

impl TempoEvent {
    /// Tempo at 120 beats per minute.
    pub const DEFAULT_MICROS_PER_QUARTER: u32 = 500_000;

    /// Create a tempo event from a beats-per-minute value.
    ///
    /// Non-positive or non-finite BPM produces the default tempo.
    pub fn from_bpm(tick: u32, bpm: f64) -> Self {
        let microseconds_per_quarter = if bpm.is_finite() && bpm > 0. {
            (60_000_000. / bpm) as u32
        } else {
            Self::DEFAULT_MICROS_PER_QUARTER
        };
        Self {
            tick,
            microseconds_per_quarter,
        }
    }

    /// Beats per minute, `60_000_000 / µs_per_quarter`.
    pub fn bpm(&self) -> f64 {
        if self.microseconds_per_quarter == 0 {
            return 0.;
        }
        60_000_000. / self.microseconds_per_quarter as f64
    }
}

/// A time signature meta-event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignatureEvent {
    /// Absolute tick
    pub tick: u32,
    /// Beats per bar
    pub numerator: u8,
    /// The denominator is `2^denominator_power`
    pub denominator_power: u8,
    /// MIDI clocks per metronome click
    pub clocks_per_metronome: u8,
    /// Notated 32nd notes in a MIDI quarter note
    pub notated_32nds_per_quarter: u8,
}

impl TimeSignatureEvent {
    /// The denominator, e.g. 8 for 6/8.
    pub const fn denominator(&self) -> u16 {
        1 << self.denominator_power
    }
}

/// A key signature meta-event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignatureEvent {
    /// Absolute tick
    pub tick: u32,
    /// Negative for flats, positive for sharps, `-7..=7`
    pub sharps_flats: i8,
    /// Minor if true
    pub is_minor: bool,
}

/// The meaning of a text meta-event's type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TextKind {
    /// `FF 01`
    Text = 0x01,
    /// `FF 02`
    Copyright = 0x02,
    /// `FF 03`, sequence or track name
    TrackName = 0x03,
    /// `FF 04`
    InstrumentName = 0x04,
    /// `FF 05`
    Lyric = 0x05,
    /// `FF 06`
    Marker = 0x06,
    /// `FF 07`
    CuePoint = 0x07,
    /// `FF 08`
    ProgramName = 0x08,
    /// `FF 09`
    DeviceName = 0x09,
    /// Any other type in `0x0A..=0x0F`
    #[num_enum(catch_all)]
    Other(u8),
}

/// A text meta-event with a valid UTF-8 payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextEvent {
    /// Absolute tick
    pub tick: u32,
    /// The raw meta type, `0x01..=0x0F`
    pub subtype: u8,
    /// The decoded payload
    pub text: String,
}

impl TextEvent {
    /// What the text is for
    pub fn kind(&self) -> TextKind {
        TextKind::from_primitive(self.subtype)
    }
}

#[test]
fn tempo_bpm_conversion() {
    let tempo = TempoEvent {
        tick: 0,
        microseconds_per_quarter: 500_000,
    };
    assert_eq!(tempo.bpm(), 120.);
    assert_eq!(TempoEvent::from_bpm(0, 150.).microseconds_per_quarter, 400_000);
    assert_eq!(
        TempoEvent::from_bpm(0, 0.).microseconds_per_quarter,
        TempoEvent::DEFAULT_MICROS_PER_QUARTER
    );
}

#[test]
fn text_kinds() {
    let text = |subtype| TextEvent {
        tick: 0,
        subtype,
        text: String::new(),
    };
    assert_eq!(text(0x03).kind(), TextKind::TrackName);
    assert_eq!(text(0x05).kind(), TextKind::Lyric);
    assert_eq!(text(0x0C).kind(), TextKind::Other(0x0C));
}

#[test]
fn parameter_value() {
    let change = ParameterChange {
        kind: ParameterKind::Registered,
        parameter: ParameterChange::PITCH_BEND_RANGE,
        value_msb: 2,
        value_lsb: None,
    };
    assert_eq!(change.value(), 256);
    let change = ParameterChange {
        value_lsb: Some(50),
        ..change
    };
    assert_eq!(change.value(), 306);
}
