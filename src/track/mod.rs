#![doc = r#"
Decoding the events of one `MTrk` chunk.

A track is a flat run of delta-time tagged events:

```text
<delta vlq> <status> <data...>
<delta vlq> [status omitted, running status] <data...>
<delta vlq> FF <type> <length vlq> <payload...>
<delta vlq> F0 <body...> F7
```

[`TrackParser`] walks the run once, keeping the absolute tick, the running
status and the RPN/NRPN selection, and sorts what it finds into the typed
lists of [`TrackEvents`]. Any decode error aborts the track: once a byte
is misread there is no telling where the next event starts.
"#]

mod event;
pub use event::*;

mod parameter;
pub use parameter::*;

mod sysex;
pub use sysex::{DEFAULT_SYSEX_LIMIT, ManufacturerId};

mod usage;
pub use usage::*;

use crate::{
    DataByte, EventDataError, NoteDurations, NoteTracker, ParseError, ParseOptions,
    byte::combine_14bit,
    file::Chunk,
    reader::{ReadResult, Reader, ReaderError},
};
use alloc::{string::String, vec::Vec};

/// The magic that opens a track chunk.
pub const TRACK_MAGIC: [u8; 4] = *b"MTrk";

const META: u8 = 0xFF;
const SYSEX: u8 = 0xF0;

const META_END_OF_TRACK: u8 = 0x2F;
const META_SET_TEMPO: u8 = 0x51;
const META_TIME_SIGNATURE: u8 = 0x58;
const META_KEY_SIGNATURE: u8 = 0x59;

/// Everything decoded from one track, in file order within each list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvents {
    /// Note-ons and note-offs
    pub notes: Vec<NoteEvent>,
    /// Every other channel voice message, plus reconstructed RPN/NRPN
    /// changes
    pub controllers: Vec<ControllerEvent>,
    /// Set-tempo meta-events
    pub tempos: Vec<TempoEvent>,
    /// Time signature meta-events
    pub time_signatures: Vec<TimeSignatureEvent>,
    /// Key signature meta-events
    pub key_signatures: Vec<KeySignatureEvent>,
    /// Text meta-events with valid, non-empty UTF-8
    pub texts: Vec<TextEvent>,
    /// The absolute tick of the last event read
    pub end_tick: u32,
    /// True if an end-of-track meta-event closed the track, false if the
    /// chunk simply ran out of bytes
    pub ended_explicitly: bool,
}

impl TrackEvents {
    /// Pair note-ons with note-offs into notes with durations.
    pub fn note_durations(&self) -> NoteDurations {
        let mut tracker = NoteTracker::with_capacity(self.notes.len() / 2);
        for note in &self.notes {
            tracker.process(note);
        }
        tracker.finalize()
    }

    /// Summarize which channels the track uses.
    pub fn channel_usage(&self) -> ChannelUsage {
        ChannelUsage::from_events(self)
    }

    /// The first track name meta-event, if any.
    pub fn track_name(&self) -> Option<&str> {
        self.texts
            .iter()
            .find(|t| t.kind() == TextKind::TrackName)
            .map(|t| t.text.as_str())
    }

    /// True if the track carried no events at all.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
            && self.controllers.is_empty()
            && self.tempos.is_empty()
            && self.time_signatures.is_empty()
            && self.key_signatures.is_empty()
            && self.texts.is_empty()
    }
}

/// Decode the body of a track chunk (without its `MTrk` header).
pub fn parse_track(data: &[u8]) -> ReadResult<TrackEvents> {
    parse_track_with(data, &ParseOptions::default())
}

/// [`parse_track`] with explicit options.
pub fn parse_track_with(data: &[u8], options: &ParseOptions) -> ReadResult<TrackEvents> {
    TrackParser::new(Reader::from_byte_slice(data), options).run()
}

/// Decode a complete track chunk, header included.
///
/// # Errors
/// [`ParseError::InvalidChunkType`] if the chunk is not `MTrk`, and
/// [`ParseError::IncompleteData`] if its declared length overruns `bytes`.
pub fn parse_track_chunk(bytes: &[u8]) -> ReadResult<TrackEvents> {
    let mut reader = Reader::from_byte_slice(bytes);
    let chunk = Chunk::read(&mut reader)?;
    if !chunk.is_track() {
        return Err(ReaderError::new(0, ParseError::InvalidChunkType(chunk.id())));
    }
    chunk.parse_track(&ParseOptions::default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    EndOfTrack,
}

/// The per-track decoding state machine.
///
/// Created at the start of a track and consumed by [`TrackParser::run`];
/// nothing it holds outlives the call.
#[derive(Debug)]
pub struct TrackParser<'a> {
    reader: Reader<'a>,
    tick: u32,
    running_status: Option<u8>,
    parameters: ParameterTracker,
    sysex_limit: usize,
    events: TrackEvents,
}

impl<'a> TrackParser<'a> {
    /// Prepare to decode the bytes under `reader`.
    pub fn new(reader: Reader<'a>, options: &ParseOptions) -> Self {
        Self {
            reader,
            tick: 0,
            running_status: None,
            parameters: ParameterTracker::default(),
            sysex_limit: options.sysex_limit,
            events: TrackEvents::default(),
        }
    }

    /// Decode until the bytes run out or an end-of-track meta-event.
    pub fn run(mut self) -> ReadResult<TrackEvents> {
        while !self.reader.is_at_end() {
            let delta = self.reader.read_vlq()?;
            self.tick = self.tick.saturating_add(delta);
            if self.step()? == Flow::EndOfTrack {
                self.events.ended_explicitly = true;
                break;
            }
        }
        self.events.end_tick = self.tick;
        Ok(self.events)
    }

    fn step(&mut self) -> ReadResult<Flow> {
        let byte = self.reader.peek_next()?;
        let status = if byte & 0x80 == 0 {
            let Some(status) = self.running_status else {
                return Err(self.reader.error(ParseError::MissingRunningStatus));
            };
            status
        } else {
            self.reader.read_next()?;
            self.running_status = (byte < 0xF0).then_some(byte);
            byte
        };

        match status {
            0x80..=0xEF => self.channel_voice(status)?,
            META => return self.meta(),
            SYSEX => {
                sysex::skip(&mut self.reader, self.sysex_limit)?;
            }
            _ => self.system_common(status)?,
        }
        Ok(Flow::Continue)
    }

    fn data_byte(&mut self) -> ReadResult<DataByte> {
        let position = self.reader.buffer_position();
        let byte = self.reader.read_next()?;
        DataByte::new(byte).map_err(|e| ReaderError::new(position, e))
    }

    fn channel_voice(&mut self, status: u8) -> ReadResult<()> {
        let channel = status & 0x0F;
        let tick = self.tick;
        let message = match status & 0xF0 {
            0x80 | 0x90 => {
                let pitch = self.data_byte()?.value();
                let velocity = self.data_byte()?.value();
                let kind = if status & 0xF0 == 0x80 {
                    NoteKind::NoteOff
                } else {
                    NoteKind::NoteOn
                };
                self.events.notes.push(NoteEvent {
                    kind,
                    channel,
                    pitch,
                    velocity,
                    tick,
                });
                return Ok(());
            }
            0xA0 => ControllerMessage::PolyphonicPressure {
                pitch: self.data_byte()?.value(),
                pressure: self.data_byte()?.value(),
            },
            0xB0 => {
                let controller = self.data_byte()?.value();
                let value = self.data_byte()?.value();
                self.events.controllers.push(ControllerEvent {
                    tick,
                    channel,
                    message: ControllerMessage::ControlChange { controller, value },
                });
                match self.parameters.control_change(channel, controller, value) {
                    Some(change) => ControllerMessage::Parameter(change),
                    None => return Ok(()),
                }
            }
            0xC0 => ControllerMessage::ProgramChange {
                program: self.data_byte()?.value(),
            },
            0xD0 => ControllerMessage::ChannelPressure {
                pressure: self.data_byte()?.value(),
            },
            _ => {
                let lsb = self.data_byte()?;
                let msb = self.data_byte()?;
                ControllerMessage::PitchBend {
                    value: combine_14bit(lsb, msb),
                }
            }
        };
        self.events.controllers.push(ControllerEvent {
            tick,
            channel,
            message,
        });
        Ok(())
    }

    fn meta(&mut self) -> ReadResult<Flow> {
        let kind = self.reader.read_next()?;
        let len = self.reader.read_vlq()?;
        let start = self.reader.buffer_position();
        let data = self.reader.read_slice(len as usize)?;
        let tick = self.tick;

        let fixed_len = |expected: u32| {
            if len == expected {
                Ok(())
            } else {
                Err(ReaderError::new(
                    start,
                    EventDataError::MetaLength {
                        kind,
                        expected,
                        found: len,
                    }
                    .into(),
                ))
            }
        };
        let invalid = |e: EventDataError| ReaderError::new(start, e.into());

        match kind {
            META_END_OF_TRACK if len == 0 => return Ok(Flow::EndOfTrack),
            META_SET_TEMPO => {
                fixed_len(3)?;
                self.events.tempos.push(TempoEvent {
                    tick,
                    microseconds_per_quarter: u32::from_be_bytes([0, data[0], data[1], data[2]]),
                });
            }
            META_TIME_SIGNATURE => {
                fixed_len(4)?;
                let [numerator, denominator_power, clocks_per_metronome, notated_32nds_per_quarter] =
                    [data[0], data[1], data[2], data[3]];
                if numerator == 0 {
                    return Err(invalid(EventDataError::TimeSignatureNumerator));
                }
                if denominator_power > 7 {
                    return Err(invalid(EventDataError::TimeSignatureDenominator(
                        denominator_power,
                    )));
                }
                self.events.time_signatures.push(TimeSignatureEvent {
                    tick,
                    numerator,
                    denominator_power,
                    clocks_per_metronome,
                    notated_32nds_per_quarter,
                });
            }
            META_KEY_SIGNATURE => {
                fixed_len(2)?;
                let sharps_flats = data[0] as i8;
                if !(-7..=7).contains(&sharps_flats) {
                    return Err(invalid(EventDataError::KeySignatureAccidentals(
                        sharps_flats,
                    )));
                }
                let is_minor = match data[1] {
                    0 => false,
                    1 => true,
                    mode => return Err(invalid(EventDataError::KeySignatureMode(mode))),
                };
                self.events.key_signatures.push(KeySignatureEvent {
                    tick,
                    sharps_flats,
                    is_minor,
                });
            }
            0x01..=0x0F => self.text(kind, data, start),
            _ => {
                #[cfg(feature = "tracing")]
                tracing::trace!(position = start, kind, len, "skipping meta event");
            }
        }
        Ok(Flow::Continue)
    }

    fn text(&mut self, subtype: u8, data: &[u8], _position: usize) {
        if data.is_empty() {
            return;
        }
        match core::str::from_utf8(data) {
            Ok(text) => self.events.texts.push(TextEvent {
                tick: self.tick,
                subtype,
                text: String::from(text),
            }),
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    position = _position,
                    subtype,
                    error = %_e,
                    "dropping text event with invalid utf-8"
                );
            }
        }
    }

    fn system_common(&mut self, status: u8) -> ReadResult<()> {
        let data_len = match status {
            // MTC quarter frame, song select
            0xF1 | 0xF3 => 1,
            // song position pointer
            0xF2 => 2,
            _ => 0,
        };
        for _ in 0..data_len {
            self.data_byte()?;
        }
        Ok(())
    }
}
