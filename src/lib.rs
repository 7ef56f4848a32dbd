#![doc = r#"
Decode Standard MIDI Files into absolute-time notes and tempo data.

`midiscore` is the front half of a MIDI-to-notation pipeline. It turns the
raw bytes of a `.mid` file into:

- a validated [`Header`] (format, track count, [`Division`]);
- per-track [`TrackEvents`]: note, controller, tempo, time signature,
  key signature and text events stamped with absolute ticks;
- per-track [`NoteDurations`]: note-ons paired with note-offs, plus the
  notes that never ended;
- a file-wide [`TempoMap`] converting ticks into microseconds.

Everything runs synchronously over an in-memory buffer. Tracks share no
state, and every structure is handed back by value.

# Example
```rust
use midiscore::prelude::*;

let track = [
    0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // tempo 500 000 µs
    0x00, 0x90, 0x3C, 0x64,                   // note on C4
    0x30, 0xFF, 0x51, 0x03, 0x06, 0x1A, 0x80, // tempo 400 000 µs at tick 48
    0x30, 0x80, 0x3C, 0x40,                   // note off C4 at tick 96
    0x00, 0xFF, 0x2F, 0x00,
];
let events = parse_track(&track).unwrap();
let notes = events.note_durations();
let tempo = TempoMap::new(events.tempos.iter().copied(), Division::from_raw(96).unwrap());

let note = notes.completed[0];
assert_eq!(note.duration_ticks, 96);
assert_eq!(tempo.note_duration_us(note.on_tick, note.off_tick), 450_000);
```
"#]
#![warn(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod byte;
pub use byte::*;

mod error;
pub use error::*;

pub mod file;
pub use file::{
    Division, FormatType, Header, MidiFile, SmpteDivision, SmpteFps, TicksPerQuarter,
};

mod micros;
pub use micros::*;

mod notes;
pub use notes::*;

mod options;
pub use options::*;

pub mod reader;

mod tempo;
pub use tempo::*;

pub mod track;
pub use track::{
    ControllerEvent, ControllerMessage, KeySignatureEvent, NoteEvent, NoteKind, TempoEvent,
    TextEvent, TimeSignatureEvent, TrackEvents, parse_track, parse_track_chunk,
    parse_track_with,
};

pub mod vlq;

/// Commonly used types and entry points.
pub mod prelude {
    pub use crate::{
        ActiveNoteInfo, DataByte, EventDataError, HeaderError, NoteDurations, NoteTracker,
        NoteWithDuration, OrphanedNote, ParseError, ParseOptions, SysExError, TempoMap, UMicros,
        file::*,
        reader::{ReadResult, ReaderError},
        track::*,
        vlq::VlqResult,
    };
}
