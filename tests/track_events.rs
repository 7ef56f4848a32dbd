mod common;

use common::TrackBuilder;
use midiscore::{prelude::*, vlq};
use pretty_assertions::assert_eq;

fn note_on(channel: u8, pitch: u8, velocity: u8, tick: u32) -> NoteEvent {
    NoteEvent {
        kind: NoteKind::NoteOn,
        channel,
        pitch,
        velocity,
        tick,
    }
}

#[test]
fn running_status_note_ons() {
    let body = [0x00, 0x90, 0x3C, 0x64, 0x00, 0x40, 0x64, 0x00, 0x43, 0x64];
    let events = parse_track(&body).unwrap();
    assert_eq!(
        events.notes,
        [note_on(0, 60, 100, 0), note_on(0, 64, 100, 0), note_on(0, 67, 100, 0)]
    );
    assert!(!events.ended_explicitly);
}

#[test]
fn running_status_accumulates_ticks() {
    let track = TrackBuilder::new()
        .event(10, &[0x91, 0x3C, 0x50])
        .event(20, &[0x3C, 0x00])
        .event(0x80, &[0x3E, 0x50])
        .end(0);
    let events = parse_track(track.body()).unwrap();
    let ticks: Vec<_> = events.notes.iter().map(|n| (n.tick, n.channel)).collect();
    assert_eq!(ticks, [(10, 1), (30, 1), (158, 1)]);
    assert_eq!(events.end_tick, 158);
    assert!(events.ended_explicitly);
}

#[test]
fn data_byte_without_status() {
    let err = parse_track(&[0x00, 0x3C, 0x64]).unwrap_err();
    assert_eq!(err.error_kind(), &ParseError::MissingRunningStatus);
    assert_eq!(err.position(), 1);
}

#[test]
fn meta_events_clear_running_status() {
    let track = TrackBuilder::new()
        .note_on(0, 0, 60, 100)
        .meta(0, 0x01, b"A")
        .raw(&[0x00, 0x40, 0x64]);
    let err = parse_track(track.body()).unwrap_err();
    assert_eq!(err.error_kind(), &ParseError::MissingRunningStatus);
}

#[test]
fn out_of_range_data_byte() {
    let err = parse_track(&[0x00, 0x90, 0x3C, 0x80]).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ParseError::InvalidEventData(EventDataError::DataByte(0x80))
    );
    assert_eq!(err.position(), 3);
}

#[test]
fn truncated_message() {
    let err = parse_track(&[0x00, 0x90, 0x3C]).unwrap_err();
    assert!(err.is_eof());

    // a delta-time with nothing after it
    let err = parse_track(&[0x00, 0x90, 0x3C, 0x40, 0x10]).unwrap_err();
    assert!(err.is_eof());
}

#[test]
fn controller_family() {
    let track = TrackBuilder::new()
        .event(0, &[0xB2, 0x07, 0x64])
        .event(0, &[0xC2, 0x28])
        .event(5, &[0xD2, 0x30])
        .event(0, &[0xA2, 0x3C, 0x10])
        .event(5, &[0xE2, 0x00, 0x40])
        .end(0);
    let events = parse_track(track.body()).unwrap();
    let messages: Vec<_> = events
        .controllers
        .iter()
        .map(|c| (c.tick, c.channel, c.message))
        .collect();
    assert_eq!(
        messages,
        [
            (
                0,
                2,
                ControllerMessage::ControlChange {
                    controller: 7,
                    value: 100
                }
            ),
            (0, 2, ControllerMessage::ProgramChange { program: 40 }),
            (5, 2, ControllerMessage::ChannelPressure { pressure: 48 }),
            (
                5,
                2,
                ControllerMessage::PolyphonicPressure {
                    pitch: 60,
                    pressure: 16
                }
            ),
            (10, 2, ControllerMessage::PitchBend { value: 8192 }),
        ]
    );
}

#[test]
fn rpn_sequence_emits_parameter_change() {
    let track = TrackBuilder::new()
        .event(0, &[0xB0, 0x65, 0x00])
        .event(0, &[0x64, 0x00])
        .event(0, &[0x06, 0x0C])
        .end(0);
    let events = parse_track(track.body()).unwrap();
    assert_eq!(events.controllers.len(), 4);
    assert_eq!(
        events.controllers[3].message,
        ControllerMessage::Parameter(ParameterChange {
            kind: ParameterKind::Registered,
            parameter: ParameterChange::PITCH_BEND_RANGE,
            value_msb: 12,
            value_lsb: None,
        })
    );
}

#[test]
fn signatures_and_text() {
    let track = TrackBuilder::new()
        .meta(0, 0x03, b"Piano")
        .meta(0, 0x58, &[0x06, 0x03, 0x18, 0x08])
        .meta(0, 0x59, &[0xFD, 0x01])
        .meta(96, 0x05, "là".as_bytes())
        .end(0);
    let events = parse_track(track.body()).unwrap();

    assert_eq!(
        events.time_signatures,
        [TimeSignatureEvent {
            tick: 0,
            numerator: 6,
            denominator_power: 3,
            clocks_per_metronome: 24,
            notated_32nds_per_quarter: 8,
        }]
    );
    assert_eq!(events.time_signatures[0].denominator(), 8);
    assert_eq!(
        events.key_signatures,
        [KeySignatureEvent {
            tick: 0,
            sharps_flats: -3,
            is_minor: true,
        }]
    );
    assert_eq!(events.track_name(), Some("Piano"));
    assert_eq!(events.texts[1].kind(), TextKind::Lyric);
    assert_eq!(events.texts[1].text, "là");
    assert_eq!(events.texts[1].tick, 96);
}

#[test]
fn bad_text_is_dropped_not_fatal() {
    let track = TrackBuilder::new()
        .meta(0, 0x01, &[0xC3, 0x28])
        .meta(0, 0x06, &[])
        .note_on(4, 0, 60, 100)
        .end(0);
    let events = parse_track(track.body()).unwrap();
    assert!(events.texts.is_empty());
    assert_eq!(events.notes, [note_on(0, 60, 100, 4)]);
}

#[test]
fn key_signature_ranges() {
    let track = TrackBuilder::new().meta(0, 0x59, &[0x08, 0x00]);
    let err = parse_track(track.body()).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ParseError::InvalidEventData(EventDataError::KeySignatureAccidentals(8))
    );

    let track = TrackBuilder::new().meta(0, 0x59, &[0x02, 0x02]);
    let err = parse_track(track.body()).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ParseError::InvalidEventData(EventDataError::KeySignatureMode(2))
    );
}

#[test]
fn fixed_length_meta_events() {
    let track = TrackBuilder::new().meta(0, 0x51, &[0x07, 0xA1]);
    let err = parse_track(track.body()).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ParseError::InvalidEventData(EventDataError::MetaLength {
            kind: 0x51,
            expected: 3,
            found: 2
        })
    );

    let track = TrackBuilder::new().meta(0, 0x58, &[0x00, 0x02, 0x18, 0x08]);
    let err = parse_track(track.body()).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ParseError::InvalidEventData(EventDataError::TimeSignatureNumerator)
    );
}

#[test]
fn meta_length_past_end() {
    let err = parse_track(&[0x00, 0xFF, 0x01, 0x05, b'a']).unwrap_err();
    assert!(err.is_eof());
}

#[test]
fn end_of_track_stops_parsing() {
    let track = TrackBuilder::new()
        .note_on(0, 0, 60, 100)
        .end(12)
        .raw(&[0xFF, 0xFF, 0xFF, 0xFF]);
    let events = parse_track(track.body()).unwrap();
    assert!(events.ended_explicitly);
    assert_eq!(events.end_tick, 12);
    assert_eq!(events.notes.len(), 1);
}

#[test]
fn only_empty_end_of_track_terminates() {
    let track = TrackBuilder::new()
        .meta(0, 0x2F, &[0x00])
        .note_on(1, 0, 60, 100)
        .meta(0, 0x7F, &[0x00, 0x00, 0x41, 0x01])
        .note_off(1, 0, 60, 0);
    let events = parse_track(track.body()).unwrap();
    assert!(!events.ended_explicitly);
    assert_eq!(events.notes.len(), 2);
    assert_eq!(events.end_tick, 2);
}

#[test]
fn sysex_is_skipped() {
    let track = TrackBuilder::new()
        .event(0, &[0xF0, 0x43, 0x12, 0x00, 0x07, 0xF7])
        .note_on(16, 0, 60, 100)
        .end(0);
    let events = parse_track(track.body()).unwrap();
    assert_eq!(events.notes, [note_on(0, 60, 100, 16)]);
    assert!(events.controllers.is_empty());
}

#[test]
fn unterminated_sysex() {
    let track = TrackBuilder::new().event(0, &[0xF0, 0x43, 0x12, 0x00]);
    let err = parse_track(track.body()).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ParseError::TruncatedSysEx(SysExError::Unterminated)
    );
}

#[test]
fn sysex_limit_is_configurable() {
    let mut block = vec![0xF0];
    block.extend(std::iter::repeat_n(0x01, 32));
    block.push(0xF7);
    let track = TrackBuilder::new().event(0, &block).end(0);

    assert!(parse_track(track.body()).is_ok());

    let options = ParseOptions::default().with_sysex_limit(16);
    let err = parse_track_with(track.body(), &options).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ParseError::TruncatedSysEx(SysExError::Limit(16))
    );
}

#[test]
fn system_common_data_is_skipped() {
    let track = TrackBuilder::new()
        .event(0, &[0xF2, 0x10, 0x20])
        .event(0, &[0xF8])
        .event(0, &[0xF1, 0x05])
        .note_on(3, 1, 62, 90)
        .end(0);
    let events = parse_track(track.body()).unwrap();
    assert_eq!(events.notes, [note_on(1, 62, 90, 3)]);
}

#[test]
fn channel_usage_summary() {
    let track = TrackBuilder::new()
        .note_on(0, 0, 60, 100)
        .note_on(0, 0, 64, 100)
        .note_on(0, 9, 36, 100)
        .note_on(10, 9, 36, 0)
        .event(0, &[0xC3, 0x05])
        .end(0);
    let usage = parse_track(track.body()).unwrap().channel_usage();
    assert_eq!(usage.channels().collect::<Vec<_>>(), [0, 3, 9]);
    assert_eq!(usage.note_count(0), 2);
    assert_eq!(usage.note_count(9), 1);
    assert_eq!(usage.note_count(3), 0);
    assert_eq!(usage.mask(), 0b10_0000_1001);
}

#[test]
fn track_chunk_framing() {
    let track = TrackBuilder::new().note_on(0, 0, 60, 100).end(0);
    let events = parse_track_chunk(&track.chunk()).unwrap();
    assert_eq!(events.notes.len(), 1);

    let mut bytes = track.chunk();
    bytes[0..4].copy_from_slice(b"MThd");
    let err = parse_track_chunk(&bytes).unwrap_err();
    assert_eq!(err.error_kind(), &ParseError::InvalidChunkType(*b"MThd"));

    let mut bytes = track.chunk();
    bytes.truncate(bytes.len() - 1);
    let err = parse_track_chunk(&bytes).unwrap_err();
    assert!(matches!(
        err.error_kind(),
        ParseError::IncompleteData { .. }
    ));
}

#[test]
fn error_positions_are_file_relative() {
    let track = TrackBuilder::new().raw(&[0x00, 0x3C]);
    let bytes = track.chunk();
    let err = parse_track_chunk(&bytes).unwrap_err();
    assert_eq!(err.error_kind(), &ParseError::MissingRunningStatus);
    assert_eq!(err.position(), 9);
}

#[test]
fn tick_accumulation_saturates() {
    // 17 maximal deltas sum past u32::MAX
    let track = (0..17)
        .fold(TrackBuilder::new(), |track, _| {
            track.event(vlq::MAX_VALUE, &[0xF8])
        })
        .note_on(1, 0, 60, 100)
        .end(0);
    let events = parse_track(track.body()).unwrap();
    assert_eq!(events.end_tick, u32::MAX);
    assert_eq!(events.notes, [note_on(0, 60, 100, u32::MAX)]);
    assert!(events.ended_explicitly);
}
