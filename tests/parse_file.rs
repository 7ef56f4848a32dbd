mod common;

use common::{TrackBuilder, chunk, file, header};
use midiscore::prelude::*;
use pretty_assertions::assert_eq;

fn song() -> Vec<u8> {
    let conductor = TrackBuilder::new()
        .meta(0, 0x03, b"Song")
        .tempo(0, 600_000)
        .meta(0, 0x58, &[0x03, 0x02, 0x18, 0x08])
        .meta(0, 0x59, &[0x01, 0x00])
        .end(0);
    let piano = TrackBuilder::new()
        .meta(0, 0x03, b"Piano")
        .event(0, &[0xC0, 0x00])
        .note_on(0, 0, 60, 100)
        .event(0, &[0x40, 0x64])
        .event(96, &[0x3C, 0x00])
        .event(0, &[0x40, 0x00])
        .end(0);
    let drums = TrackBuilder::new()
        .note_on(0, 9, 36, 120)
        .note_on(48, 9, 38, 110)
        .end(48);
    file(1, 96, &[conductor, piano, drums])
}

#[test]
fn parses_multitrack_file() {
    let midi = MidiFile::parse(&song()).unwrap();
    assert_eq!(midi.format_type(), FormatType::MultiSync);
    assert_eq!(midi.header().track_count(), 3);
    assert_eq!(midi.division().ticks_per_quarter(), Some(96));
    assert_eq!(midi.tracks().len(), 3);

    let conductor = &midi.tracks()[0];
    assert_eq!(conductor.track_name(), Some("Song"));
    assert_eq!(conductor.time_signatures[0].numerator, 3);
    assert_eq!(conductor.key_signatures[0].sharps_flats, 1);
    assert!(conductor.channel_usage().is_empty());

    let piano = &midi.tracks()[1];
    assert_eq!(piano.track_name(), Some("Piano"));
    let notes = piano.note_durations();
    assert_eq!(notes.completed.len(), 2);
    assert!(notes.completed.iter().all(|n| n.duration_ticks == 96));

    let drums = midi.note_durations().remove(2);
    assert!(drums.completed.is_empty());
    assert_eq!(drums.orphaned.len(), 2);
    assert_eq!(midi.tracks()[2].end_tick, 96);
}

#[test]
fn parsing_is_deterministic() {
    let bytes = song();
    let first = MidiFile::parse(&bytes).unwrap();
    let second = MidiFile::parse(&bytes).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.note_durations(), second.note_durations());
    assert_eq!(first.tempo_map(), second.tempo_map());
}

#[test]
fn unknown_chunks_are_skipped() {
    let track = TrackBuilder::new().note_on(0, 0, 60, 100).end(0);
    let mut bytes = header(0, 1, 480);
    bytes.extend(chunk(b"XFIH", &[0x01, 0x02, 0x03]));
    bytes.extend(track.chunk());
    let midi = MidiFile::parse(&bytes).unwrap();
    assert_eq!(midi.tracks().len(), 1);
    assert_eq!(midi.tracks()[0].notes.len(), 1);
}

#[test]
fn track_count_mismatch() {
    let track = TrackBuilder::new().end(0);
    let mut bytes = header(1, 2, 480);
    bytes.extend(track.chunk());

    let midi = MidiFile::parse(&bytes).unwrap();
    assert_eq!(midi.tracks().len(), 1);

    let options = ParseOptions::default().with_strict_track_count(true);
    let err = MidiFile::parse_with(&bytes, &options).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ParseError::TrackCountMismatch {
            declared: 2,
            found: 1
        }
    );
}

#[test]
fn track_errors_abort_the_file() {
    let good = TrackBuilder::new().note_on(0, 0, 60, 100).end(0);
    let bad = TrackBuilder::new().raw(&[0x00, 0x3C, 0x64]);
    let bytes = file(1, 96, &[good, bad]);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(err.error_kind(), &ParseError::MissingRunningStatus);
    // header 14 + first chunk 8 + 8 body bytes + second chunk header 8 + delta
    assert_eq!(err.position(), 14 + 8 + 8 + 8 + 1);
}

#[test]
fn header_errors_surface() {
    let err = MidiFile::parse(b"MThd").unwrap_err();
    assert_eq!(err.error_kind(), &ParseError::IncompleteHeader);

    let mut bytes = header(0, 1, 96);
    bytes[..4].copy_from_slice(b"RIFF");
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(err.error_kind(), &ParseError::InvalidMagicNumber(*b"RIFF"));

    let err = MidiFile::parse(&header(0, 2, 96)).unwrap_err();
    assert!(matches!(
        err.error_kind(),
        ParseError::InvalidHeaderLength(HeaderError::TrackCount { .. })
    ));
}

#[test]
fn truncated_chunk_is_incomplete_data() {
    let track = TrackBuilder::new().note_on(0, 0, 60, 100).end(0);
    let mut bytes = file(0, 96, &[track]);
    bytes.truncate(bytes.len() - 2);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(matches!(
        err.error_kind(),
        ParseError::IncompleteData { .. }
    ));
}

#[test]
fn trailing_garbage_is_rejected() {
    let track = TrackBuilder::new().end(0);
    let mut bytes = file(0, 96, &[track]);
    bytes.extend([0x00, 0x00]);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(err.is_eof());
}
