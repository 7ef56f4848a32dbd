mod common;

use common::{TrackBuilder, file};
use midiscore::prelude::*;

#[test]
fn note_spanning_tempo_change() {
    let track = TrackBuilder::new()
        .tempo(0, 500_000)
        .note_on(0, 0, 60, 100)
        .tempo(48, 400_000)
        .note_off(48, 0, 60, 64)
        .end(0);
    let midi = MidiFile::parse(&file(0, 96, &[track])).unwrap();

    let tempo = midi.tempo_map();
    let notes = midi.tracks()[0].note_durations();
    let note = notes.completed[0];

    assert_eq!(note.duration_ticks, 96);
    assert_eq!(tempo.note_duration_us(note.on_tick, note.off_tick), 450_000);
    assert_eq!(tempo.absolute_time_us(48), 250_000);
    assert_eq!(tempo.tempo_at(47), 500_000);
    assert_eq!(tempo.tempo_at(48), 400_000);
    assert_eq!(tempo.bpm_at(48), 150.);
}

#[test]
fn tempo_from_conductor_track() {
    let conductor = TrackBuilder::new()
        .tempo(0, 1_000_000)
        .tempo(960, 500_000)
        .end(0);
    let melody = TrackBuilder::new()
        .note_on(480, 0, 60, 100)
        .note_off(960, 0, 60, 64)
        .end(0);
    let midi = MidiFile::parse(&file(1, 960, &[conductor, melody])).unwrap();

    let tempo = midi.tempo_map();
    assert_eq!(tempo.events().len(), 2);

    let note = midi.note_durations()[1].completed[0];
    assert_eq!((note.on_tick, note.off_tick), (480, 1440));
    // 480 ticks at 1 s per quarter, then 480 at 0.5 s per quarter
    assert_eq!(
        tempo.note_duration(note.on_tick, note.off_tick),
        UMicros::new(500_000 + 250_000)
    );
}

#[test]
fn file_without_tempo_runs_at_120_bpm() {
    let track = TrackBuilder::new()
        .note_on(0, 0, 60, 100)
        .note_off(480, 0, 60, 64)
        .end(0);
    let midi = MidiFile::parse(&file(0, 480, &[track])).unwrap();
    let tempo = midi.tempo_map();
    assert_eq!(tempo.events(), &[TempoEvent {
        tick: 0,
        microseconds_per_quarter: 500_000
    }]);
    assert_eq!(tempo.absolute_time(480).as_secs_f64(), 0.5);
}

#[test]
fn smpte_division() {
    // 30 fps, 80 ticks per frame: 2400 ticks per second
    let track = TrackBuilder::new()
        .tempo(0, 250_000)
        .note_on(0, 0, 60, 100)
        .note_off(2400, 0, 60, 64)
        .end(0);
    let midi = MidiFile::parse(&file(0, 0xE250, &[track])).unwrap();
    let smpte = midi.division().smpte().unwrap();
    assert_eq!(smpte.fps(), SmpteFps::Thirty);
    assert_eq!(midi.tempo_map().note_duration_us(0, 2400), 1_000_000);
}
