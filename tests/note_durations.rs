mod common;

use common::TrackBuilder;
use midiscore::prelude::*;
use pretty_assertions::assert_eq;

const C4: u8 = 60;
const D4: u8 = 62;

#[test]
fn overlapping_notes_and_orphans() {
    let track = TrackBuilder::new()
        .note_on(0, 0, C4, 100)
        .note_on(16, 0, D4, 90)
        .note_off(32, 0, D4, 64)
        .end(0);
    let events = parse_track(track.body()).unwrap();
    assert_eq!(events.end_tick, 48);

    let notes = events.note_durations();
    assert_eq!(
        notes.completed,
        [NoteWithDuration {
            channel: 0,
            pitch: D4,
            on_velocity: 90,
            off_velocity: 64,
            on_tick: 16,
            off_tick: 48,
            duration_ticks: 32,
        }]
    );
    assert_eq!(
        notes.orphaned,
        [OrphanedNote {
            channel: 0,
            pitch: C4,
            on_velocity: 100,
            on_tick: 0,
        }]
    );
}

#[test]
fn zero_velocity_note_on_ends_note() {
    let track = TrackBuilder::new()
        .note_on(0, 3, C4, 80)
        .note_on(120, 3, C4, 0)
        .end(0);
    let notes = parse_track(track.body()).unwrap().note_durations();
    assert_eq!(notes.completed.len(), 1);
    let note = notes.completed[0];
    assert_eq!(note.duration_ticks, 120);
    assert_eq!(note.off_velocity, 64);
    assert_eq!(note.channel, 3);
    assert!(notes.orphaned.is_empty());
}

#[test]
fn dangling_note_off_is_not_an_error() {
    let track = TrackBuilder::new()
        .note_off(0, 0, C4, 64)
        .note_on(10, 0, D4, 90)
        .note_off(10, 0, D4, 64)
        .end(0);
    let notes = parse_track(track.body()).unwrap().note_durations();
    assert_eq!(notes.completed.len(), 1);
    assert_eq!(notes.completed[0].pitch, D4);
    assert!(notes.orphaned.is_empty());
}

#[test]
fn superseded_note_keeps_new_start() {
    let track = TrackBuilder::new()
        .note_on(0, 0, C4, 100)
        .note_on(24, 0, C4, 70)
        .note_off(24, 0, C4, 0)
        .end(0);
    let notes = parse_track(track.body()).unwrap().note_durations();
    assert_eq!(notes.orphaned.len(), 1);
    assert_eq!(notes.orphaned[0].on_tick, 0);
    assert_eq!(notes.completed[0].on_tick, 24);
    assert_eq!(notes.completed[0].on_velocity, 70);
    assert_eq!(notes.completed[0].duration_ticks, 24);
}

#[test]
fn tracker_can_be_driven_directly() {
    let mut tracker = NoteTracker::default();
    tracker.note_on(0, C4, 100, 0);
    tracker.note_on(0, D4, 100, 0);
    tracker.note_off(0, C4, 50, 96);
    assert_eq!(tracker.active_count(), 1);

    let notes = tracker.finalize();
    assert_eq!(notes.completed[0].duration_ticks, 96);
    assert_eq!(notes.orphaned[0].pitch, D4);
}
