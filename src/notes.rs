#![doc = r#"
Pairing note starts with note ends.

The [`NoteTracker`] keeps at most one sounding note per `(channel, pitch)`
key. Each event does O(1) work:

- a note-on with a sounding note on the same key orphans the old note and
  takes its place;
- a note-off, or a note-on with velocity 0, completes the sounding note,
  or is ignored if nothing is sounding;
- [`NoteTracker::finalize`] orphans whatever is still sounding.

Orphans are data, not errors: they are how a caller learns about notes
that never ended.
"#]

use crate::track::{NoteEvent, NoteKind};
use alloc::vec::Vec;
use bevy_platform::collections::HashMap;

/// The off velocity assumed when a note-on with velocity 0 ends a note.
pub const DEFAULT_OFF_VELOCITY: u8 = 64;

/// The start of a note that has not ended yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveNoteInfo {
    /// Tick of the note-on
    pub on_tick: u32,
    /// Velocity of the note-on
    pub on_velocity: u8,
}

/// A note with both ends known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteWithDuration {
    /// `0..=15`
    pub channel: u8,
    /// `0..=127`
    pub pitch: u8,
    /// Velocity of the note-on
    pub on_velocity: u8,
    /// Velocity of the note-off, or 64 for a velocity 0 note-on
    pub off_velocity: u8,
    /// Tick of the note-on
    pub on_tick: u32,
    /// Tick of the note-off
    pub off_tick: u32,
    /// `off_tick - on_tick`
    pub duration_ticks: u32,
}

/// A note-on that was never ended, or was cut off by another note-on on
/// the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrphanedNote {
    /// `0..=15`
    pub channel: u8,
    /// `0..=127`
    pub pitch: u8,
    /// Velocity of the note-on
    pub on_velocity: u8,
    /// Tick of the note-on
    pub on_tick: u32,
}

/// The result of reconciling one track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteDurations {
    /// Notes in the order they ended
    pub completed: Vec<NoteWithDuration>,
    /// Superseded notes in the order they were cut off, then notes still
    /// sounding at the end of the track ordered by start tick
    pub orphaned: Vec<OrphanedNote>,
}

/// Matches note-ons to note-offs for a single track.
#[derive(Debug, Default)]
pub struct NoteTracker {
    active: HashMap<(u8, u8), ActiveNoteInfo>,
    completed: Vec<NoteWithDuration>,
    orphaned: Vec<OrphanedNote>,
}

impl NoteTracker {
    /// Create a tracker with room for `capacity` completed notes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            active: HashMap::default(),
            completed: Vec::with_capacity(capacity),
            orphaned: Vec::new(),
        }
    }

    /// Route a decoded note event.
    pub fn process(&mut self, event: &NoteEvent) {
        match event.kind {
            NoteKind::NoteOn if event.velocity > 0 => {
                self.note_on(event.channel, event.pitch, event.velocity, event.tick)
            }
            NoteKind::NoteOn => {
                self.note_off(event.channel, event.pitch, DEFAULT_OFF_VELOCITY, event.tick)
            }
            NoteKind::NoteOff => {
                self.note_off(event.channel, event.pitch, event.velocity, event.tick)
            }
        }
    }

    /// Start a note. A velocity of 0 ends the note instead.
    pub fn note_on(&mut self, channel: u8, pitch: u8, velocity: u8, tick: u32) {
        if velocity == 0 {
            return self.note_off(channel, pitch, DEFAULT_OFF_VELOCITY, tick);
        }
        let info = ActiveNoteInfo {
            on_tick: tick,
            on_velocity: velocity,
        };
        if let Some(previous) = self.active.insert((channel, pitch), info) {
            #[cfg(feature = "tracing")]
            tracing::debug!(channel, pitch, on_tick = previous.on_tick, tick, "note superseded");
            self.orphaned.push(OrphanedNote {
                channel,
                pitch,
                on_velocity: previous.on_velocity,
                on_tick: previous.on_tick,
            });
        }
    }

    /// End a note. Ignored if no note is sounding on that key.
    pub fn note_off(&mut self, channel: u8, pitch: u8, velocity: u8, tick: u32) {
        let Some(info) = self.active.remove(&(channel, pitch)) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(channel, pitch, tick, "ignoring note-off with no sounding note");
            return;
        };
        self.completed.push(NoteWithDuration {
            channel,
            pitch,
            on_velocity: info.on_velocity,
            off_velocity: velocity,
            on_tick: info.on_tick,
            off_tick: tick,
            duration_ticks: tick.saturating_sub(info.on_tick),
        });
    }

    /// Number of notes currently sounding.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Orphan everything still sounding and hand back the results.
    pub fn finalize(mut self) -> NoteDurations {
        let mut remaining: Vec<OrphanedNote> = self
            .active
            .drain()
            .map(|((channel, pitch), info)| OrphanedNote {
                channel,
                pitch,
                on_velocity: info.on_velocity,
                on_tick: info.on_tick,
            })
            .collect();
        remaining.sort_unstable_by_key(|n| (n.on_tick, n.channel, n.pitch));
        self.orphaned.append(&mut remaining);

        NoteDurations {
            completed: self.completed,
            orphaned: self.orphaned,
        }
    }
}

#[cfg(test)]
fn note(kind: NoteKind, pitch: u8, velocity: u8, tick: u32) -> NoteEvent {
    NoteEvent {
        kind,
        channel: 0,
        pitch,
        velocity,
        tick,
    }
}

#[test]
fn overlapping_start_orphans_first() {
    use pretty_assertions::assert_eq;
    let mut tracker = NoteTracker::default();
    tracker.process(&note(NoteKind::NoteOn, 60, 100, 0));
    tracker.process(&note(NoteKind::NoteOn, 62, 90, 16));
    tracker.process(&note(NoteKind::NoteOff, 62, 40, 48));
    let result = tracker.finalize();

    assert_eq!(
        result.completed,
        [NoteWithDuration {
            channel: 0,
            pitch: 62,
            on_velocity: 90,
            off_velocity: 40,
            on_tick: 16,
            off_tick: 48,
            duration_ticks: 32,
        }]
    );
    assert_eq!(
        result.orphaned,
        [OrphanedNote {
            channel: 0,
            pitch: 60,
            on_velocity: 100,
            on_tick: 0,
        }]
    );
}

#[test]
fn zero_velocity_ends_note() {
    let mut tracker = NoteTracker::default();
    tracker.process(&note(NoteKind::NoteOn, 60, 100, 10));
    tracker.process(&note(NoteKind::NoteOn, 60, 0, 106));
    let result = tracker.finalize();
    assert_eq!(result.completed.len(), 1);
    assert_eq!(result.completed[0].duration_ticks, 96);
    assert_eq!(result.completed[0].off_velocity, DEFAULT_OFF_VELOCITY);
    assert!(result.orphaned.is_empty());
}

#[test]
fn repeated_start_on_same_key() {
    let mut tracker = NoteTracker::default();
    tracker.note_on(0, 60, 100, 0);
    tracker.note_on(0, 60, 80, 24);
    assert_eq!(tracker.active_count(), 1);
    tracker.note_off(0, 60, 0, 48);
    let result = tracker.finalize();
    assert_eq!(result.orphaned.len(), 1);
    assert_eq!(result.orphaned[0].on_tick, 0);
    assert_eq!(result.completed[0].on_tick, 24);
    assert_eq!(result.completed[0].on_velocity, 80);
}

#[test]
fn dangling_note_off_is_ignored() {
    let mut tracker = NoteTracker::default();
    tracker.note_off(3, 60, 64, 10);
    let result = tracker.finalize();
    assert!(result.completed.is_empty());
    assert!(result.orphaned.is_empty());
}

#[test]
fn keys_include_channel() {
    let mut tracker = NoteTracker::default();
    tracker.note_on(0, 60, 100, 0);
    tracker.note_on(1, 60, 100, 0);
    tracker.note_off(1, 60, 64, 12);
    let result = tracker.finalize();
    assert_eq!(result.completed.len(), 1);
    assert_eq!(result.completed[0].channel, 1);
    assert_eq!(result.orphaned.len(), 1);
    assert_eq!(result.orphaned[0].channel, 0);
}

#[test]
fn finalize_orders_by_start() {
    let mut tracker = NoteTracker::default();
    tracker.note_on(0, 72, 100, 30);
    tracker.note_on(0, 60, 100, 10);
    tracker.note_on(2, 40, 100, 10);
    let result = tracker.finalize();
    let order: alloc::vec::Vec<_> = result
        .orphaned
        .iter()
        .map(|n| (n.on_tick, n.channel, n.pitch))
        .collect();
    assert_eq!(order, [(10, 0, 60), (10, 2, 40), (30, 0, 72)]);
}
