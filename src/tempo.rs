#![doc = r#"
Converting ticks into wall-clock time.

A [`TempoMap`] is built once per file from every set-tempo event on every
track. Tick 0 always has a tempo: if the file does not set one there, the
format's default of 500 000 µs per quarter (120 BPM) is assumed.

Time is integrated segment by segment. A segment runs from one tempo
change to the next and contributes

```text
segment_ticks * microseconds_per_quarter / ticks_per_quarter
```

with 64-bit intermediates. The elapsed time at the start of each segment
is computed up front, so a query is a binary search plus one partial
segment.

With a frame-based division every tick has the same length,
`1_000_000 / (fps * ticks_per_frame)` µs, and tempo events do not affect
wall-clock time.
"#]

use crate::{Division, TempoEvent, UMicros};
use alloc::vec::Vec;

/// Tick positions to microseconds under any number of tempo changes.
///
/// With the `serde` feature only the tempo events and the division are
/// stored; deserializing rebuilds the map.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "TempoMapRepr", into = "TempoMapRepr")
)]
pub struct TempoMap {
    events: Vec<TempoEvent>,
    segment_starts: Vec<u64>,
    division: Division,
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct TempoMapRepr {
    events: Vec<TempoEvent>,
    division: Division,
}

#[cfg(feature = "serde")]
impl From<TempoMapRepr> for TempoMap {
    fn from(repr: TempoMapRepr) -> Self {
        Self::new(repr.events, repr.division)
    }
}

#[cfg(feature = "serde")]
impl From<TempoMap> for TempoMapRepr {
    fn from(map: TempoMap) -> Self {
        Self {
            events: map.events,
            division: map.division,
        }
    }
}

impl TempoMap {
    /// Build a map from tempo events in any order.
    ///
    /// Events sharing a tick collapse to the last one given.
    pub fn new<I>(events: I, division: Division) -> Self
    where
        I: IntoIterator<Item = TempoEvent>,
    {
        let mut map = Self {
            events: Vec::new(),
            segment_starts: Vec::new(),
            division,
        };
        map.rebuild(events);
        map
    }

    /// Replace every tempo event, keeping the division.
    pub fn rebuild<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = TempoEvent>,
    {
        let mut events: Vec<TempoEvent> = events.into_iter().collect();
        events.sort_by_key(|e| e.tick);
        events.dedup_by(|later, earlier| {
            if later.tick == earlier.tick {
                *earlier = *later;
                true
            } else {
                false
            }
        });
        if !matches!(events.first(), Some(e) if e.tick == 0) {
            #[cfg(feature = "tracing")]
            tracing::debug!("no tempo at tick 0, assuming 120 bpm");
            events.insert(
                0,
                TempoEvent {
                    tick: 0,
                    microseconds_per_quarter: TempoEvent::DEFAULT_MICROS_PER_QUARTER,
                },
            );
        }

        let mut segment_starts = Vec::with_capacity(events.len());
        let mut elapsed = 0u64;
        segment_starts.push(elapsed);
        for pair in events.windows(2) {
            elapsed += self.span_us(pair[1].tick - pair[0].tick, pair[0].microseconds_per_quarter);
            segment_starts.push(elapsed);
        }

        self.events = events;
        self.segment_starts = segment_starts;
    }

    fn span_us(&self, ticks: u32, micros_per_quarter: u32) -> u64 {
        match self.division {
            Division::TicksPerQuarter(tpq) => {
                ticks as u64 * micros_per_quarter as u64 / tpq.get() as u64
            }
            Division::Smpte(smpte) => {
                ticks as u64 * 1_000_000 / smpte.ticks_per_second() as u64
            }
        }
    }

    fn segment(&self, tick: u32) -> usize {
        // events[0] sits at tick 0, so the partition point is at least 1
        self.events.partition_point(|e| e.tick <= tick) - 1
    }

    /// Microseconds per quarter note in effect at `tick`.
    pub fn tempo_at(&self, tick: u32) -> u32 {
        self.events[self.segment(tick)].microseconds_per_quarter
    }

    /// Beats per minute in effect at `tick`.
    pub fn bpm_at(&self, tick: u32) -> f64 {
        self.events[self.segment(tick)].bpm()
    }

    /// Microseconds from the start of the file to `tick`.
    pub fn absolute_time_us(&self, tick: u32) -> u64 {
        if let Division::Smpte(_) = self.division {
            return self.span_us(tick, 0);
        }
        let idx = self.segment(tick);
        let event = &self.events[idx];
        self.segment_starts[idx] + self.span_us(tick - event.tick, event.microseconds_per_quarter)
    }

    /// [`TempoMap::absolute_time_us`] as [`UMicros`].
    pub fn absolute_time(&self, tick: u32) -> UMicros {
        UMicros::new(self.absolute_time_us(tick))
    }

    /// Wall-clock length of a note. Zero if `off_tick <= on_tick`.
    pub fn note_duration_us(&self, on_tick: u32, off_tick: u32) -> u64 {
        if off_tick <= on_tick {
            return 0;
        }
        self.absolute_time_us(off_tick) - self.absolute_time_us(on_tick)
    }

    /// [`TempoMap::note_duration_us`] as [`UMicros`].
    pub fn note_duration(&self, on_tick: u32, off_tick: u32) -> UMicros {
        UMicros::new(self.note_duration_us(on_tick, off_tick))
    }

    /// The tempo changes, ascending by tick, starting at tick 0.
    pub fn events(&self) -> &[TempoEvent] {
        &self.events
    }

    /// The file's division.
    pub fn division(&self) -> Division {
        self.division
    }
}

#[cfg(test)]
fn tpq(ticks: u16) -> Division {
    Division::from_raw(ticks).unwrap()
}

#[cfg(test)]
fn tempo(tick: u32, microseconds_per_quarter: u32) -> TempoEvent {
    TempoEvent {
        tick,
        microseconds_per_quarter,
    }
}

#[test]
fn integrates_across_tempo_change() {
    let map = TempoMap::new(
        [tempo(0, 500_000), tempo(48, 400_000)],
        tpq(96),
    );
    assert_eq!(map.absolute_time_us(48), 250_000);
    assert_eq!(map.absolute_time_us(96), 450_000);
    assert_eq!(map.note_duration_us(0, 96), 450_000);
    assert_eq!(map.note_duration_us(96, 0), 0);
    assert_eq!(map.note_duration_us(10, 10), 0);
}

#[test]
fn defaults_to_120_bpm() {
    let map = TempoMap::new([], tpq(480));
    assert_eq!(map.events(), &[tempo(0, 500_000)]);
    assert_eq!(map.tempo_at(1_000_000), 500_000);
    assert_eq!(map.bpm_at(0), 120.);
    assert_eq!(map.absolute_time(960), UMicros::new(1_000_000));
}

#[test]
fn synthesizes_start_before_first_change() {
    let map = TempoMap::new([tempo(96, 250_000)], tpq(96));
    assert_eq!(map.events().len(), 2);
    assert_eq!(map.tempo_at(95), 500_000);
    assert_eq!(map.tempo_at(96), 250_000);
    assert_eq!(map.absolute_time_us(192), 500_000 + 250_000);
}

#[test]
fn sorts_and_collapses_events() {
    use pretty_assertions::assert_eq;
    let map = TempoMap::new(
        [
            tempo(200, 300_000),
            tempo(0, 600_000),
            tempo(100, 400_000),
            tempo(100, 450_000),
        ],
        tpq(100),
    );
    assert_eq!(
        map.events(),
        &[tempo(0, 600_000), tempo(100, 450_000), tempo(200, 300_000)]
    );
    assert_eq!(map.tempo_at(150), 450_000);
    assert_eq!(map.absolute_time_us(300), 600_000 + 450_000 + 300_000);
}

#[test]
fn smpte_ignores_tempo() {
    let division = Division::from_raw(0xE728).unwrap(); // 25 fps, 40 ticks per frame
    let map = TempoMap::new([tempo(0, 250_000)], division);
    assert_eq!(map.absolute_time_us(1_000), 1_000_000);
    assert_eq!(map.note_duration_us(500, 1_500), 1_000_000);
}

#[test]
fn wide_intermediates() {
    // the last representable tick at the slowest tempo
    let map = TempoMap::new([tempo(0, 0xFF_FFFF)], tpq(1));
    assert_eq!(
        map.absolute_time_us(u32::MAX),
        u32::MAX as u64 * 0xFF_FFFF
    );
}

#[test]
fn rebuild_replaces_events() {
    let mut map = TempoMap::new([tempo(0, 400_000)], tpq(96));
    map.rebuild([tempo(0, 800_000)]);
    assert_eq!(map.absolute_time_us(96), 800_000);
}

#[cfg(feature = "serde")]
#[test]
fn deserializing_rebuilds_the_map() {
    let map: TempoMap = serde_json::from_str(r#"{"events":[],"division":96}"#).unwrap();
    assert_eq!(map.events(), &[tempo(0, 500_000)]);
    assert_eq!(map.tempo_at(10), 500_000);
    assert_eq!(map.absolute_time_us(96), 500_000);

    let map: TempoMap =
        serde_json::from_str(r#"{"events":[{"tick":48,"microseconds_per_quarter":400000}],"division":96}"#)
            .unwrap();
    assert_eq!(map.absolute_time_us(96), 250_000 + 200_000);

    let json = serde_json::to_string(&map).unwrap();
    assert!(!json.contains("segment_starts"));
    assert_eq!(serde_json::from_str::<TempoMap>(&json).unwrap(), map);

    assert!(serde_json::from_str::<TempoMap>(r#"{"events":[],"division":0}"#).is_err());
}
