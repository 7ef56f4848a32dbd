#![doc = r#"
Reassembling RPN and NRPN data entry from control changes.

```text
B0 65 00   RPN MSB     (NRPN: 63)
B0 64 00   RPN LSB     (NRPN: 62)
B0 06 02   data entry MSB  -> parameter change emitted
B0 26 00   data entry LSB  -> parameter change emitted again, with LSB
```

Each channel keeps its own selection. Selecting a parameter number of the
other kind throws away the selection and any pending data entry. Within a
single kind the selection and data entry survive unrelated control
changes in between.
"#]

use crate::track::{ParameterChange, ParameterKind};

const DATA_ENTRY_MSB: u8 = 6;
const DATA_ENTRY_LSB: u8 = 38;
const NRPN_LSB: u8 = 98;
const NRPN_MSB: u8 = 99;
const RPN_LSB: u8 = 100;
const RPN_MSB: u8 = 101;

const NULL_PARAMETER: u16 = 0x3FFF;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Selection {
    kind: Option<ParameterKind>,
    msb: Option<u8>,
    lsb: Option<u8>,
    data_msb: Option<u8>,
}

impl Selection {
    fn select(&mut self, kind: ParameterKind) {
        if self.kind != Some(kind) {
            *self = Self {
                kind: Some(kind),
                ..Self::default()
            };
        }
    }

    fn current(&self, value_lsb: Option<u8>) -> Option<ParameterChange> {
        let kind = self.kind?;
        let parameter = ((self.msb? as u16) << 7) | self.lsb? as u16;
        if parameter == NULL_PARAMETER {
            return None;
        }
        Some(ParameterChange {
            kind,
            parameter,
            value_msb: self.data_msb?,
            value_lsb,
        })
    }
}

/// Per-channel RPN/NRPN selection state for one track.
#[derive(Debug, Clone, Default)]
pub struct ParameterTracker {
    channels: [Selection; 16],
}

impl ParameterTracker {
    /// Feed one control change.
    ///
    /// Returns a parameter change when the message was a data entry for a
    /// fully selected parameter.
    pub fn control_change(
        &mut self,
        channel: u8,
        controller: u8,
        value: u8,
    ) -> Option<ParameterChange> {
        let state = &mut self.channels[(channel & 0x0F) as usize];
        match controller {
            RPN_MSB => {
                state.select(ParameterKind::Registered);
                state.msb = Some(value);
                None
            }
            RPN_LSB => {
                state.select(ParameterKind::Registered);
                state.lsb = Some(value);
                None
            }
            NRPN_MSB => {
                state.select(ParameterKind::NonRegistered);
                state.msb = Some(value);
                None
            }
            NRPN_LSB => {
                state.select(ParameterKind::NonRegistered);
                state.lsb = Some(value);
                None
            }
            DATA_ENTRY_MSB => {
                state.data_msb = Some(value);
                state.current(None)
            }
            DATA_ENTRY_LSB => state.current(Some(value)),
            _ => None,
        }
    }
}

#[cfg(test)]
fn feed(tracker: &mut ParameterTracker, ccs: &[(u8, u8)]) -> alloc::vec::Vec<ParameterChange> {
    ccs.iter()
        .filter_map(|&(cc, v)| tracker.control_change(0, cc, v))
        .collect()
}

#[test]
fn pitch_bend_range() {
    use pretty_assertions::assert_eq;
    let mut tracker = ParameterTracker::default();
    let changes = feed(&mut tracker, &[(101, 0), (100, 0), (6, 12), (38, 0)]);
    assert_eq!(
        changes,
        [
            ParameterChange {
                kind: ParameterKind::Registered,
                parameter: ParameterChange::PITCH_BEND_RANGE,
                value_msb: 12,
                value_lsb: None,
            },
            ParameterChange {
                kind: ParameterKind::Registered,
                parameter: ParameterChange::PITCH_BEND_RANGE,
                value_msb: 12,
                value_lsb: Some(0),
            },
        ]
    );
}

#[test]
fn survives_unrelated_controllers() {
    let mut tracker = ParameterTracker::default();
    let changes = feed(&mut tracker, &[(101, 0), (7, 100), (100, 2), (64, 127), (6, 64)]);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].parameter, ParameterChange::COARSE_TUNING);
}

#[test]
fn switching_kind_discards_state() {
    let mut tracker = ParameterTracker::default();
    // full RPN selection with data, then NRPN MSB only
    feed(&mut tracker, &[(101, 0), (100, 1), (6, 64)]);
    let changes = feed(&mut tracker, &[(99, 3), (38, 10)]);
    assert!(changes.is_empty());

    let changes = feed(&mut tracker, &[(98, 7), (6, 1)]);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].kind, ParameterKind::NonRegistered);
    assert_eq!(changes[0].parameter, (3 << 7) | 7);
}

#[test]
fn lsb_needs_msb() {
    let mut tracker = ParameterTracker::default();
    assert!(feed(&mut tracker, &[(101, 0), (100, 0), (38, 5)]).is_empty());
}

#[test]
fn null_parameter_is_silent() {
    let mut tracker = ParameterTracker::default();
    assert!(feed(&mut tracker, &[(101, 127), (100, 127), (6, 5)]).is_empty());
}

#[test]
fn channels_are_independent() {
    let mut tracker = ParameterTracker::default();
    tracker.control_change(0, 101, 0);
    tracker.control_change(0, 100, 0);
    assert_eq!(tracker.control_change(1, 6, 2), None);
    assert!(tracker.control_change(0, 6, 2).is_some());
}
