use crate::track::TrackEvents;

/// Which channels a track touches, and how many notes each one starts.
///
/// This is what part assignment looks at when deciding how to split a
/// track across staves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelUsage {
    mask: u16,
    note_counts: [u32; 16],
}

impl ChannelUsage {
    pub(crate) fn from_events(events: &TrackEvents) -> Self {
        let mut usage = Self::default();
        for note in &events.notes {
            usage.mark(note.channel);
            if !note.ends_note() {
                usage.note_counts[note.channel as usize & 0x0F] += 1;
            }
        }
        for controller in &events.controllers {
            usage.mark(controller.channel);
        }
        usage
    }

    fn mark(&mut self, channel: u8) {
        self.mask |= 1 << (channel & 0x0F);
    }

    /// Bit `n` is set if channel `n` appears in the track.
    pub const fn mask(&self) -> u16 {
        self.mask
    }

    /// True if no channel voice message appeared.
    pub const fn is_empty(&self) -> bool {
        self.mask == 0
    }

    /// True if `channel` appears in the track.
    pub const fn uses(&self, channel: u8) -> bool {
        channel < 16 && self.mask & (1 << channel) != 0
    }

    /// Number of sounding note-ons on `channel`.
    pub const fn note_count(&self, channel: u8) -> u32 {
        if channel < 16 {
            self.note_counts[channel as usize]
        } else {
            0
        }
    }

    /// The used channels in ascending order.
    pub fn channels(&self) -> impl Iterator<Item = u8> + '_ {
        (0..16u8).filter(|&c| self.uses(c))
    }
}
