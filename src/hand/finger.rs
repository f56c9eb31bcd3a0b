use crate::config::SearchContext;
use crate::piano::{semitone_gap, KeyNote};

/// One playable digit. Indices `0..fingers_per_hand` belong to the left hand,
/// the rest to the right, ascending along the keyboard. `pressed` means the
/// finger is sounding its key in this state; `is_keep_pressed` marks a press
/// carried over from the previous state without re-striking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finger {
    pub finger_index: usize,
    pub key_note: KeyNote,
    pub is_left: bool,
    pub pressed: bool,
    pub is_keep_pressed: bool,
}

impl Finger {
    /// A finger freshly striking its key.
    pub fn struck(finger_index: usize, key_note: KeyNote, is_left: bool) -> Self {
        Finger {
            finger_index,
            key_note,
            is_left,
            pressed: true,
            is_keep_pressed: false,
        }
    }

    /// A finger hovering over its key without sounding it.
    pub fn resting(finger_index: usize, key_note: KeyNote, is_left: bool) -> Self {
        Finger {
            finger_index,
            key_note,
            is_left,
            pressed: false,
            is_keep_pressed: false,
        }
    }

    /// The same finger still sounding across a transition, not re-struck.
    pub fn held_over(&self) -> Self {
        Finger {
            is_keep_pressed: true,
            pressed: true,
            ..*self
        }
    }

    pub fn released(&self) -> Self {
        Finger {
            pressed: false,
            is_keep_pressed: false,
            ..*self
        }
    }

    /// Whether `next` sits beyond what the two finger slots can physically
    /// spread to: allowed distance is the gap between their lateral offsets
    /// scaled by `finger_range`.
    pub fn is_next_finger_too_far(&self, next: &Finger, ctx: &SearchContext) -> bool {
        let allowed = ctx.reach_allowance(self.finger_index, next.finger_index);
        let actual = semitone_gap(self.key_note.note, next.key_note.note).abs() as f32;
        actual > allowed
    }
}
