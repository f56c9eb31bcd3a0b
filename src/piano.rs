use crate::error::{FfResult, FingerForgeError};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Pitch classes (note % 12) that land on a raised black key.
pub const BLACK_PITCH_CLASSES: [u8; 5] = [1, 3, 6, 8, 10];

/// One key on the keyboard: absolute MIDI note, 0-based position from the
/// lowest key, and black/white classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyNote {
    pub note: u8,
    pub position: u8,
    pub is_black: bool,
}

/// Keyboard description: note bounds plus the two home anchors the hands
/// return to at rest. Immutable after construction; carries the derived
/// white-key table used for rest-pose spreading and finger synthesis.
#[derive(Debug, Clone)]
pub struct Piano {
    pub min_key: u8,
    pub max_key: u8,
    pub middle_left: u8,
    pub middle_right: u8,
    white_keys: Vec<u8>,
}

pub fn is_black_key(note: u8) -> bool {
    BLACK_PITCH_CLASSES.contains(&(note % 12))
}

pub(crate) fn semitone_gap(a: u8, b: u8) -> i32 {
    i32::from(a) - i32::from(b)
}

impl Piano {
    pub fn new(min_key: u8, max_key: u8, middle_left: u8, middle_right: u8) -> FfResult<Self> {
        if min_key >= max_key {
            return Err(FingerForgeError::Config(format!(
                "min_key {} must be below max_key {}",
                min_key, max_key
            )));
        }
        for (name, anchor) in [("middle_left", middle_left), ("middle_right", middle_right)] {
            if anchor < min_key || anchor > max_key {
                return Err(FingerForgeError::Config(format!(
                    "{} anchor {} is outside the keyboard range {}..={}",
                    name, anchor, min_key, max_key
                )));
            }
        }

        let white_keys: Vec<u8> = (min_key..=max_key).filter(|&n| !is_black_key(n)).collect();

        Ok(Piano {
            min_key,
            max_key,
            middle_left,
            middle_right,
            white_keys,
        })
    }

    /// Maps an absolute note to its key. Out-of-range notes are clamped and
    /// flagged rather than rejected.
    pub fn note_to_key(&self, note: u8) -> KeyNote {
        let clamped = if note < self.min_key {
            warn!(note, min_key = self.min_key, "note below keyboard range, clamping");
            self.min_key
        } else if note > self.max_key {
            warn!(note, max_key = self.max_key, "note above keyboard range, clamping");
            self.max_key
        } else {
            note
        };

        KeyNote {
            note: clamped,
            position: clamped - self.min_key,
            is_black: is_black_key(clamped),
        }
    }

    /// Inverse of `note_to_key`.
    pub fn position_to_key_note(&self, position: u8) -> KeyNote {
        let note = self.min_key.saturating_add(position).min(self.max_key);
        KeyNote {
            note,
            position: note - self.min_key,
            is_black: is_black_key(note),
        }
    }

    pub fn white_key_count(&self) -> usize {
        self.white_keys.len()
    }

    /// Walks `steps` white keys from the white key at or below `note`,
    /// clamped at the keyboard's ends. Neighbouring whites are two semitones
    /// apart except across E-F and B-C, where they are one.
    pub fn step_white(&self, note: u8, steps: i32) -> u8 {
        let idx = self.white_index_at_or_below(note) as i32 + steps;
        self.white_note_at(idx.clamp(0, self.white_keys.len() as i32 - 1) as usize)
    }

    pub(crate) fn white_index_at_or_below(&self, note: u8) -> usize {
        self.white_keys
            .partition_point(|&w| w <= note)
            .saturating_sub(1)
    }

    pub(crate) fn white_note_at(&self, index: usize) -> u8 {
        let index = index.min(self.white_keys.len() - 1);
        self.white_keys[index]
    }
}
