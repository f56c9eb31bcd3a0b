pub mod finger;

pub use finger::Finger;

use crate::config::SearchContext;
use crate::error::{FfResult, FingerForgeError};
use crate::piano::{semitone_gap, Piano};

/// A snapshot of one hand: exactly `fingers_per_hand` fingers sorted by
/// finger index, with the derived anchor and span. Immutable once built;
/// transitions always produce new `Hand` values.
#[derive(Debug, Clone)]
pub struct Hand {
    pub fingers: Vec<Finger>,
    /// Anchor position: the note under the middle finger. Thumb and pinky
    /// stretch away from the palm, the middle finger tracks it.
    pub hand_note: u8,
    pub hand_span: i32,
    pub is_left: bool,
}

impl Hand {
    /// Builds a hand from an index-tagged (possibly partial) set of fingers.
    /// Missing fingers are synthesized around the known ones; a span beyond
    /// `max_distance` is a construction error the caller must discard.
    pub fn new(
        mut fingers: Vec<Finger>,
        piano: &Piano,
        is_left: bool,
        ctx: &SearchContext,
    ) -> FfResult<Hand> {
        fingers.sort_by_key(|f| f.finger_index);
        fill_missing_fingers(&mut fingers, piano, is_left, ctx);

        let lowest = fingers[0].key_note.note;
        let highest = fingers[fingers.len() - 1].key_note.note;
        let hand_span = semitone_gap(highest, lowest);
        if hand_span > ctx.max_distance {
            return Err(FingerForgeError::HandSpan {
                span: hand_span,
                max: ctx.max_distance,
            });
        }

        let hand_note = fingers[ctx.fingers_per_hand / 2].key_note.note;

        Ok(Hand {
            fingers,
            hand_note,
            hand_span,
            is_left,
        })
    }

    /// The rest pose: fingers spread one white key apart around the side's
    /// home anchor, nothing pressed.
    pub fn rest(piano: &Piano, is_left: bool, ctx: &SearchContext) -> FfResult<Hand> {
        Hand::new(Vec::new(), piano, is_left, ctx)
    }

    /// Same placement with every press flag cleared. Used when this hand
    /// sits out a chord event.
    pub fn released(&self) -> Hand {
        Hand {
            fingers: self.fingers.iter().map(Finger::released).collect(),
            ..self.clone()
        }
    }

    /// Same placement with every `pressed` flag flipped: the forced proxy
    /// state the pool falls back to when no legal continuation exists.
    pub fn inverted(&self) -> Hand {
        Hand {
            fingers: self
                .fingers
                .iter()
                .map(|f| Finger {
                    pressed: !f.pressed,
                    is_keep_pressed: false,
                    ..*f
                })
                .collect(),
            ..self.clone()
        }
    }

    /// Builds the successor hand from freshly struck fingers, holding over
    /// previous presses where legal. A previously sounding finger is carried
    /// (tagged `is_keep_pressed`) only if it is not part of the new
    /// assignment, its note is unclaimed, it does not invert index-vs-note
    /// ordering against any new finger, and it stays within reach of the
    /// nearest new finger on either side.
    pub fn next_hand(
        &self,
        struck: Vec<Finger>,
        piano: &Piano,
        ctx: &SearchContext,
    ) -> FfResult<Hand> {
        let mut fingers = struck;
        fingers.sort_by_key(|f| f.finger_index);

        for prev in &self.fingers {
            if !prev.pressed {
                continue;
            }
            if fingers.iter().any(|f| f.finger_index == prev.finger_index) {
                continue;
            }
            if fingers.iter().any(|f| f.key_note.note == prev.key_note.note) {
                continue;
            }

            let ordered = fingers.iter().all(|f| {
                if prev.finger_index < f.finger_index {
                    prev.key_note.note <= f.key_note.note
                } else {
                    prev.key_note.note >= f.key_note.note
                }
            });
            if !ordered {
                continue;
            }

            let below = fingers
                .iter()
                .filter(|f| f.finger_index < prev.finger_index)
                .max_by_key(|f| f.finger_index);
            let above = fingers
                .iter()
                .filter(|f| f.finger_index > prev.finger_index)
                .min_by_key(|f| f.finger_index);
            if below.is_some_and(|f| f.is_next_finger_too_far(prev, ctx))
                || above.is_some_and(|f| prev.is_next_finger_too_far(f, ctx))
            {
                continue;
            }

            fingers.push(prev.held_over());
        }

        Hand::new(fingers, piano, self.is_left, ctx)
    }

    /// The movement/discomfort cost of transitioning into `next` on the same
    /// side. Sounding successor fingers pay their travel distance; a freshly
    /// re-struck finger pays double plus a constant; an anchor straying past
    /// the other hand's home boundary pays per semitone of overshoot.
    pub fn transition_cost(&self, next: &Hand, piano: &Piano, ctx: &SearchContext) -> f32 {
        let mut total = 0.0;
        for (cur, nxt) in self.fingers.iter().zip(&next.fingers) {
            if !nxt.pressed {
                continue;
            }
            let diff = semitone_gap(cur.key_note.note, nxt.key_note.note).abs() as f32;
            if cur.pressed && !nxt.is_keep_pressed {
                total += 2.0 * diff + 2.0;
            } else {
                total += diff;
            }
        }

        let overshoot = if self.is_left {
            semitone_gap(next.hand_note, piano.middle_right)
        } else {
            semitone_gap(piano.middle_left, next.hand_note)
        };
        if overshoot > 0 {
            total += overshoot as f32 * ctx.comfort_weight;
        }

        total
    }

    /// Total semitones travelled by the whole hand between two states.
    pub fn travel(&self, next: &Hand) -> i32 {
        self.fingers
            .iter()
            .zip(&next.fingers)
            .map(|(a, b)| semitone_gap(a.key_note.note, b.key_note.note).abs())
            .sum()
    }
}

/// Synthesizes the unspecified fingers. Known fingers stay put; gaps are
/// interpolated in white-key space between the nearest known neighbours,
/// edges extrapolated one white key per finger step, and a fully unspecified
/// hand spreads around its home anchor.
fn fill_missing_fingers(fingers: &mut Vec<Finger>, piano: &Piano, is_left: bool, ctx: &SearchContext) {
    let base = if is_left { 0 } else { ctx.fingers_per_hand };

    if fingers.is_empty() {
        let anchor = if is_left {
            piano.middle_left
        } else {
            piano.middle_right
        };
        let mid = ctx.fingers_per_hand / 2;
        for slot in 0..ctx.fingers_per_hand {
            let note = piano.step_white(anchor, slot as i32 - mid as i32);
            fingers.push(Finger::resting(base + slot, piano.note_to_key(note), is_left));
        }
        return;
    }

    let known = fingers.clone();
    for slot in 0..ctx.fingers_per_hand {
        let index = base + slot;
        if known.iter().any(|f| f.finger_index == index) {
            continue;
        }

        let below = known.iter().filter(|f| f.finger_index < index).last();
        let above = known.iter().find(|f| f.finger_index > index);

        let note = match (below, above) {
            (Some(b), Some(a)) => {
                let wb = piano.white_index_at_or_below(b.key_note.note) as f32;
                let wa = piano.white_index_at_or_below(a.key_note.note) as f32;
                let t = (index - b.finger_index) as f32 / (a.finger_index - b.finger_index) as f32;
                piano.white_note_at((wb + (wa - wb) * t).round().max(0.0) as usize)
            }
            (Some(b), None) => {
                piano.step_white(b.key_note.note, (index - b.finger_index) as i32)
            }
            (None, Some(a)) => {
                piano.step_white(a.key_note.note, -((a.finger_index - index) as i32))
            }
            (None, None) => unreachable!("known finger set is non-empty"),
        };

        fingers.push(Finger::resting(index, piano.note_to_key(note), is_left));
    }

    fingers.sort_by_key(|f| f.finger_index);
}
