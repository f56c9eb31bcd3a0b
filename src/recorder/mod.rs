pub mod combinations;
pub mod pool;

pub use pool::RecorderPool;

use crate::config::SearchContext;
use crate::error::FfResult;
use crate::hand::{Finger, Hand};
use crate::midi::ChordEvent;
use crate::piano::{semitone_gap, Piano};
use combinations::Combinations;
use std::sync::Arc;

/// One full candidate timeline: hand histories for both sides plus the frame
/// of each processed chord event, index-aligned (entry 0 is the bootstrap
/// rest state at frame 0). Cumulative entropy only ever grows; extension
/// produces child recorders, the parent is never touched.
#[derive(Debug, Clone)]
pub struct Recorder {
    pub left_hands: Vec<Arc<Hand>>,
    pub right_hands: Vec<Arc<Hand>>,
    pub frames: Vec<f64>,
    pub current_entropy: f32,
}

impl Recorder {
    /// The all-rest starting state both hands open from.
    pub fn bootstrap(piano: &Piano, ctx: &SearchContext) -> FfResult<Recorder> {
        Ok(Recorder {
            left_hands: vec![Arc::new(Hand::rest(piano, true, ctx)?)],
            right_hands: vec![Arc::new(Hand::rest(piano, false, ctx)?)],
            frames: vec![0.0],
            current_entropy: 0.0,
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn latest_left(&self) -> &Hand {
        self.left_hands.last().expect("recorder holds at least the bootstrap state")
    }

    pub fn latest_right(&self) -> &Hand {
        self.right_hands.last().expect("recorder holds at least the bootstrap state")
    }

    /// Lazily enumerates every legal successor for the next chord event, one
    /// per surviving finger-to-note assignment, in enumeration order.
    pub fn successors<'a>(
        &'a self,
        event: &'a ChordEvent,
        piano: &'a Piano,
        ctx: &'a SearchContext,
    ) -> impl Iterator<Item = Recorder> + 'a {
        debug_assert!(event.notes.windows(2).all(|w| w[0] < w[1]));

        Combinations::new(ctx.finger_count(), event.notes.len())
            .filter_map(move |combo| self.apply_assignment(&combo, event, piano, ctx))
    }

    /// Attempts one finger-to-note assignment. Returns `None` when the
    /// assignment breaks a playability constraint or the resulting hand is
    /// malformed; such candidates simply do not exist.
    fn apply_assignment(
        &self,
        combo: &[usize],
        event: &ChordEvent,
        piano: &Piano,
        ctx: &SearchContext,
    ) -> Option<Recorder> {
        let mut left: Vec<(u8, usize)> = Vec::new();
        let mut right: Vec<(u8, usize)> = Vec::new();

        // Lowest note goes to the lowest chosen finger; both lists arrive
        // sorted, so span and spacing can be checked incrementally.
        for (&note, &finger_index) in event.notes.iter().zip(combo) {
            let side = if finger_index < ctx.fingers_per_hand {
                &mut left
            } else {
                &mut right
            };

            if let Some(&(lowest, _)) = side.first() {
                if semitone_gap(note, lowest) > ctx.hand_range {
                    return None;
                }
            }
            if let Some(&(prev_note, prev_finger)) = side.last() {
                let gap = semitone_gap(note, prev_note) as f32;
                if gap > ctx.reach_allowance(finger_index, prev_finger) {
                    return None;
                }
            }

            side.push((note, finger_index));
        }

        let (new_left, left_cost) = self.extend_side(&left, true, piano, ctx)?;
        let (new_right, right_cost) = self.extend_side(&right, false, piano, ctx)?;

        let mut left_hands = self.left_hands.clone();
        let mut right_hands = self.right_hands.clone();
        let mut frames = self.frames.clone();
        left_hands.push(new_left);
        right_hands.push(new_right);
        frames.push(event.frame);

        Some(Recorder {
            left_hands,
            right_hands,
            frames,
            current_entropy: self.current_entropy + left_cost + right_cost,
        })
    }

    fn extend_side(
        &self,
        assigned: &[(u8, usize)],
        is_left: bool,
        piano: &Piano,
        ctx: &SearchContext,
    ) -> Option<(Arc<Hand>, f32)> {
        let prev = if is_left {
            self.latest_left()
        } else {
            self.latest_right()
        };

        if assigned.is_empty() {
            // The hand sits this chord out: keep its placement, drop presses.
            return Some((Arc::new(prev.released()), 0.0));
        }

        let struck: Vec<Finger> = assigned
            .iter()
            .map(|&(note, finger_index)| {
                Finger::struck(finger_index, piano.note_to_key(note), is_left)
            })
            .collect();

        // Span violations surface here as construction errors; the candidate
        // is discarded, never propagated.
        let hand = prev.next_hand(struck, piano, ctx).ok()?;
        let cost = prev.transition_cost(&hand, piano, ctx);
        Some((Arc::new(hand), cost))
    }
}
