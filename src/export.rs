use crate::config::SearchContext;
use crate::error::{FfResult, FingerForgeError};
use crate::hand::Hand;
use crate::piano::{KeyNote, Piano};
use crate::recorder::Recorder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerRecord {
    pub finger_index: usize,
    pub key_note: KeyNote,
    pub is_left: bool,
    pub pressed: bool,
    pub is_keep_pressed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandRecord {
    pub hand_note: u8,
    pub hand_position: u8,
    pub hand_span: i32,
    pub is_left: bool,
    pub fingers: Vec<FingerRecord>,
}

/// One exported instant: exactly one of the two hand slots is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandFrame {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub left_hand: Option<HandRecord>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub right_hand: Option<HandRecord>,
    pub frame: f64,
}

impl HandRecord {
    pub fn from_hand(hand: &Hand, piano: &Piano) -> Self {
        HandRecord {
            hand_note: hand.hand_note,
            hand_position: piano.note_to_key(hand.hand_note).position,
            hand_span: hand.hand_span,
            is_left: hand.is_left,
            fingers: hand
                .fingers
                .iter()
                .map(|f| FingerRecord {
                    finger_index: f.finger_index,
                    key_note: f.key_note,
                    is_left: f.is_left,
                    pressed: f.pressed,
                    is_keep_pressed: f.is_keep_pressed,
                })
                .collect(),
        }
    }
}

/// Serializes a recorder's timeline: one record per instant per hand, left
/// records first, each side ordered by frame, with inter-hand collisions
/// resolved by injected rest poses.
pub fn frames_from_recorder(
    recorder: &Recorder,
    piano: &Piano,
    ctx: &SearchContext,
) -> FfResult<Vec<HandFrame>> {
    if recorder.left_hands.len() != recorder.frames.len()
        || recorder.right_hands.len() != recorder.frames.len()
    {
        return Err(FingerForgeError::Validation(format!(
            "misaligned histories: {} left hands, {} right hands, {} frames",
            recorder.left_hands.len(),
            recorder.right_hands.len(),
            recorder.frames.len()
        )));
    }

    let mut left: Vec<HandFrame> = recorder
        .left_hands
        .iter()
        .zip(&recorder.frames)
        .map(|(hand, &frame)| HandFrame {
            left_hand: Some(HandRecord::from_hand(hand, piano)),
            right_hand: None,
            frame,
        })
        .collect();

    let mut right: Vec<HandFrame> = recorder
        .right_hands
        .iter()
        .zip(&recorder.frames)
        .map(|(hand, &frame)| HandFrame {
            left_hand: None,
            right_hand: Some(HandRecord::from_hand(hand, piano)),
            frame,
        })
        .collect();

    resolve_hand_conflicts(&mut left, &mut right, piano, ctx)?;

    left.sort_by(|a, b| a.frame.total_cmp(&b.frame));
    right.sort_by(|a, b| a.frame.total_cmp(&b.frame));
    left.extend(right);
    Ok(left)
}

/// Detects instants where the hands would have to overlap: within the window
/// between two consecutive same-side records, the other hand's extremal
/// finger crossing this hand's extremal finger. The offending side retreats
/// to its home rest pose at the conflicting frame.
fn resolve_hand_conflicts(
    left: &mut Vec<HandFrame>,
    right: &mut Vec<HandFrame>,
    piano: &Piano,
    ctx: &SearchContext,
) -> FfResult<()> {
    let rest_left = HandRecord::from_hand(&Hand::rest(piano, true, ctx)?, piano);
    let rest_right = HandRecord::from_hand(&Hand::rest(piano, false, ctx)?, piano);

    let highest_left = |record: &HandRecord| record.fingers.iter().map(|f| f.key_note.note).max();
    let lowest_right = |record: &HandRecord| record.fingers.iter().map(|f| f.key_note.note).min();

    let mut injected_left = Vec::new();
    let mut injected_right = Vec::new();

    for window in left.windows(2) {
        let Some(current) = &window[0].left_hand else { continue };
        let Some(left_top) = highest_left(current) else { continue };
        let (start, end) = (window[0].frame, window[1].frame);

        for item in right.iter() {
            if item.frame < start || item.frame > end {
                continue;
            }
            let crossed = item
                .right_hand
                .as_ref()
                .and_then(&lowest_right)
                .is_some_and(|right_bottom| right_bottom < left_top);
            if crossed {
                injected_left.push(HandFrame {
                    left_hand: Some(rest_left.clone()),
                    right_hand: None,
                    frame: item.frame,
                });
            }
        }
    }

    for window in right.windows(2) {
        let Some(current) = &window[0].right_hand else { continue };
        let Some(right_bottom) = lowest_right(current) else { continue };
        let (start, end) = (window[0].frame, window[1].frame);

        for item in left.iter() {
            if item.frame < start || item.frame > end {
                continue;
            }
            let crossed = item
                .left_hand
                .as_ref()
                .and_then(&highest_left)
                .is_some_and(|left_top| right_bottom < left_top);
            if crossed {
                injected_right.push(HandFrame {
                    left_hand: None,
                    right_hand: Some(rest_right.clone()),
                    frame: item.frame,
                });
            }
        }
    }

    let found = injected_left.len() + injected_right.len();
    left.append(&mut injected_left);
    right.append(&mut injected_right);

    info!(
        left_frames = left.len(),
        right_frames = right.len(),
        conflicts_found = found,
        conflicts_resolved = found,
        "hand conflict sweep"
    );

    Ok(())
}

/// Writes the exported frames as pretty-printed JSON, creating parent
/// directories as needed.
pub fn write_hand_frames(path: &Path, frames: &[HandFrame]) -> FfResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(file, frames)?;
    Ok(())
}
