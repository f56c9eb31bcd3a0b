use fingerforge::config::{EngineParams, SearchContext};
use fingerforge::midi::ChordEvent;
use fingerforge::piano::Piano;
use fingerforge::recorder::combinations::Combinations;
use fingerforge::recorder::Recorder;

fn ctx() -> SearchContext {
    SearchContext::resolve(&EngineParams::default()).expect("default context")
}

fn event(notes: Vec<u8>, frame: f64) -> ChordEvent {
    ChordEvent {
        notes,
        frame,
        real_tick: 0.0,
    }
}

#[test]
fn combinations_enumerate_lexicographically() {
    let all: Vec<Vec<usize>> = Combinations::new(5, 2).collect();
    assert_eq!(all.len(), 10);
    assert_eq!(all[0], vec![0, 1]);
    assert_eq!(all[1], vec![0, 2]);
    assert_eq!(all[9], vec![3, 4]);
    assert!(all.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn combinations_edge_cases() {
    let empty: Vec<Vec<usize>> = Combinations::new(4, 0).collect();
    assert_eq!(empty, vec![Vec::<usize>::new()]);

    let none: Vec<Vec<usize>> = Combinations::new(3, 4).collect();
    assert!(none.is_empty());

    let full: Vec<Vec<usize>> = Combinations::new(3, 3).collect();
    assert_eq!(full, vec![vec![0, 1, 2]]);
}

#[test]
fn bootstrap_starts_at_rest_with_zero_entropy() {
    let piano = Piano::new(21, 108, 52, 76).unwrap();
    let recorder = Recorder::bootstrap(&piano, &ctx()).unwrap();

    assert_eq!(recorder.len(), 1);
    assert_eq!(recorder.frames, vec![0.0]);
    assert_eq!(recorder.current_entropy, 0.0);
    assert!(recorder.latest_left().fingers.iter().all(|f| !f.pressed));
    assert!(recorder.latest_right().fingers.iter().all(|f| !f.pressed));
}

#[test]
fn single_note_fans_out_to_every_finger() {
    let piano = Piano::new(21, 108, 52, 76).unwrap();
    let ctx = ctx();
    let recorder = Recorder::bootstrap(&piano, &ctx).unwrap();

    let successors: Vec<Recorder> = recorder
        .successors(&event(vec![60], 10.0), &piano, &ctx)
        .collect();

    // One successor per finger slot; a lone note breaks no constraint.
    assert_eq!(successors.len(), 10);
    for successor in &successors {
        assert_eq!(successor.len(), 2);
        assert_eq!(successor.frames[1], 10.0);
        assert!(successor.current_entropy >= 0.0);
    }
}

#[test]
fn wide_intervals_reject_cramped_finger_pairs() {
    let piano = Piano::new(21, 108, 52, 76).unwrap();
    let ctx = ctx();
    let recorder = Recorder::bootstrap(&piano, &ctx).unwrap();

    let successors: Vec<Recorder> = recorder
        .successors(&event(vec![60, 68], 10.0), &piano, &ctx)
        .collect();

    // 25 two-hand splits survive, plus the 4 single-hand pairs per side
    // whose lateral allowance covers an 8-semitone stretch.
    assert_eq!(successors.len(), 33);

    for successor in &successors {
        for hand in [successor.latest_left(), successor.latest_right()] {
            let struck: Vec<_> = hand.fingers.iter().filter(|f| f.pressed).collect();
            for pair in struck.windows(2) {
                let gap = i32::from(pair[1].key_note.note) - i32::from(pair[0].key_note.note);
                let allowed =
                    ctx.reach_allowance(pair[0].finger_index, pair[1].finger_index);
                assert!(gap as f32 <= allowed, "spread {} exceeds {}", gap, allowed);
            }
        }
    }
}

#[test]
fn in_position_chord_wins_without_moving() {
    // Home poses: left on C3..G3, right already covering the chord.
    let piano = Piano::new(21, 108, 52, 64).unwrap();
    let ctx = ctx();
    let recorder = Recorder::bootstrap(&piano, &ctx).unwrap();

    let chord = event(vec![60, 62, 64, 65, 67], 5.0);
    let successors: Vec<Recorder> = recorder.successors(&chord, &piano, &ctx).collect();
    assert!(!successors.is_empty());

    let best = successors
        .iter()
        .min_by(|a, b| a.current_entropy.total_cmp(&b.current_entropy))
        .unwrap();

    assert_eq!(best.current_entropy, 0.0);
    assert!(best.latest_left().fingers.iter().all(|f| !f.pressed));
    let right_notes: Vec<u8> = best
        .latest_right()
        .fingers
        .iter()
        .filter(|f| f.pressed)
        .map(|f| f.key_note.note)
        .collect();
    assert_eq!(right_notes, vec![60, 62, 64, 65, 67]);

    // Any candidate splitting the chord across both hands moves the left
    // hand out of position and ranks strictly worse.
    for successor in &successors {
        if successor.latest_left().fingers.iter().any(|f| f.pressed) {
            assert!(successor.current_entropy > 0.0);
        }
    }
}

#[test]
fn successor_extends_histories_without_touching_the_parent() {
    let piano = Piano::new(21, 108, 52, 76).unwrap();
    let ctx = ctx();
    let recorder = Recorder::bootstrap(&piano, &ctx).unwrap();

    let successors: Vec<Recorder> = recorder
        .successors(&event(vec![60], 4.0), &piano, &ctx)
        .collect();

    assert_eq!(recorder.len(), 1);
    assert_eq!(recorder.current_entropy, 0.0);
    for successor in &successors {
        assert_eq!(successor.left_hands.len(), 2);
        assert_eq!(successor.right_hands.len(), 2);
        assert_eq!(successor.frames.len(), 2);
    }
}
