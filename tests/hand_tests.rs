use fingerforge::config::{EngineParams, SearchContext};
use fingerforge::error::FingerForgeError;
use fingerforge::hand::{Finger, Hand};
use fingerforge::piano::Piano;

fn standard_piano() -> Piano {
    Piano::new(21, 108, 52, 76).expect("standard piano")
}

fn ctx() -> SearchContext {
    SearchContext::resolve(&EngineParams::default()).expect("default context")
}

fn notes_of(hand: &Hand) -> Vec<u8> {
    hand.fingers.iter().map(|f| f.key_note.note).collect()
}

#[test]
fn rest_pose_spreads_one_white_key_per_finger() {
    let piano = standard_piano();
    let ctx = ctx();

    let left = Hand::rest(&piano, true, &ctx).unwrap();
    assert_eq!(notes_of(&left), vec![48, 50, 52, 53, 55]);
    assert_eq!(left.hand_note, 52);
    assert_eq!(left.hand_span, 7);
    assert!(left.fingers.iter().all(|f| !f.pressed));

    let right = Hand::rest(&piano, false, &ctx).unwrap();
    assert_eq!(notes_of(&right), vec![72, 74, 76, 77, 79]);
    assert_eq!(right.hand_note, 76);
    assert_eq!(
        right.fingers.iter().map(|f| f.finger_index).collect::<Vec<_>>(),
        vec![5, 6, 7, 8, 9]
    );
}

#[test]
fn single_finger_hand_synthesizes_the_rest() {
    let piano = standard_piano();
    let ctx = ctx();

    let hand = Hand::new(
        vec![Finger::struck(5, piano.note_to_key(60), false)],
        &piano,
        false,
        &ctx,
    )
    .unwrap();

    assert_eq!(notes_of(&hand), vec![60, 62, 64, 65, 67]);
    assert_eq!(hand.hand_note, 64);
    assert_eq!(hand.hand_span, 7);
    assert!(hand.fingers[0].pressed);
    assert!(hand.fingers[1..].iter().all(|f| !f.pressed));
}

#[test]
fn interior_fingers_interpolate_between_known_neighbours() {
    let piano = standard_piano();
    let ctx = ctx();

    let hand = Hand::new(
        vec![
            Finger::struck(5, piano.note_to_key(60), false),
            Finger::struck(9, piano.note_to_key(67), false),
        ],
        &piano,
        false,
        &ctx,
    )
    .unwrap();

    assert_eq!(notes_of(&hand), vec![60, 62, 64, 65, 67]);
}

#[test]
fn overstretched_hand_is_a_construction_error() {
    let piano = standard_piano();
    let ctx = ctx();

    let result = Hand::new(
        vec![
            Finger::struck(0, piano.note_to_key(40), true),
            Finger::struck(4, piano.note_to_key(60), true),
        ],
        &piano,
        true,
        &ctx,
    );

    assert!(matches!(
        result,
        Err(FingerForgeError::HandSpan { span: 20, max: 13 })
    ));
}

#[test]
fn fresh_press_costs_its_travel_distance() {
    let piano = standard_piano();
    let ctx = ctx();

    let rest = Hand::rest(&piano, true, &ctx).unwrap();
    let next = rest
        .next_hand(vec![Finger::struck(0, piano.note_to_key(50), true)], &piano, &ctx)
        .unwrap();

    // Finger 0 moves 48 -> 50 and was not sounding before.
    assert_eq!(rest.transition_cost(&next, &piano, &ctx), 2.0);
}

#[test]
fn restriking_the_same_finger_is_penalized() {
    let piano = standard_piano();
    let ctx = ctx();

    let rest = Hand::rest(&piano, true, &ctx).unwrap();
    let first = rest
        .next_hand(vec![Finger::struck(0, piano.note_to_key(50), true)], &piano, &ctx)
        .unwrap();
    let second = first
        .next_hand(vec![Finger::struck(0, piano.note_to_key(52), true)], &piano, &ctx)
        .unwrap();

    // Same finger sounding back-to-back: 2 * diff + 2.
    assert_eq!(first.transition_cost(&second, &piano, &ctx), 6.0);
}

#[test]
fn held_over_fingers_carry_and_cost_nothing() {
    let piano = Piano::new(21, 108, 52, 64).unwrap();
    let ctx = ctx();

    let rest = Hand::rest(&piano, false, &ctx).unwrap();
    let first = rest
        .next_hand(vec![Finger::struck(5, piano.note_to_key(60), false)], &piano, &ctx)
        .unwrap();
    assert_eq!(rest.transition_cost(&first, &piano, &ctx), 0.0);

    let second = first
        .next_hand(vec![Finger::struck(7, piano.note_to_key(64), false)], &piano, &ctx)
        .unwrap();

    let thumb = &second.fingers[0];
    assert_eq!(thumb.finger_index, 5);
    assert!(thumb.pressed);
    assert!(thumb.is_keep_pressed);
    assert_eq!(first.transition_cost(&second, &piano, &ctx), 0.0);
}

#[test]
fn carry_over_respects_note_ordering() {
    let piano = Piano::new(21, 108, 52, 64).unwrap();
    let ctx = ctx();

    let rest = Hand::rest(&piano, false, &ctx).unwrap();
    let first = rest
        .next_hand(vec![Finger::struck(5, piano.note_to_key(60), false)], &piano, &ctx)
        .unwrap();

    // Finger 6 lands below the still-sounding finger 5: holding it over
    // would cross fingers, so the press is dropped.
    let second = first
        .next_hand(vec![Finger::struck(6, piano.note_to_key(58), false)], &piano, &ctx)
        .unwrap();

    let thumb = &second.fingers[0];
    assert_eq!(thumb.finger_index, 5);
    assert!(!thumb.pressed);
}

#[test]
fn straying_into_the_other_hands_territory_is_penalized() {
    let piano = standard_piano();
    let ctx = ctx();

    let rest = Hand::rest(&piano, true, &ctx).unwrap();
    let next = rest
        .next_hand(vec![Finger::struck(2, piano.note_to_key(79), true)], &piano, &ctx)
        .unwrap();

    // Anchor lands at 79, three semitones past middle_right 76:
    // travel 27 plus 3 * comfort_weight.
    assert_eq!(next.hand_note, 79);
    assert_eq!(rest.transition_cost(&next, &piano, &ctx), 27.0 + 6.0);
}

#[test]
fn released_and_inverted_only_touch_press_flags() {
    let piano = standard_piano();
    let ctx = ctx();

    let rest = Hand::rest(&piano, true, &ctx).unwrap();
    let pressed = rest
        .next_hand(vec![Finger::struck(0, piano.note_to_key(48), true)], &piano, &ctx)
        .unwrap();

    let released = pressed.released();
    assert_eq!(notes_of(&released), notes_of(&pressed));
    assert!(released.fingers.iter().all(|f| !f.pressed && !f.is_keep_pressed));

    let inverted = pressed.inverted();
    assert_eq!(notes_of(&inverted), notes_of(&pressed));
    for (a, b) in pressed.fingers.iter().zip(&inverted.fingers) {
        assert_eq!(a.pressed, !b.pressed);
    }
}
