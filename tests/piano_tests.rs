use fingerforge::piano::{is_black_key, Piano};
use rstest::rstest;

fn standard_piano() -> Piano {
    Piano::new(21, 108, 52, 76).expect("standard piano")
}

#[rstest]
#[case(60, false)] // C4
#[case(61, true)] // C#4
#[case(62, false)] // D4
#[case(63, true)] // D#4
#[case(64, false)] // E4
#[case(65, false)] // F4
#[case(66, true)] // F#4
#[case(68, true)] // G#4
#[case(70, true)] // A#4
#[case(71, false)] // B4
fn classifies_black_keys(#[case] note: u8, #[case] expected: bool) {
    assert_eq!(is_black_key(note), expected);

    let piano = standard_piano();
    assert_eq!(piano.note_to_key(note).is_black, expected);
}

#[test]
fn out_of_range_notes_are_clamped_not_rejected() {
    let piano = standard_piano();

    let low = piano.note_to_key(5);
    assert_eq!(low.note, 21);
    assert_eq!(low.position, 0);

    let high = piano.note_to_key(120);
    assert_eq!(high.note, 108);
    assert_eq!(high.position, 87);
}

#[test]
fn note_and_position_mappings_are_inverse() {
    let piano = standard_piano();
    for note in 21..=108 {
        let key = piano.note_to_key(note);
        assert_eq!(piano.position_to_key_note(key.position), key);
    }
}

#[test]
fn standard_keyboard_has_52_white_keys() {
    assert_eq!(standard_piano().white_key_count(), 52);
}

#[test]
fn white_stepping_handles_the_semitone_gaps() {
    let piano = standard_piano();

    // E-F and B-C are neighbouring whites one semitone apart.
    assert_eq!(piano.step_white(64, 1), 65);
    assert_eq!(piano.step_white(71, 1), 72);

    assert_eq!(piano.step_white(60, 2), 64);
    assert_eq!(piano.step_white(60, -1), 59);

    // A black key steps from the white below it.
    assert_eq!(piano.step_white(61, 0), 60);
    assert_eq!(piano.step_white(61, 1), 62);
}

#[test]
fn white_stepping_clamps_at_the_ends() {
    let piano = standard_piano();
    assert_eq!(piano.step_white(21, -3), 21);
    assert_eq!(piano.step_white(108, 2), 108);
}

#[test]
fn rejects_inverted_bounds_and_stray_anchors() {
    assert!(Piano::new(60, 60, 60, 60).is_err());
    assert!(Piano::new(21, 108, 10, 76).is_err());
    assert!(Piano::new(21, 108, 52, 110).is_err());
}
