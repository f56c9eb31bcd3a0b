use crate::config::PianoParams;
use std::collections::HashMap;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Named keyboard sizes selectable from the CLI.
#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum KnownPiano {
    Grand88,
    Stage76,
    Classic61,
    Compact49,
}

impl KnownPiano {
    /// Absolute MIDI note bounds of the keyboard.
    pub fn key_bounds(&self) -> (u8, u8) {
        match self {
            Self::Grand88 => (21, 108),
            Self::Stage76 => (28, 103),
            Self::Classic61 => (36, 96),
            Self::Compact49 => (36, 84),
        }
    }

    pub fn to_params(&self) -> PianoParams {
        let (min_key, max_key) = self.key_bounds();
        PianoParams {
            min_key,
            max_key,
            ..PianoParams::default()
        }
    }
}

pub fn get_all_presets() -> HashMap<KnownPiano, PianoParams> {
    let mut map = HashMap::new();
    for preset in KnownPiano::iter() {
        map.insert(preset, preset.to_params());
    }
    map
}
