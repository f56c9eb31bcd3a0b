use crate::error::{FfResult, FingerForgeError};
use crate::piano::Piano;
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// Default MIDI tempo (microseconds per beat) before any set_tempo event.
const DEFAULT_TEMPO: u32 = 500_000;

/// General MIDI program names, for track inspection.
pub const GM_INSTRUMENTS: [&str; 128] = [
    "Acoustic Grand Piano", "Bright Acoustic Piano", "Electric Grand Piano", "Honky-tonk Piano",
    "Electric Piano 1", "Electric Piano 2", "Harpsichord", "Clavi",
    "Celesta", "Glockenspiel", "Music Box", "Vibraphone",
    "Marimba", "Xylophone", "Tubular Bells", "Dulcimer",
    "Drawbar Organ", "Percussive Organ", "Rock Organ", "Church Organ",
    "Reed Organ", "Accordion", "Harmonica", "Tango Accordion",
    "Acoustic Guitar (nylon)", "Acoustic Guitar (steel)", "Electric Guitar (jazz)",
    "Electric Guitar (clean)", "Electric Guitar (muted)", "Overdriven Guitar",
    "Distortion Guitar", "Guitar Harmonics",
    "Acoustic Bass", "Electric Bass (finger)", "Electric Bass (pick)", "Fretless Bass",
    "Slap Bass 1", "Slap Bass 2", "Synth Bass 1", "Synth Bass 2",
    "Violin", "Viola", "Cello", "Contrabass",
    "Tremolo Strings", "Pizzicato Strings", "Orchestral Harp", "Timpani",
    "String Ensemble 1", "String Ensemble 2", "Synth Strings 1", "Synth Strings 2",
    "Choir Aahs", "Voice Oohs", "Synth Voice", "Orchestra Hit",
    "Trumpet", "Trombone", "Tuba", "Muted Trumpet",
    "French Horn", "Brass Section", "Synth Brass 1", "Synth Brass 2",
    "Soprano Sax", "Alto Sax", "Tenor Sax", "Baritone Sax",
    "Oboe", "English Horn", "Bassoon", "Clarinet",
    "Piccolo", "Flute", "Recorder", "Pan Flute",
    "Blown Bottle", "Shakuhachi", "Whistle", "Ocarina",
    "Lead 1 (square)", "Lead 2 (sawtooth)", "Lead 3 (calliope)", "Lead 4 (chiff)",
    "Lead 5 (charang)", "Lead 6 (voice)", "Lead 7 (fifths)", "Lead 8 (bass + lead)",
    "Pad 1 (new age)", "Pad 2 (warm)", "Pad 3 (polysynth)", "Pad 4 (choir)",
    "Pad 5 (bowed)", "Pad 6 (metallic)", "Pad 7 (halo)", "Pad 8 (sweep)",
    "FX 1 (rain)", "FX 2 (soundtrack)", "FX 3 (crystal)", "FX 4 (atmosphere)",
    "FX 5 (brightness)", "FX 6 (goblins)", "FX 7 (echoes)", "FX 8 (sci-fi)",
    "Sitar", "Banjo", "Shamisen", "Koto",
    "Kalimba", "Bagpipe", "Fiddle", "Shanai",
    "Tinkle Bell", "Agogo", "Steel Drums", "Woodblock",
    "Taiko Drum", "Melodic Tom", "Synth Drum", "Reverse Cymbal",
    "Guitar Fret Noise", "Breath Noise", "Seashore", "Bird Tweet",
    "Telephone Ring", "Helicopter", "Applause", "Gunshot",
];

/// One instant on the timeline carrying the notes struck together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChordEvent {
    pub notes: Vec<u8>,
    pub frame: f64,
    #[serde(default)]
    pub real_tick: f64,
}

/// A tempo change at an absolute tick.
#[derive(Debug, Clone, Copy)]
pub struct TempoChange {
    pub track: usize,
    pub micros_per_beat: u32,
    pub tick: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackSummary {
    pub index: usize,
    pub name: String,
    /// (channel, General MIDI program name) pairs announced on this track.
    pub programs: Vec<(u8, &'static str)>,
    pub note_count: usize,
}

/// Loads pre-extracted chord events from JSON, sorted by frame with notes
/// normalized to sorted-distinct.
pub fn load_chord_events(path: &Path) -> FfResult<Vec<ChordEvent>> {
    let file = fs::File::open(path)?;
    let mut events: Vec<ChordEvent> = serde_json::from_reader(BufReader::new(file))?;
    for event in &mut events {
        event.notes.sort_unstable();
        event.notes.dedup();
    }
    events.sort_by(|a, b| a.frame.total_cmp(&b.frame));
    Ok(events)
}

/// Extracts chord events from a Standard MIDI File: tempo map, track/channel
/// selection, simultaneous-note grouping, octave folding into the keyboard
/// range and chord simplification down to what ten fingers can strike.
#[derive(Debug, Clone)]
pub struct MidiProcessor {
    pub fps: f64,
    /// Tracks to read; empty means every track.
    pub tracks: Vec<usize>,
    /// Restrict to one channel; `None` accepts all.
    pub channel: Option<u8>,
    /// Shift all input up one octave before folding.
    pub higher_octave: bool,
}

impl MidiProcessor {
    pub fn read_chord_events(&self, path: &Path, piano: &Piano) -> FfResult<Vec<ChordEvent>> {
        let bytes = fs::read(path)?;
        let smf = Smf::parse(&bytes)?;

        let ticks_per_beat = match smf.header.timing {
            Timing::Metrical(t) => u32::from(t.as_int()),
            Timing::Timecode(..) => {
                return Err(FingerForgeError::Config(
                    "SMPTE-timecode MIDI files are not supported".to_string(),
                ))
            }
        };

        let tempo_changes = collect_tempo_changes(&smf);
        info!(
            tracks = smf.tracks.len(),
            ticks_per_beat,
            tempo_changes = tempo_changes.len(),
            "parsed MIDI file"
        );

        let selected: Vec<usize> = if self.tracks.is_empty() {
            (0..smf.tracks.len()).collect()
        } else {
            self.tracks.clone()
        };

        let mut by_tick: BTreeMap<u64, BTreeSet<i32>> = BTreeMap::new();
        for &track_index in &selected {
            let track = smf.tracks.get(track_index).ok_or_else(|| {
                FingerForgeError::Validation(format!(
                    "track {} requested but the file has only {} tracks",
                    track_index,
                    smf.tracks.len()
                ))
            })?;

            let mut abs_tick = 0u64;
            for event in track {
                abs_tick += u64::from(event.delta.as_int());
                let TrackEventKind::Midi { channel, message } = event.kind else {
                    continue;
                };
                if self.channel.is_some_and(|c| c != channel.as_int()) {
                    continue;
                }
                if let MidiMessage::NoteOn { key, vel } = message {
                    if vel.as_int() == 0 {
                        continue;
                    }
                    let mut note = i32::from(key.as_int());
                    if self.higher_octave {
                        note += 12;
                    }
                    by_tick.entry(abs_tick).or_default().insert(note);
                }
            }
        }

        let limit = 10;
        let mut events = Vec::with_capacity(by_tick.len());
        for (tick, raw_notes) in by_tick {
            let raw: Vec<i32> = raw_notes.into_iter().collect();
            let notes = simplify_notes(
                compress_notes(&raw, piano.min_key, piano.max_key),
                limit,
            );
            if notes.is_empty() {
                continue;
            }
            let real_tick = tick as f64;
            events.push(ChordEvent {
                notes,
                frame: self.frame_at(&tempo_changes, ticks_per_beat, real_tick),
                real_tick,
            });
        }

        debug!(events = events.len(), "extracted chord events");
        Ok(events)
    }

    /// Integrates the tempo map to convert an absolute tick into a frame
    /// number at the configured FPS.
    pub fn frame_at(
        &self,
        tempo_changes: &[TempoChange],
        ticks_per_beat: u32,
        real_tick: f64,
    ) -> f64 {
        let mut seconds = 0.0;
        let mut last_tick = 0.0;
        let mut tempo = DEFAULT_TEMPO;

        for change in tempo_changes {
            let tick = change.tick as f64;
            if tick >= real_tick {
                break;
            }
            seconds += (tick - last_tick) * tempo as f64 / (ticks_per_beat as f64 * 1_000_000.0);
            last_tick = tick;
            tempo = change.micros_per_beat;
        }
        seconds += (real_tick - last_tick) * tempo as f64 / (ticks_per_beat as f64 * 1_000_000.0);

        seconds * self.fps
    }
}

pub fn collect_tempo_changes(smf: &Smf) -> Vec<TempoChange> {
    let mut changes = Vec::new();
    for (track, events) in smf.tracks.iter().enumerate() {
        let mut abs_tick = 0u64;
        for event in events {
            abs_tick += u64::from(event.delta.as_int());
            if let TrackEventKind::Meta(MetaMessage::Tempo(t)) = event.kind {
                changes.push(TempoChange {
                    track,
                    micros_per_beat: t.as_int(),
                    tick: abs_tick,
                });
            }
        }
    }
    changes.sort_by_key(|c| c.tick);
    changes
}

/// Folds out-of-range notes by octaves into `[min, max]`, dropping
/// duplicates; the result is sorted.
pub fn compress_notes(notes: &[i32], min: u8, max: u8) -> Vec<u8> {
    let (min, max) = (i32::from(min), i32::from(max));
    let mut folded = BTreeSet::new();
    for &raw in notes {
        let mut note = raw;
        while note < min {
            note += 12;
        }
        while note > max {
            note -= 12;
        }
        folded.insert(note as u8);
    }
    folded.into_iter().collect()
}

/// Caps a chord at `limit` notes. Keeps the extremes, first drops middle
/// notes that duplicate an extreme at the octave, then drops innermost middle
/// notes so the remainder stays reachable from both ends. Deterministic.
pub fn simplify_notes(notes: Vec<u8>, limit: usize) -> Vec<u8> {
    if notes.len() <= limit {
        return notes;
    }

    let lowest = notes[0];
    let highest = notes[notes.len() - 1];
    let mut middles: Vec<u8> = notes[1..notes.len() - 1].to_vec();
    let mut to_remove = notes.len() - limit;

    middles.retain(|&note| {
        let octave_dup = (note - lowest) % 12 == 0 || (highest - note) % 12 == 0;
        if octave_dup && to_remove > 0 {
            to_remove -= 1;
            false
        } else {
            true
        }
    });

    while to_remove > 0 && !middles.is_empty() {
        middles.remove(middles.len() / 2);
        to_remove -= 1;
    }

    let mut result = Vec::with_capacity(limit);
    result.push(lowest);
    result.extend(middles);
    result.push(highest);
    result
}

/// Lists a MIDI file's tracks with names, announced programs and note counts.
pub fn list_tracks(path: &Path) -> FfResult<Vec<TrackSummary>> {
    let bytes = fs::read(path)?;
    let smf = Smf::parse(&bytes)?;

    let mut summaries = Vec::with_capacity(smf.tracks.len());
    for (index, track) in smf.tracks.iter().enumerate() {
        let mut name = String::new();
        let mut programs = Vec::new();
        let mut note_count = 0;

        for event in track {
            match event.kind {
                TrackEventKind::Meta(MetaMessage::TrackName(raw)) => {
                    name = String::from_utf8_lossy(raw).into_owned();
                }
                TrackEventKind::Midi { channel, message } => match message {
                    MidiMessage::ProgramChange { program } => {
                        let entry = (channel.as_int(), GM_INSTRUMENTS[program.as_int() as usize]);
                        if !programs.contains(&entry) {
                            programs.push(entry);
                        }
                    }
                    MidiMessage::NoteOn { vel, .. } if vel.as_int() > 0 => {
                        note_count += 1;
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        summaries.push(TrackSummary {
            index,
            name,
            programs,
            note_count,
        });
    }

    Ok(summaries)
}
