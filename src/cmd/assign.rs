use crate::reports;
use clap::Args;
use fingerforge::api;
use fingerforge::config::Config;
use fingerforge::error::{FfResult, FingerForgeError};
use fingerforge::export;
use fingerforge::midi::{self, MidiProcessor};
use fingerforge::presets::KnownPiano;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Args, Debug, Clone)]
pub struct AssignArgs {
    #[command(flatten)]
    pub config: Config,

    /// Input: a .mid file or a chord-event .json file.
    #[arg(short, long)]
    pub input: PathBuf,

    #[arg(short, long, default_value = "out/fingering.hand.json")]
    pub output: PathBuf,

    /// Named keyboard preset overriding --min-key/--max-key.
    #[arg(long)]
    pub piano: Option<String>,

    #[arg(long, default_value_t = 60.0)]
    pub fps: f64,

    /// MIDI tracks to read, comma separated; empty reads all tracks.
    #[arg(long, value_delimiter = ',')]
    pub tracks: Vec<usize>,

    /// Restrict to one MIDI channel.
    #[arg(long)]
    pub channel: Option<u8>,

    /// Shift all input notes up one octave.
    #[arg(long, default_value_t = false)]
    pub higher_octave: bool,
}

pub fn run(args: AssignArgs) -> FfResult<()> {
    let piano_params = match &args.piano {
        Some(name) => KnownPiano::from_str(name)
            .map_err(|_| {
                FingerForgeError::Config(format!(
                    "unknown piano preset '{}' (try `inspect --list-pianos`)",
                    name
                ))
            })?
            .to_params(),
        None => args.config.piano.clone(),
    };
    let piano = piano_params.to_piano()?;

    println!("📂 Loading chord events: {}", args.input.display());
    let events = load_events(&args, &piano)?;
    println!(
        "   {} chord events, widest chord {} notes",
        events.len(),
        events.iter().map(|e| e.notes.len()).max().unwrap_or(0)
    );

    println!(
        "🔍 Searching finger assignments (pool width {})...",
        args.config.engine.pool_size
    );
    let report = api::assign_fingering(&events, &piano, &args.config.engine)?;

    reports::print_run_summary(&report);

    let ctx = fingerforge::config::SearchContext::resolve(&args.config.engine)?;
    let frames = export::frames_from_recorder(&report.best, &piano, &ctx)?;
    export::write_hand_frames(&args.output, &frames)?;

    println!("\n🏆 Best entropy: {:.2}", report.final_entropy);
    println!("💾 Saved {} hand frames to {}", frames.len(), args.output.display());
    Ok(())
}

fn load_events(
    args: &AssignArgs,
    piano: &fingerforge::piano::Piano,
) -> FfResult<Vec<midi::ChordEvent>> {
    let is_midi = args
        .input
        .extension()
        .map(|e| e.eq_ignore_ascii_case("mid") || e.eq_ignore_ascii_case("midi"))
        .unwrap_or(false);

    if is_midi {
        let processor = MidiProcessor {
            fps: args.fps,
            tracks: args.tracks.clone(),
            channel: args.channel,
            higher_octave: args.higher_octave,
        };
        processor.read_chord_events(&args.input, piano)
    } else {
        midi::load_chord_events(&args.input)
    }
}
