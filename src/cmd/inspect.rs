use crate::reports;
use clap::Args;
use fingerforge::error::{FfResult, FingerForgeError};
use fingerforge::midi;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// MIDI file to inspect.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// List the known piano presets instead.
    #[arg(long, default_value_t = false)]
    pub list_pianos: bool,
}

pub fn run(args: InspectArgs) -> FfResult<()> {
    if args.list_pianos {
        reports::print_preset_table();
        return Ok(());
    }

    let input = args.input.ok_or_else(|| {
        FingerForgeError::Config("pass --input <file.mid> or --list-pianos".to_string())
    })?;

    println!("🔎 Inspecting: {}", input.display());
    let tracks = midi::list_tracks(&input)?;
    reports::print_track_table(&tracks);
    Ok(())
}
