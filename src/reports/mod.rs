// ===== fingerforge/src/reports/mod.rs =====
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use fingerforge::api::AssignmentReport;
use fingerforge::midi::TrackSummary;
use fingerforge::presets::get_all_presets;
use fingerforge::recorder::Recorder;
use itertools::Itertools;

pub fn print_run_summary(report: &AssignmentReport) {
    let (left_travel, right_travel) = hand_travel(&report.best);

    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec!["Metric", "Value"]);

    let rows: Vec<(&str, String)> = vec![
        ("Chord events", report.events_processed.to_string()),
        ("Final entropy", format!("{:.2}", report.final_entropy)),
        ("Worst surviving entropy", format!("{:.2}", report.max_entropy)),
        ("Surviving candidates", report.pool_width.to_string()),
        ("Starvation fallbacks", report.starvation_frames.len().to_string()),
        ("Left hand travel (semitones)", left_travel.to_string()),
        ("Right hand travel (semitones)", right_travel.to_string()),
        (
            "Timeline span (frames)",
            format!(
                "{:.1}",
                report.best.frames.last().copied().unwrap_or(0.0)
                    - report.best.frames.first().copied().unwrap_or(0.0)
            ),
        ),
    ];

    for (metric, value) in rows {
        table.add_row(vec![
            Cell::new(metric),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("\n=== 🧾 RUN SUMMARY ===");
    println!("{table}");

    if !report.starvation_frames.is_empty() {
        println!(
            "⚠️  Forced rest continuations at frames: {:?}",
            report.starvation_frames
        );
    }
}

fn hand_travel(recorder: &Recorder) -> (i32, i32) {
    let sum = |hands: &[std::sync::Arc<fingerforge::hand::Hand>]| {
        hands.windows(2).map(|w| w[0].travel(&w[1])).sum::<i32>()
    };
    (sum(&recorder.left_hands), sum(&recorder.right_hands))
}

pub fn print_track_table(tracks: &[TrackSummary]) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec!["Track", "Name", "Programs", "Note events"]);

    for track in tracks {
        let programs = if track.programs.is_empty() {
            "-".to_string()
        } else {
            track
                .programs
                .iter()
                .map(|(channel, name)| format!("ch{}: {}", channel, name))
                .join(", ")
        };

        table.add_row(vec![
            Cell::new(track.index),
            Cell::new(&track.name),
            Cell::new(programs),
            Cell::new(track.note_count).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{table}");
}

pub fn print_preset_table() {
    let mut presets: Vec<_> = get_all_presets().into_iter().collect();
    presets.sort_by_key(|(preset, _)| preset.to_string());

    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec!["Preset", "Min key", "Max key"]);

    for (preset, params) in presets {
        table.add_row(vec![
            Cell::new(preset.to_string()),
            Cell::new(params.min_key).set_alignment(CellAlignment::Right),
            Cell::new(params.max_key).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{table}");
}
