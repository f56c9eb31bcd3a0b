use crate::config::{EngineParams, SearchContext};
use crate::error::FfResult;
use crate::midi::ChordEvent;
use crate::piano::Piano;
use crate::recorder::{Recorder, RecorderPool};
use tracing::{info, warn};

/// Outcome of a full assignment run: the winning timeline plus the run
/// statistics the reports layer summarizes.
#[derive(Debug, Clone)]
pub struct AssignmentReport {
    pub best: Recorder,
    pub events_processed: usize,
    pub final_entropy: f32,
    pub max_entropy: f32,
    pub pool_width: usize,
    pub starvation_frames: Vec<f64>,
}

/// Service: run the beam search over an ordered chord-event list and return
/// the lowest-entropy fingering sequence. Events are expected pre-sorted by
/// frame; out-of-order input is flagged, not re-sorted.
pub fn assign_fingering(
    events: &[ChordEvent],
    piano: &Piano,
    params: &EngineParams,
) -> FfResult<AssignmentReport> {
    let ctx = SearchContext::resolve(params)?;
    let mut pool = RecorderPool::bootstrap(piano.clone(), ctx)?;

    let mut last_frame = f64::NEG_INFINITY;
    for event in events {
        if event.frame < last_frame {
            warn!(
                frame = event.frame,
                previous = last_frame,
                "chord event out of order; results may be distorted"
            );
        }
        last_frame = event.frame;
        pool.advance(event);
    }

    let best = pool.best().clone();
    info!(
        events = events.len(),
        entropy = best.current_entropy,
        survivors = pool.len(),
        starved = pool.starvation_frames.len(),
        "assignment search complete"
    );

    Ok(AssignmentReport {
        final_entropy: best.current_entropy,
        max_entropy: pool.max_entropy,
        pool_width: pool.len(),
        starvation_frames: pool.starvation_frames.clone(),
        events_processed: events.len(),
        best,
    })
}
