use super::Recorder;
use crate::config::SearchContext;
use crate::error::FfResult;
use crate::midi::ChordEvent;
use crate::piano::Piano;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use tracing::{debug, warn};

/// A candidate successor with its deterministic ranking key. Entropy decides;
/// the (origin, combination) enumeration position breaks ties, so the
/// earliest-enumerated assignment wins among equals and repeated runs agree.
struct Candidate {
    entropy: f32,
    origin: usize,
    combo: usize,
    recorder: Recorder,
}

impl Candidate {
    fn rank(&self, other: &Candidate) -> Ordering {
        self.entropy
            .total_cmp(&other.entropy)
            .then_with(|| self.origin.cmp(&other.origin))
            .then_with(|| self.combo.cmp(&other.combo))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.rank(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.rank(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank(other)
    }
}

/// Bounded best-of-N keeper: a max-heap whose top is always the worst
/// survivor, so a full pool replaces in O(log cap) and eviction happens
/// during the sweep rather than after it.
struct BoundedBest {
    cap: usize,
    heap: BinaryHeap<Candidate>,
}

impl BoundedBest {
    fn new(cap: usize) -> Self {
        BoundedBest {
            cap,
            heap: BinaryHeap::with_capacity(cap + 1),
        }
    }

    fn offer(&mut self, candidate: Candidate) {
        if self.heap.len() < self.cap {
            self.heap.push(candidate);
        } else if let Some(mut worst) = self.heap.peek_mut() {
            if candidate < *worst {
                *worst = candidate;
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn into_vec(self) -> Vec<Candidate> {
        self.heap.into_vec()
    }

    fn into_sorted(self) -> Vec<Candidate> {
        self.heap.into_sorted_vec()
    }
}

/// The surviving beam: at most `pool_size` recorders, kept sorted by rank.
/// Advances one chord event at a time and never ends up empty; when a chord
/// is unplayable the pool degrades to a forced rest continuation instead of
/// failing the run.
pub struct RecorderPool {
    piano: Piano,
    ctx: SearchContext,
    recorders: Vec<Recorder>,
    pub max_entropy: f32,
    pub starvation_frames: Vec<f64>,
}

impl RecorderPool {
    pub fn bootstrap(piano: Piano, ctx: SearchContext) -> FfResult<RecorderPool> {
        let seed = Recorder::bootstrap(&piano, &ctx)?;
        Ok(RecorderPool {
            piano,
            ctx,
            recorders: vec![seed],
            max_entropy: 0.0,
            starvation_frames: Vec::new(),
        })
    }

    pub fn piano(&self) -> &Piano {
        &self.piano
    }

    pub fn context(&self) -> &SearchContext {
        &self.ctx
    }

    pub fn len(&self) -> usize {
        self.recorders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recorders.is_empty()
    }

    pub fn recorders(&self) -> &[Recorder] {
        &self.recorders
    }

    /// The current lowest-entropy survivor.
    pub fn best(&self) -> &Recorder {
        &self.recorders[0]
    }

    /// Expands every survivor through the candidate generator and retains the
    /// `pool_size` lowest-entropy successors. Expansion is independent per
    /// recorder and runs in parallel; each origin keeps its own bounded heap
    /// and the merge walks origins in order, so the surviving set matches a
    /// sequential sweep exactly.
    pub fn advance(&mut self, event: &ChordEvent) {
        let pool_size = self.ctx.pool_size;

        let per_origin: Vec<Vec<Candidate>> = self
            .recorders
            .par_iter()
            .enumerate()
            .map(|(origin, recorder)| {
                let mut keep = BoundedBest::new(pool_size);
                for (combo, successor) in recorder
                    .successors(event, &self.piano, &self.ctx)
                    .enumerate()
                {
                    keep.offer(Candidate {
                        entropy: successor.current_entropy,
                        origin,
                        combo,
                        recorder: successor,
                    });
                }
                keep.into_vec()
            })
            .collect();

        let mut survivors = BoundedBest::new(pool_size);
        for candidate in per_origin.into_iter().flatten() {
            survivors.offer(candidate);
        }

        if survivors.is_empty() {
            warn!(
                frame = event.frame,
                notes = ?event.notes,
                "no playable fingering for this chord; forcing rest continuation"
            );
            self.force_rest_continuation(event);
            return;
        }

        let ranked = survivors.into_sorted();
        if let Some(worst) = ranked.last() {
            self.max_entropy = worst.entropy;
        }
        self.recorders = ranked.into_iter().map(|c| c.recorder).collect();

        debug!(
            frame = event.frame,
            survivors = self.recorders.len(),
            best = self.recorders[0].current_entropy,
            worst = self.max_entropy,
            "pool advanced"
        );
    }

    /// Starvation recovery: keep only the best recorder and append a proxy
    /// state with every press flag flipped on both hands, at unchanged
    /// entropy, so the timeline keeps moving and the export stays aligned.
    fn force_rest_continuation(&mut self, event: &ChordEvent) {
        let best = &self.recorders[0];

        let mut forced = best.clone();
        forced
            .left_hands
            .push(Arc::new(best.latest_left().inverted()));
        forced
            .right_hands
            .push(Arc::new(best.latest_right().inverted()));
        forced.frames.push(event.frame);

        self.max_entropy = forced.current_entropy;
        self.recorders = vec![forced];
        self.starvation_frames.push(event.frame);
    }
}
