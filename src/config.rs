use crate::error::{FfResult, FingerForgeError};
use clap::Args;
use serde::{Deserialize, Serialize};

#[derive(Args, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[command(flatten)]
    pub engine: EngineParams,
    #[command(flatten)]
    pub piano: PianoParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    /// Beam width: candidate fingering sequences kept after each chord.
    #[arg(long, default_value_t = 100)]
    pub pool_size: usize,

    /// Max semitone span one hand may strike within a single chord.
    #[arg(long, default_value_t = 12)]
    pub hand_range: i32,

    /// Scale factor applied to the finger-distribution offsets when deciding
    /// whether two fingers can reach their assigned keys.
    #[arg(long, default_value_t = 2.0)]
    pub finger_range: f32,

    /// Max semitone span of a fully-formed hand (struck + synthesized).
    #[arg(long, default_value_t = 13)]
    pub max_distance: i32,

    #[arg(long, default_value_t = 5)]
    pub fingers_per_hand: usize,

    /// Per-finger lateral offsets from the palm centre, thumb to pinky order
    /// along the keyboard. Extremes stretch furthest, middle stays put.
    #[arg(long, default_value = "-3.5,-2.0,0.0,2.0,3.5")]
    pub finger_distribution: String,

    /// Penalty per semitone an anchor strays past the other hand's territory.
    #[arg(long, default_value_t = 2.0)]
    pub comfort_weight: f32,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            pool_size: 100,
            hand_range: 12,
            finger_range: 2.0,
            max_distance: 13,
            fingers_per_hand: 5,
            finger_distribution: "-3.5,-2.0,0.0,2.0,3.5".to_string(),
            comfort_weight: 2.0,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PianoParams {
    #[arg(long, default_value_t = 21)]
    pub min_key: u8,
    #[arg(long, default_value_t = 108)]
    pub max_key: u8,
    /// Home anchor the left hand rests around.
    #[arg(long, default_value_t = 52)]
    pub middle_left: u8,
    /// Home anchor the right hand rests around.
    #[arg(long, default_value_t = 76)]
    pub middle_right: u8,
}

impl Default for PianoParams {
    fn default() -> Self {
        Self {
            min_key: 21,
            max_key: 108,
            middle_left: 52,
            middle_right: 76,
        }
    }
}

impl PianoParams {
    pub fn to_piano(&self) -> FfResult<crate::piano::Piano> {
        crate::piano::Piano::new(self.min_key, self.max_key, self.middle_left, self.middle_right)
    }
}

/// Engine parameters resolved and validated once at the boundary, then passed
/// by reference through the search. Replaces any notion of process-wide
/// mutable configuration.
#[derive(Debug, Clone)]
pub struct SearchContext {
    pub pool_size: usize,
    pub hand_range: i32,
    pub finger_range: f32,
    pub max_distance: i32,
    pub fingers_per_hand: usize,
    pub comfort_weight: f32,
    pub finger_distribution: Vec<f32>,
}

impl SearchContext {
    pub fn resolve(params: &EngineParams) -> FfResult<Self> {
        if params.pool_size == 0 {
            return Err(FingerForgeError::Config(
                "pool_size must be greater than zero".to_string(),
            ));
        }
        if params.fingers_per_hand == 0 {
            return Err(FingerForgeError::Config(
                "fingers_per_hand must be greater than zero".to_string(),
            ));
        }
        if params.hand_range <= 0 || params.max_distance <= 0 {
            return Err(FingerForgeError::Config(format!(
                "hand_range ({}) and max_distance ({}) must be positive",
                params.hand_range, params.max_distance
            )));
        }
        if params.finger_range <= 0.0 {
            return Err(FingerForgeError::Config(format!(
                "finger_range must be positive, got {}",
                params.finger_range
            )));
        }

        let finger_distribution = parse_f32_list(&params.finger_distribution)?;
        if finger_distribution.len() != params.fingers_per_hand {
            return Err(FingerForgeError::Config(format!(
                "finger_distribution has {} entries, expected {} (one per finger)",
                finger_distribution.len(),
                params.fingers_per_hand
            )));
        }

        Ok(SearchContext {
            pool_size: params.pool_size,
            hand_range: params.hand_range,
            finger_range: params.finger_range,
            max_distance: params.max_distance,
            fingers_per_hand: params.fingers_per_hand,
            comfort_weight: params.comfort_weight,
            finger_distribution,
        })
    }

    pub fn finger_count(&self) -> usize {
        2 * self.fingers_per_hand
    }

    /// Lateral offset of a finger slot, indexed hand-relative for either side.
    pub fn lateral_offset(&self, finger_index: usize) -> f32 {
        self.finger_distribution[finger_index % self.fingers_per_hand]
    }

    /// Max semitone distance two finger slots of one hand can be spread apart.
    pub fn reach_allowance(&self, finger_a: usize, finger_b: usize) -> f32 {
        (self.lateral_offset(finger_a) - self.lateral_offset(finger_b)).abs() * self.finger_range
    }
}

fn parse_f32_list(s: &str) -> FfResult<Vec<f32>> {
    s.split(',')
        .map(|p| {
            p.trim().parse::<f32>().map_err(|_| {
                FingerForgeError::Config(format!("invalid number '{}' in finger_distribution", p))
            })
        })
        .collect()
}
