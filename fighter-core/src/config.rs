use std::env;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DELAY_FRAMES, EVALUATION_FRAMES, K_DISTANCE, K_THRESHOLD, MAX_K, MAX_ROLLOUTS_PER_FRAME,
    MIN_DISTANCE, MIN_OPP_DATA, RESET_ROUND_PERIOD, UPPER_DISTANCE, UPPER_OPP_DATA,
};
use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub k_distance: i32,
    pub k_threshold: f64,
    pub max_k: usize,
    pub delay_frames: u32,
    pub evaluation_frames: u32,
    pub min_opp_data: i32,
    pub upper_opp_data: i32,
    pub min_distance: i32,
    pub upper_distance: i32,
    pub reset_round_period: u32,
    /// When false the predictive path is always tried first.
    pub use_fallback_gate: bool,
    pub filter_unaffordable_candidates: bool,
    pub max_rollouts_per_frame: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            k_distance: K_DISTANCE,
            k_threshold: K_THRESHOLD,
            max_k: MAX_K,
            delay_frames: DELAY_FRAMES,
            evaluation_frames: EVALUATION_FRAMES,
            min_opp_data: MIN_OPP_DATA,
            upper_opp_data: UPPER_OPP_DATA,
            min_distance: MIN_DISTANCE,
            upper_distance: UPPER_DISTANCE,
            reset_round_period: RESET_ROUND_PERIOD,
            use_fallback_gate: true,
            filter_unaffordable_candidates: false,
            max_rollouts_per_frame: MAX_ROLLOUTS_PER_FRAME,
        }
    }
}

impl AgentConfig {
    /// Defaults overlaid with `FIGHTER_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let mut min_opp_data = read_i32(&lookup, "FIGHTER_MIN_OPP_DATA", defaults.min_opp_data);
        let mut upper_opp_data =
            read_i32(&lookup, "FIGHTER_UPPER_OPP_DATA", defaults.upper_opp_data);
        if min_opp_data >= upper_opp_data {
            tracing::warn!(
                "FIGHTER_MIN_OPP_DATA ({}) >= FIGHTER_UPPER_OPP_DATA ({}). Falling back to defaults.",
                min_opp_data,
                upper_opp_data
            );
            min_opp_data = defaults.min_opp_data;
            upper_opp_data = defaults.upper_opp_data;
        }

        let mut min_distance = read_i32(&lookup, "FIGHTER_MIN_DISTANCE", defaults.min_distance);
        let mut upper_distance =
            read_i32(&lookup, "FIGHTER_UPPER_DISTANCE", defaults.upper_distance);
        if min_distance >= upper_distance {
            tracing::warn!(
                "FIGHTER_MIN_DISTANCE ({}) >= FIGHTER_UPPER_DISTANCE ({}). Falling back to defaults.",
                min_distance,
                upper_distance
            );
            min_distance = defaults.min_distance;
            upper_distance = defaults.upper_distance;
        }

        Self {
            k_distance: read_positive_i32(&lookup, "FIGHTER_K_DISTANCE", defaults.k_distance),
            k_threshold: lookup("FIGHTER_K_THRESHOLD")
                .and_then(|value| value.parse::<f64>().ok())
                .filter(|value| value.is_finite() && *value >= 0.0)
                .unwrap_or(defaults.k_threshold),
            max_k: read_positive_u32(&lookup, "FIGHTER_MAX_K", defaults.max_k as u32) as usize,
            delay_frames: read_u32_allow_zero(&lookup, "FIGHTER_DELAY_FRAMES", defaults.delay_frames),
            evaluation_frames: read_positive_u32(
                &lookup,
                "FIGHTER_EVALUATION_FRAMES",
                defaults.evaluation_frames,
            ),
            min_opp_data,
            upper_opp_data,
            min_distance,
            upper_distance,
            reset_round_period: read_positive_u32(
                &lookup,
                "FIGHTER_RESET_ROUND_PERIOD",
                defaults.reset_round_period,
            ),
            use_fallback_gate: read_bool(&lookup, "FIGHTER_USE_FALLBACK_GATE", defaults.use_fallback_gate),
            filter_unaffordable_candidates: read_bool(
                &lookup,
                "FIGHTER_FILTER_UNAFFORDABLE",
                defaults.filter_unaffordable_candidates,
            ),
            max_rollouts_per_frame: read_positive_u32(
                &lookup,
                "FIGHTER_MAX_ROLLOUTS",
                defaults.max_rollouts_per_frame as u32,
            ) as usize,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.k_distance <= 0 {
            return Err(ConfigError::NonPositive {
                field: "k_distance",
                value: i64::from(self.k_distance),
            });
        }
        if self.k_threshold.is_nan() || self.k_threshold < 0.0 {
            return Err(ConfigError::NegativeThreshold {
                value: self.k_threshold,
            });
        }
        if self.max_k == 0 {
            return Err(ConfigError::NonPositive {
                field: "max_k",
                value: 0,
            });
        }
        if self.evaluation_frames == 0 {
            return Err(ConfigError::NonPositive {
                field: "evaluation_frames",
                value: 0,
            });
        }
        if self.reset_round_period == 0 {
            return Err(ConfigError::NonPositive {
                field: "reset_round_period",
                value: 0,
            });
        }
        if self.max_rollouts_per_frame == 0 {
            return Err(ConfigError::NonPositive {
                field: "max_rollouts_per_frame",
                value: 0,
            });
        }
        if self.upper_opp_data == self.min_opp_data {
            return Err(ConfigError::DegenerateInterval {
                field: "opp_data",
                min: self.min_opp_data,
                upper: self.upper_opp_data,
            });
        }
        if self.upper_distance == self.min_distance {
            return Err(ConfigError::DegenerateInterval {
                field: "distance",
                min: self.min_distance,
                upper: self.upper_distance,
            });
        }
        Ok(())
    }
}

fn read_i32(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: i32) -> i32 {
    lookup(name)
        .and_then(|value| value.trim().parse::<i32>().ok())
        .unwrap_or(default)
}

fn read_positive_i32(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: i32) -> i32 {
    lookup(name)
        .and_then(|value| value.trim().parse::<i32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

fn read_positive_u32(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u32) -> u32 {
    lookup(name)
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

fn read_u32_allow_zero(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u32) -> u32 {
    lookup(name)
        .and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn read_bool(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: bool) -> bool {
    match lookup(name) {
        Some(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        None => default,
    }
}
