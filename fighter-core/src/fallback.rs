//! Heuristic policy for when the opponent model has too little to go on.
//!
//! Two pieces: a gate that turns the size of the relevant history bucket into
//! the probability of trying prediction at all, and a distance/energy gated
//! menu of attacks used otherwise.

use rand::Rng;

use crate::action::Action;
use crate::config::AgentConfig;
use crate::constants::{HEAVY_SPECIAL_ENERGY, LIGHT_SPECIAL_ENERGY, MEDIUM_SPECIAL_ENERGY};
use crate::frame::CharacterSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FallbackPolicy {
    pub min_opp_data: i32,
    pub upper_opp_data: i32,
    pub min_distance: i32,
    pub upper_distance: i32,
}

impl FallbackPolicy {
    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            min_opp_data: config.min_opp_data,
            upper_opp_data: config.upper_opp_data,
            min_distance: config.min_distance,
            upper_distance: config.upper_distance,
        }
    }

    /// Linear map of `sample_count` over the calibration interval. Not clamped:
    /// below the interval it is negative, above it exceeds 1.
    #[inline]
    pub fn predictive_probability(&self, sample_count: usize) -> f64 {
        (sample_count as f64 - f64::from(self.min_opp_data))
            / (f64::from(self.upper_opp_data) - f64::from(self.min_opp_data))
    }

    pub fn prefers_prediction<R: Rng + ?Sized>(&self, sample_count: usize, rng: &mut R) -> bool {
        rng.gen::<f64>() < self.predictive_probability(sample_count)
    }

    /// 0 at or inside `min_distance`, 1 at or beyond `upper_distance`.
    #[inline]
    pub fn attack_range_score(&self, distance: i32) -> f64 {
        let score = (f64::from(distance) - f64::from(self.min_distance))
            / (f64::from(self.upper_distance) - f64::from(self.min_distance));
        score.clamp(0.0, 1.0)
    }

    pub fn choose<R: Rng + ?Sized>(
        &self,
        me: &CharacterSnapshot,
        opp: &CharacterSnapshot,
        rng: &mut R,
    ) -> Action {
        let pick = rng.gen_range(0..3);
        let range_draw = rng.gen::<f64>();
        self.choose_with(me, opp, pick, range_draw)
    }

    /// Menu lookup with the random draws supplied by the caller.
    pub fn choose_with(
        &self,
        me: &CharacterSnapshot,
        opp: &CharacterSnapshot,
        pick: usize,
        range_draw: f64,
    ) -> Action {
        let distance = i32::try_from(opp.x.abs_diff(me.x)).unwrap_or(i32::MAX);
        let close = self.attack_range_score(distance) < range_draw;
        let can_spend = |threshold: i32| me.energy > threshold && !opp.is_knocked_down();
        let gated = |threshold: i32, strong: Action, weak: Action| {
            if can_spend(threshold) {
                strong
            } else {
                weak
            }
        };

        match (opp.is_airborne(), close, pick % 3) {
            (false, true, 0) => Action::StandFb,
            (false, true, 1) => Action::CrouchB,
            (false, true, _) => gated(LIGHT_SPECIAL_ENERGY, Action::StandA, Action::ThrowA),
            (false, false, 0) => gated(MEDIUM_SPECIAL_ENERGY, Action::StandDDfFb, Action::StandDDfFa),
            (false, false, 1) => gated(HEAVY_SPECIAL_ENERGY, Action::StandDDbBb, Action::StandDDbBa),
            (false, false, _) => Action::CrouchFb,
            (true, true, 0) => Action::CrouchFa,
            (true, true, 1) => Action::StandFb,
            (true, true, _) => gated(HEAVY_SPECIAL_ENERGY, Action::StandFDDfb, Action::StandFDDfa),
            (true, false, 0) => gated(HEAVY_SPECIAL_ENERGY, Action::AirDDfFb, Action::AirDDfFa),
            (true, false, 1) => Action::AirUb,
            (true, false, _) => gated(HEAVY_SPECIAL_ENERGY, Action::StandFDDfb, Action::StandFDDfa),
        }
    }
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self::from_config(&AgentConfig::default())
    }
}
