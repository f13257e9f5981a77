//! k-nearest-neighbour prediction of the opponent's next attack.
//!
//! Observations are compared against the current agent→opponent offset. Those
//! inside `k_distance` are ranked by distance, the closest `k` vote, and every
//! action tied for the most votes is predicted.

use std::collections::BTreeSet;

use crate::action::{Action, ACTION_COUNT};
use crate::config::AgentConfig;
use crate::history::AttackObservation;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KnnParams {
    pub k_distance: i32,
    pub k_threshold: f64,
    pub max_k: usize,
}

impl KnnParams {
    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            k_distance: config.k_distance,
            k_threshold: config.k_threshold,
            max_k: config.max_k,
        }
    }

    /// Number of neighbours that vote for a history of `observation_count` entries.
    #[inline]
    pub fn k_for(&self, observation_count: usize) -> usize {
        let threshold = (observation_count as f64 * self.k_threshold).floor() as usize + 1;
        threshold.min(self.max_k)
    }
}

impl Default for KnnParams {
    fn default() -> Self {
        Self::from_config(&AgentConfig::default())
    }
}

/// An observation paired with its distance to the current query. Only exists
/// for the duration of one prediction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankedObservation {
    pub observation: AttackObservation,
    pub distance: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prediction {
    /// Fewer than `required` observations fell inside the distance threshold.
    InsufficientEvidence { required: usize, found: usize },
    /// Actions tied for the highest vote, in ordinal order.
    Predicted(BTreeSet<Action>),
}

impl Prediction {
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Prediction::Predicted(_))
    }

    pub fn actions(&self) -> Option<&BTreeSet<Action>> {
        match self {
            Prediction::Predicted(actions) => Some(actions),
            Prediction::InsufficientEvidence { .. } => None,
        }
    }
}

/// Truncated Euclidean distance between a stored offset and the query offset.
/// When the agent faces away the stored offset is mirrored.
#[inline]
pub fn mirrored_distance(observation: &AttackObservation, dx: i32, dy: i32, facing_front: bool) -> i32 {
    let (ox, oy) = (f64::from(observation.offset_x), f64::from(observation.offset_y));
    let (qx, qy) = (f64::from(dx), f64::from(dy));
    let (ex, ey) = if facing_front {
        (ox - qx, oy - qy)
    } else {
        (ox + qx, oy + qy)
    };
    // Saturates at i32::MAX for offsets far outside the stage.
    ex.hypot(ey) as i32
}

/// Stable ascending sort by distance; equal distances keep their chronological order.
pub fn sort_by_distance(ranked: &mut [RankedObservation]) {
    ranked.sort_by_key(|entry| entry.distance);
}

pub fn rank_neighbours(
    observations: &[AttackObservation],
    dx: i32,
    dy: i32,
    facing_front: bool,
    k_distance: i32,
) -> Vec<RankedObservation> {
    let mut ranked: Vec<RankedObservation> = observations
        .iter()
        .map(|observation| RankedObservation {
            observation: *observation,
            distance: mirrored_distance(observation, dx, dy, facing_front),
        })
        .filter(|entry| entry.distance < k_distance)
        .collect();
    sort_by_distance(&mut ranked);
    ranked
}

pub fn predict(
    observations: &[AttackObservation],
    dx: i32,
    dy: i32,
    facing_front: bool,
    params: &KnnParams,
) -> Prediction {
    let k = params.k_for(observations.len());
    let ranked = rank_neighbours(observations, dx, dy, facing_front, params.k_distance);
    if ranked.len() < k {
        return Prediction::InsufficientEvidence {
            required: k,
            found: ranked.len(),
        };
    }

    Prediction::Predicted(modal_actions(&ranked[..k]))
}

fn modal_actions(neighbours: &[RankedObservation]) -> BTreeSet<Action> {
    let mut votes = [0usize; ACTION_COUNT];
    for neighbour in neighbours {
        votes[neighbour.observation.action.ordinal()] += 1;
    }

    let best = votes.iter().copied().max().unwrap_or(0);
    if best == 0 {
        return BTreeSet::new();
    }
    Action::ALL
        .iter()
        .copied()
        .filter(|action| votes[action.ordinal()] == best)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn obs(offset_x: i32, offset_y: i32, action: Action) -> AttackObservation {
        AttackObservation {
            offset_x,
            offset_y,
            action,
        }
    }

    #[test]
    fn k_grows_with_history_and_caps() {
        let params = KnnParams::default();
        assert_eq!(params.k_for(0), 1);
        assert_eq!(params.k_for(3), 1);
        assert_eq!(params.k_for(4), 2);
        assert_eq!(params.k_for(6), 2);
        assert_eq!(params.k_for(7), 3);
        assert_eq!(params.k_for(500), 3);
    }

    #[test]
    fn empty_history_is_insufficient() {
        let prediction = predict(&[], 40, 0, true, &KnnParams::default());
        assert_eq!(
            prediction,
            Prediction::InsufficientEvidence {
                required: 1,
                found: 0
            }
        );
        assert!(!prediction.is_success());
    }

    #[test]
    fn three_close_matching_observations_predict_singleton() {
        let history = [
            obs(100, 0, Action::StandFb),
            obs(105, 0, Action::StandFb),
            obs(95, 5, Action::StandFb),
        ];
        let prediction = predict(&history, 100, 0, true, &KnnParams::default());
        let actions = prediction.actions().expect("prediction should succeed");
        assert_eq!(actions.len(), 1);
        assert!(actions.contains(&Action::StandFb));
    }

    #[test]
    fn fails_when_filtered_count_below_k() {
        // 7 observations -> k = 3, only two within range
        let mut history = vec![obs(100, 0, Action::StandA), obs(110, 0, Action::StandA)];
        history.extend((0..5).map(|i| obs(400 + i, 0, Action::StandB)));
        let prediction = predict(&history, 100, 0, true, &KnnParams::default());
        assert_eq!(
            prediction,
            Prediction::InsufficientEvidence {
                required: 3,
                found: 2
            }
        );
    }

    #[test]
    fn distance_threshold_is_exclusive() {
        let history = [obs(150, 0, Action::StandA)];
        assert_eq!(mirrored_distance(&history[0], 100, 0, true), 50);
        assert!(!predict(&history, 100, 0, true, &KnnParams::default()).is_success());
        assert!(predict(&history, 101, 0, true, &KnnParams::default()).is_success());
    }

    #[test]
    fn facing_away_mirrors_query() {
        let history = [obs(-100, 10, Action::CrouchB)];
        assert_eq!(mirrored_distance(&history[0], 100, -10, false), 0);
        assert!(predict(&history, 100, -10, false, &KnnParams::default()).is_success());
        assert!(!predict(&history, 100, -10, true, &KnnParams::default()).is_success());
    }

    #[test]
    fn distances_truncate_toward_zero() {
        // sqrt(3^2 + 3^2) = 4.24
        assert_eq!(mirrored_distance(&obs(3, 3, Action::StandA), 0, 0, true), 4);
    }

    #[test]
    fn extreme_offsets_saturate_instead_of_overflowing() {
        let far = obs(i32::MAX, i32::MAX, Action::StandA);
        assert_eq!(mirrored_distance(&far, i32::MIN, i32::MIN, true), i32::MAX);
        assert_eq!(mirrored_distance(&far, i32::MIN, i32::MIN, false), 1);
        assert!(!predict(&[far], i32::MIN, i32::MIN, true, &KnnParams::default()).is_success());
    }

    #[test]
    fn ties_return_every_modal_action_in_ordinal_order() {
        // 7 observations -> k = 3; nearest three are B, A, FA (one vote each)
        let history = [
            obs(100, 0, Action::StandFa),
            obs(101, 0, Action::StandB),
            obs(99, 0, Action::StandA),
            obs(130, 0, Action::ThrowA),
            obs(131, 0, Action::ThrowA),
            obs(132, 0, Action::ThrowA),
            obs(133, 0, Action::ThrowA),
        ];
        let prediction = predict(&history, 100, 0, true, &KnnParams::default());
        let actions: Vec<Action> = prediction.actions().unwrap().iter().copied().collect();
        assert_eq!(actions, vec![Action::StandA, Action::StandB, Action::StandFa]);
    }

    #[test]
    fn majority_wins_over_closer_minority() {
        let history = [
            obs(100, 0, Action::AirA),
            obs(104, 0, Action::StandA),
            obs(96, 0, Action::StandA),
            obs(300, 0, Action::ThrowB),
            obs(300, 0, Action::ThrowB),
            obs(300, 0, Action::ThrowB),
            obs(300, 0, Action::ThrowB),
        ];
        let prediction = predict(&history, 100, 0, true, &KnnParams::default());
        let actions = prediction.actions().unwrap();
        assert_eq!(actions.iter().copied().collect::<Vec<_>>(), vec![Action::StandA]);
    }

    #[test]
    fn sort_is_non_decreasing_and_stable() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x00C0_FFEE);
        for _ in 0..50 {
            let len = rng.gen_range(0..40);
            let mut ranked: Vec<RankedObservation> = (0..len)
                .map(|i| RankedObservation {
                    observation: obs(i, 0, Action::ALL[i as usize % 10]),
                    distance: rng.gen_range(0..6),
                })
                .collect();
            sort_by_distance(&mut ranked);
            for pair in ranked.windows(2) {
                assert!(pair[0].distance <= pair[1].distance);
                if pair[0].distance == pair[1].distance {
                    // offset_x carries the insertion index
                    assert!(pair[0].observation.offset_x < pair[1].observation.offset_x);
                }
            }
        }
    }
}
