//! Round-robin scoring of candidate responses against predicted opponent actions.

use std::collections::BTreeSet;

use crate::action::Action;
use crate::frame::FrameSnapshot;
use crate::simulator::{ForwardSimulator, SimulatorAdapter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvaluationLimits {
    pub horizon_frames: u32,
    pub max_rollouts: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub action: Action,
    /// Best score found; 0 when the default action was kept.
    pub score: i32,
    pub rollouts: usize,
    pub budget_exhausted: bool,
}

/// Agent's hp change minus the opponent's hp change between two frames.
#[inline]
pub fn hp_swing(before: &FrameSnapshot, after: &FrameSnapshot, agent_is_p1: bool) -> i32 {
    let my_delta = after.me(agent_is_p1).hp - before.me(agent_is_p1).hp;
    let opp_delta = after.opponent(agent_is_p1).hp - before.opponent(agent_is_p1).hp;
    my_delta - opp_delta
}

/// Picks the candidate with the strictly highest swing over every
/// (candidate, predicted) pair. The running best starts at zero, so unless some
/// pairing is strictly positive `default_action` is returned.
pub fn evaluate<S: ForwardSimulator + ?Sized>(
    adapter: &mut SimulatorAdapter<'_, S>,
    frame: &FrameSnapshot,
    candidates: &[Action],
    predicted: &BTreeSet<Action>,
    default_action: Action,
    limits: EvaluationLimits,
) -> Evaluation {
    let agent_is_p1 = adapter.agent_is_p1();
    let mut best = Evaluation {
        action: default_action,
        score: 0,
        rollouts: 0,
        budget_exhausted: false,
    };

    'candidates: for &candidate in candidates {
        for &opponent_action in predicted {
            if best.rollouts >= limits.max_rollouts {
                best.budget_exhausted = true;
                break 'candidates;
            }
            let outcome = adapter.rollout(frame, candidate, opponent_action, limits.horizon_frames);
            best.rollouts += 1;

            let score = hp_swing(frame, &outcome, agent_is_p1);
            if score > best.score {
                best.action = candidate;
                best.score = score;
            }
        }
    }

    if best.budget_exhausted {
        tracing::warn!(
            rollouts = best.rollouts,
            candidates = candidates.len(),
            predicted = predicted.len(),
            "rollout budget exhausted before all pairings were scored"
        );
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GROUND_CANDIDATES;
    use crate::frame::CharacterSnapshot;
    use std::cell::Cell;

    const LIMITS: EvaluationLimits = EvaluationLimits {
        horizon_frames: 60,
        max_rollouts: 64,
    };

    fn frame(p1_hp: i32, p2_hp: i32) -> FrameSnapshot {
        FrameSnapshot {
            players: [
                CharacterSnapshot {
                    hp: p1_hp,
                    ..CharacterSnapshot::default()
                },
                CharacterSnapshot {
                    hp: p2_hp,
                    ..CharacterSnapshot::default()
                },
            ],
            remaining_time_ms: 60_000,
            ..FrameSnapshot::default()
        }
    }

    /// Applies `damage(mine, theirs) -> (agent hp delta, opponent hp delta)`.
    fn scripted(
        damage: impl Fn(Action, Action) -> (i32, i32),
    ) -> impl Fn(&FrameSnapshot, bool, Option<&[Action]>, Option<&[Action]>, u32) -> FrameSnapshot {
        move |frame, p1, mine, theirs, _| {
            let mut next = frame.clone();
            let (mine, theirs) = (mine.unwrap()[0], theirs.unwrap()[0]);
            let (my_delta, opp_delta) = damage(mine, theirs);
            next.character_mut(p1).hp += my_delta;
            next.character_mut(!p1).hp += opp_delta;
            next
        }
    }

    fn predicted(actions: &[Action]) -> BTreeSet<Action> {
        actions.iter().copied().collect()
    }

    #[test]
    fn all_negative_outcomes_keep_default_guard() {
        let sim = scripted(|_, _| (-5, 0));
        let mut adapter = SimulatorAdapter::new(&sim, true);
        let result = evaluate(
            &mut adapter,
            &frame(400, 400),
            &GROUND_CANDIDATES,
            &predicted(&[Action::StandA]),
            Action::CrouchGuard,
            LIMITS,
        );
        assert_eq!(result.action, Action::CrouchGuard);
        assert_eq!(result.score, 0);
        assert_eq!(result.rollouts, GROUND_CANDIDATES.len());
    }

    #[test]
    fn zero_score_is_not_an_improvement() {
        let sim = scripted(|_, _| (0, 0));
        let mut adapter = SimulatorAdapter::new(&sim, true);
        let result = evaluate(
            &mut adapter,
            &frame(400, 400),
            &[Action::StandA, Action::StandB],
            &predicted(&[Action::CrouchA]),
            Action::AirGuard,
            LIMITS,
        );
        assert_eq!(result.action, Action::AirGuard);
    }

    #[test]
    fn ties_resolve_to_first_candidate() {
        let sim = scripted(|mine, _| match mine {
            Action::StandB | Action::ThrowA => (0, -20),
            _ => (0, -5),
        });
        let mut adapter = SimulatorAdapter::new(&sim, true);
        let result = evaluate(
            &mut adapter,
            &frame(400, 400),
            &GROUND_CANDIDATES,
            &predicted(&[Action::StandA]),
            Action::CrouchGuard,
            LIMITS,
        );
        // StandB precedes ThrowA in the ground list
        assert_eq!(result.action, Action::StandB);
        assert_eq!(result.score, 20);
    }

    #[test]
    fn score_is_oriented_for_player_two() {
        // Agent is P2: only StandFa damages the opponent (P1)
        let sim = scripted(|mine, _| match mine {
            Action::StandFa => (-10, -30),
            _ => (-10, 0),
        });
        let mut adapter = SimulatorAdapter::new(&sim, false);
        let result = evaluate(
            &mut adapter,
            &frame(250, 400),
            &GROUND_CANDIDATES,
            &predicted(&[Action::StandA]),
            Action::CrouchGuard,
            LIMITS,
        );
        assert_eq!(result.action, Action::StandFa);
        assert_eq!(result.score, 20);
    }

    #[test]
    fn best_pairing_over_predicted_set_counts() {
        let sim = scripted(|mine, theirs| match (mine, theirs) {
            (Action::CrouchB, Action::ThrowA) => (0, -15),
            (Action::StandA, Action::StandB) => (0, -10),
            _ => (-3, 0),
        });
        let mut adapter = SimulatorAdapter::new(&sim, true);
        let result = evaluate(
            &mut adapter,
            &frame(400, 400),
            &[Action::StandA, Action::CrouchB],
            &predicted(&[Action::StandB, Action::ThrowA]),
            Action::CrouchGuard,
            LIMITS,
        );
        assert_eq!(result.action, Action::CrouchB);
        assert_eq!(result.rollouts, 4);
    }

    #[test]
    fn budget_caps_simulator_calls() {
        let calls = Cell::new(0usize);
        let sim = |frame: &FrameSnapshot,
                   _: bool,
                   _: Option<&[Action]>,
                   _: Option<&[Action]>,
                   _: u32|
         -> FrameSnapshot {
            calls.set(calls.get() + 1);
            frame.clone()
        };
        let mut adapter = SimulatorAdapter::new(&sim, true);
        let result = evaluate(
            &mut adapter,
            &frame(400, 400),
            &GROUND_CANDIDATES,
            &predicted(&[Action::StandA, Action::StandB, Action::ThrowA]),
            Action::CrouchGuard,
            EvaluationLimits {
                horizon_frames: 60,
                max_rollouts: 7,
            },
        );
        assert_eq!(calls.get(), 7);
        assert_eq!(result.rollouts, 7);
        assert!(result.budget_exhausted);
    }
}
