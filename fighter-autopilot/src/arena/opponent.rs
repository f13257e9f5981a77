use fighter_core::{Action, FrameSnapshot};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::engine::accepts_command;

const CLOSE_RANGE: i32 = 90;
const MID_RANGE: i32 = 180;

/// Seeded sparring partner with a small set of favourite attacks per range, so
/// the agent has habits worth learning.
#[derive(Clone, Debug)]
pub struct ScriptedOpponent {
    rng: ChaCha8Rng,
    aggression: f64,
}

impl ScriptedOpponent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            aggression: 0.35,
        }
    }

    pub fn with_aggression(mut self, aggression: f64) -> Self {
        self.aggression = aggression.clamp(0.0, 1.0);
        self
    }

    /// Picks a command for the `player_one` side, or `None` while it cannot act.
    pub fn next_action(&mut self, frame: &FrameSnapshot, player_one: bool) -> Option<Action> {
        let me = frame.character(player_one);
        let opp = frame.character(!player_one);
        if frame.empty || !accepts_command(me) || me.is_knocked_down() {
            return None;
        }

        if me.is_airborne() {
            let roll = self.rng.gen_range(0..4);
            return Some(match roll {
                0 => Action::AirB,
                1 => Action::AirDb,
                _ => Action::Air,
            });
        }

        if !self.rng.gen_bool(self.aggression) {
            return Some(Action::StandGuard);
        }

        let distance = (opp.x - me.x).abs();
        let action = if distance <= CLOSE_RANGE {
            match self.rng.gen_range(0..10) {
                0..=4 => Action::CrouchB,
                5..=7 => Action::StandA,
                _ => Action::ThrowA,
            }
        } else if distance <= MID_RANGE {
            match self.rng.gen_range(0..10) {
                0..=5 => Action::CrouchFb,
                6..=7 => Action::StandFb,
                8 => Action::ForJump,
                _ => Action::Dash,
            }
        } else if me.energy >= 30 && self.rng.gen_bool(0.5) {
            Action::StandDDfFb
        } else {
            match self.rng.gen_range(0..3) {
                0 => Action::StandDDfFa,
                _ => Action::ForwardWalk,
            }
        };
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaMatch;

    #[test]
    fn same_seed_same_script() {
        let mut arena = ArenaMatch::new(1, 120);
        arena.step([None, None]);
        let frame = arena.snapshot();
        let mut left = ScriptedOpponent::new(9);
        let mut right = ScriptedOpponent::new(9);
        for _ in 0..50 {
            assert_eq!(left.next_action(&frame, false), right.next_action(&frame, false));
        }
    }

    #[test]
    fn stays_quiet_while_busy_or_on_empty_frames() {
        let mut arena = ArenaMatch::new(1, 120);
        let mut opponent = ScriptedOpponent::new(1).with_aggression(1.0);
        assert_eq!(opponent.next_action(&arena.snapshot(), false), None);

        arena.step([None, Some(Action::StandDDfFa)]);
        assert_eq!(opponent.next_action(&arena.snapshot(), false), None);
    }

    #[test]
    fn full_aggression_never_guards() {
        let mut arena = ArenaMatch::new(1, 120);
        arena.step([None, None]);
        let frame = arena.snapshot();
        let mut opponent = ScriptedOpponent::new(4).with_aggression(1.0);
        for _ in 0..200 {
            let action = opponent.next_action(&frame, false);
            assert_ne!(action, Some(Action::StandGuard));
            assert!(action.is_some());
        }
    }
}
