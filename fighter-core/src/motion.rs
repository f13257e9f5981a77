use serde::{Deserialize, Serialize};

use crate::action::{Action, ACTION_COUNT};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionEntry {
    /// Elapsed-frame count at which the attack phase begins.
    pub attack_start_frame: i32,
    /// Energy added when the attack starts; negative for actions that spend energy.
    pub energy_cost: i32,
}

/// Per-action motion metadata for one character.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionTable {
    entries: Vec<MotionEntry>,
}

impl MotionTable {
    pub fn from_fn(mut entry: impl FnMut(Action) -> MotionEntry) -> Self {
        Self {
            entries: Action::ALL.iter().map(|action| entry(*action)).collect(),
        }
    }

    /// Builds a table from `(action, entry)` pairs; actions not listed get a zeroed entry.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Action, MotionEntry)>,
    {
        let mut table = Self::default();
        for (action, entry) in entries {
            table.entries[action.ordinal()] = entry;
        }
        table
    }

    #[inline]
    pub fn entry(&self, action: Action) -> MotionEntry {
        self.entries
            .get(action.ordinal())
            .copied()
            .unwrap_or_default()
    }

    /// True when `elapsed_frames` is exactly the first frame of `action`'s attack phase.
    #[inline]
    pub fn is_attack_start(&self, action: Action, elapsed_frames: i32) -> bool {
        self.entry(action).attack_start_frame == elapsed_frames
    }

    #[inline]
    pub fn is_affordable(&self, action: Action, energy: i32) -> bool {
        self.entry(action).energy_cost.abs() <= energy
    }
}

impl Default for MotionTable {
    fn default() -> Self {
        Self {
            entries: vec![MotionEntry::default(); ACTION_COUNT],
        }
    }
}

/// Static match data handed to the agent at initialization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameData {
    pub player_one_motion: MotionTable,
    pub player_two_motion: MotionTable,
}

impl GameData {
    #[inline]
    pub fn motion(&self, player_one: bool) -> &MotionTable {
        if player_one {
            &self.player_one_motion
        } else {
            &self.player_two_motion
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlisted_actions_have_zeroed_entries() {
        let table = MotionTable::from_entries([(
            Action::StandA,
            MotionEntry {
                attack_start_frame: 3,
                energy_cost: 0,
            },
        )]);
        assert_eq!(table.entry(Action::StandA).attack_start_frame, 3);
        assert_eq!(table.entry(Action::StandB), MotionEntry::default());
        assert!(table.is_attack_start(Action::StandA, 3));
        assert!(!table.is_attack_start(Action::StandA, 4));
    }

    #[test]
    fn affordability_uses_absolute_cost() {
        let table = MotionTable::from_entries([(
            Action::StandDDfFc,
            MotionEntry {
                attack_start_frame: 10,
                energy_cost: -150,
            },
        )]);
        assert!(!table.is_affordable(Action::StandDDfFc, 149));
        assert!(table.is_affordable(Action::StandDDfFc, 150));
        assert!(table.is_affordable(Action::StandA, 0));
    }
}
