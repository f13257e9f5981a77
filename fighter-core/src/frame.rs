use serde::{Deserialize, Serialize};

use crate::action::Action;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CharacterState {
    #[default]
    Stand,
    Crouch,
    Air,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub x: i32,
    pub y: i32,
    /// Per-frame velocity; positive x is toward the right wall, positive y is downward.
    #[serde(default)]
    pub speed_x: i32,
    #[serde(default)]
    pub speed_y: i32,
    pub hp: i32,
    pub energy: i32,
    pub state: CharacterState,
    pub action: Action,
    /// Frames already spent in `action`, counting its first frame as 1.
    pub action_elapsed_frames: i32,
    pub remaining_frames: i32,
    /// Facing the opponent.
    pub front: bool,
    /// Accepts a new command this frame.
    pub control: bool,
}

impl CharacterSnapshot {
    #[inline]
    pub fn is_airborne(&self) -> bool {
        self.state == CharacterState::Air
    }

    #[inline]
    pub fn is_knocked_down(&self) -> bool {
        self.state == CharacterState::Down
    }
}

impl Default for CharacterSnapshot {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            speed_x: 0,
            speed_y: 0,
            hp: 0,
            energy: 0,
            state: CharacterState::Stand,
            action: Action::Neutral,
            action_elapsed_frames: 0,
            remaining_frames: 0,
            front: true,
            control: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Index 0 is player one.
    pub players: [CharacterSnapshot; 2],
    pub frame_number: u32,
    pub round: u32,
    pub remaining_time_ms: i32,
    /// Set by the host when no game data was available for this frame.
    pub empty: bool,
}

impl FrameSnapshot {
    #[inline]
    pub fn character(&self, player_one: bool) -> &CharacterSnapshot {
        if player_one {
            &self.players[0]
        } else {
            &self.players[1]
        }
    }

    #[inline]
    pub fn character_mut(&mut self, player_one: bool) -> &mut CharacterSnapshot {
        if player_one {
            &mut self.players[0]
        } else {
            &mut self.players[1]
        }
    }

    /// The agent occupying `agent_is_p1`'s slot.
    #[inline]
    pub fn me(&self, agent_is_p1: bool) -> &CharacterSnapshot {
        self.character(agent_is_p1)
    }

    #[inline]
    pub fn opponent(&self, agent_is_p1: bool) -> &CharacterSnapshot {
        self.character(!agent_is_p1)
    }

    /// Whether a decision may be attempted at all.
    #[inline]
    pub fn is_playable(&self) -> bool {
        !self.empty && self.remaining_time_ms > 0
    }
}
