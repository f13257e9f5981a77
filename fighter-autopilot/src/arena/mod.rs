//! Headless two-player arena used to drive the agent without the game engine.

pub mod engine;
pub mod keys;
pub mod moves;
pub mod opponent;

use std::collections::VecDeque;

use fighter_core::{Action, ForwardSimulator, FrameSnapshot, GameData};
use serde::Serialize;

use engine::{accepts_command, advance, starting_character, FRAME_MS, STAGE_WIDTH};
use moves::arena_motion_table;

pub use keys::KeyQueueEmitter;
pub use opponent::ScriptedOpponent;

pub const DEFAULT_ROUND_FRAMES: u32 = 3600;
pub const DEFAULT_ROUNDS: u32 = 3;
const START_GAP: i32 = 300;

/// Builds the static data handed to the agent at initialization.
pub fn arena_game_data() -> GameData {
    let motion = arena_motion_table();
    GameData {
        player_one_motion: motion.clone(),
        player_two_motion: motion,
    }
}

/// Lookahead over the arena rules. Intents are started in order whenever the
/// character can act; once a list runs out that character is left alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArenaSimulator;

impl ForwardSimulator for ArenaSimulator {
    fn simulate(
        &self,
        frame: &FrameSnapshot,
        agent_is_p1: bool,
        agent_intents: Option<&[Action]>,
        opp_intents: Option<&[Action]>,
        frames_ahead: u32,
    ) -> FrameSnapshot {
        let (p1_intents, p2_intents) = if agent_is_p1 {
            (agent_intents, opp_intents)
        } else {
            (opp_intents, agent_intents)
        };
        let mut queues: [VecDeque<Action>; 2] = [
            p1_intents.unwrap_or_default().iter().copied().collect(),
            p2_intents.unwrap_or_default().iter().copied().collect(),
        ];

        let mut next = frame.clone();
        for _ in 0..frames_ahead {
            let mut commands = [None; 2];
            for (slot, queue) in queues.iter_mut().enumerate() {
                if accepts_command(&next.players[slot]) {
                    commands[slot] = queue.pop_front();
                }
            }
            advance(&mut next, commands);
        }
        next
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundWinner {
    PlayerOne,
    PlayerTwo,
    Draw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RoundResult {
    pub round: u32,
    pub winner: RoundWinner,
    pub frames: u32,
    pub hp: [i32; 2],
}

/// A best-of-`rounds` match. Rounds are numbered from 1.
#[derive(Clone, Debug)]
pub struct ArenaMatch {
    rounds: u32,
    round_frames: u32,
    frame: FrameSnapshot,
    frame_in_round: u32,
    results: Vec<RoundResult>,
}

impl ArenaMatch {
    pub fn new(rounds: u32, round_frames: u32) -> Self {
        let mut arena = Self {
            rounds: rounds.max(1),
            round_frames: round_frames.max(1),
            frame: FrameSnapshot::default(),
            frame_in_round: 0,
            results: Vec::new(),
        };
        arena.start_round(1);
        arena
    }

    fn start_round(&mut self, round: u32) {
        let left = (STAGE_WIDTH - START_GAP) / 2;
        self.frame = FrameSnapshot {
            players: [starting_character(left), starting_character(left + START_GAP)],
            frame_number: self.frame.frame_number,
            round,
            remaining_time_ms: self.time_left_ms(0),
            empty: false,
        };
        self.frame_in_round = 0;
    }

    fn time_left_ms(&self, frame_in_round: u32) -> i32 {
        let frames = self.round_frames.saturating_sub(frame_in_round);
        i32::try_from(frames)
            .unwrap_or(i32::MAX)
            .saturating_mul(FRAME_MS)
    }

    /// What the players see this frame. The first frame of every round carries
    /// no game data.
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            empty: self.frame_in_round == 0,
            ..self.frame.clone()
        }
    }

    #[inline]
    pub fn round(&self) -> u32 {
        self.frame.round
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.results.len() as u32 >= self.rounds
    }

    pub fn results(&self) -> &[RoundResult] {
        &self.results
    }

    /// Advances one frame. Returns the result when this frame ended a round.
    pub fn step(&mut self, commands: [Option<Action>; 2]) -> Option<RoundResult> {
        if self.is_finished() {
            return None;
        }
        advance(&mut self.frame, commands);
        self.frame_in_round += 1;
        self.frame.remaining_time_ms = self.time_left_ms(self.frame_in_round);

        let [p1, p2] = &self.frame.players;
        let knockout = p1.hp <= 0 || p2.hp <= 0;
        if !knockout && self.frame_in_round < self.round_frames {
            return None;
        }

        let winner = match p1.hp.cmp(&p2.hp) {
            std::cmp::Ordering::Greater => RoundWinner::PlayerOne,
            std::cmp::Ordering::Less => RoundWinner::PlayerTwo,
            std::cmp::Ordering::Equal => RoundWinner::Draw,
        };
        let result = RoundResult {
            round: self.frame.round,
            winner,
            frames: self.frame_in_round,
            hp: [p1.hp, p2.hp],
        };
        tracing::info!(
            round = result.round,
            winner = ?result.winner,
            p1_hp = result.hp[0],
            p2_hp = result.hp[1],
            frames = result.frames,
            "round over"
        );
        self.results.push(result);
        if !self.is_finished() {
            self.start_round(result.round + 1);
        }
        Some(result)
    }
}
