use crate::arena::engine::START_HP;
use crate::arena::{
    arena_game_data, ArenaMatch, ArenaSimulator, KeyQueueEmitter, RoundResult, RoundWinner,
    ScriptedOpponent, DEFAULT_ROUNDS, DEFAULT_ROUND_FRAMES,
};
use crate::util::{seed_to_hex, write_json};
use anyhow::{anyhow, Context, Result};
use fighter_core::{Agent, AgentConfig, DecisionPath, DecisionRecord, FrameSnapshot};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::VecDeque;
use std::path::Path;

const OPPONENT_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Clone, Debug, Serialize)]
pub struct MatchSettings {
    pub seed: u64,
    pub rounds: u32,
    pub round_frames: u32,
    pub agent_is_p1: bool,
    pub opponent_aggression: f64,
    /// Keep every non-idle decision in the artifact.
    pub keep_trace: bool,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            rounds: DEFAULT_ROUNDS,
            round_frames: DEFAULT_ROUND_FRAMES,
            agent_is_p1: true,
            opponent_aggression: 0.35,
            keep_trace: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DecisionCounts {
    pub idle: u32,
    pub busy: u32,
    pub skill_in_progress: u32,
    pub predictive: u32,
    pub fallback: u32,
    pub insufficient_evidence: u32,
}

impl DecisionCounts {
    pub fn record(&mut self, path: DecisionPath) {
        let slot = match path {
            DecisionPath::Idle => &mut self.idle,
            DecisionPath::Busy => &mut self.busy,
            DecisionPath::SkillInProgress => &mut self.skill_in_progress,
            DecisionPath::Predictive => &mut self.predictive,
            DecisionPath::Fallback => &mut self.fallback,
            DecisionPath::InsufficientEvidence => &mut self.insufficient_evidence,
        };
        *slot += 1;
    }

    /// Frames on which a new command was chosen.
    pub fn commands(&self) -> u32 {
        self.predictive + self.fallback + self.insufficient_evidence
    }

    pub fn total(&self) -> u32 {
        self.idle + self.busy + self.skill_in_progress + self.commands()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct MatchMetrics {
    pub seed: u64,
    pub seed_hex: String,
    pub agent_is_p1: bool,
    pub frame_count: u32,
    pub rounds_won: u32,
    pub rounds_lost: u32,
    pub rounds_drawn: u32,
    pub damage_dealt: i32,
    pub damage_taken: i32,
    pub decisions: DecisionCounts,
    pub rollouts: u64,
    pub observations: u32,
    pub history_resets: u32,
    pub commands_issued: u32,
    pub input_frames: u32,
    pub rounds: Vec<RoundResult>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MatchArtifact {
    pub settings: MatchSettings,
    pub config: AgentConfig,
    pub metrics: MatchMetrics,
    pub trace: Vec<DecisionRecord>,
}

/// Plays one match of the agent against the scripted opponent.
///
/// The agent sees every frame `config.delay_frames` late, the way the game
/// engine delivers them; the scripted opponent reacts to the live frame.
pub fn run_match(settings: &MatchSettings, config: &AgentConfig) -> Result<MatchArtifact> {
    if settings.rounds == 0 {
        return Err(anyhow!("rounds must be > 0"));
    }
    if settings.round_frames == 0 {
        return Err(anyhow!("round_frames must be > 0"));
    }

    let mut agent = Agent::new(
        config.clone(),
        ArenaSimulator,
        KeyQueueEmitter::new(),
        ChaCha8Rng::seed_from_u64(settings.seed),
    );
    agent
        .initialize(arena_game_data(), settings.agent_is_p1)
        .context("agent failed to initialize")?;

    let mut opponent = ScriptedOpponent::new(settings.seed ^ OPPONENT_SEED_SALT)
        .with_aggression(settings.opponent_aggression);
    let mut arena = ArenaMatch::new(settings.rounds, settings.round_frames);
    let delay = config.delay_frames as usize;
    let mut in_flight: VecDeque<FrameSnapshot> = VecDeque::with_capacity(delay + 1);

    let mut decisions = DecisionCounts::default();
    let mut trace = Vec::new();
    let mut rollouts = 0u64;
    let mut observations = 0u32;
    let mut input_frames = 0u32;
    let mut frame_count = 0u32;

    tracing::info!(
        seed = %seed_to_hex(settings.seed),
        rounds = settings.rounds,
        agent_is_p1 = settings.agent_is_p1,
        "match start"
    );

    while !arena.is_finished() {
        let live = arena.snapshot();
        in_flight.push_back(live.clone());
        let seen = if in_flight.len() > delay {
            in_flight.pop_front()
        } else {
            None
        }
        .unwrap_or_else(|| FrameSnapshot {
            empty: true,
            ..live.clone()
        });

        agent
            .update_frame(seen)
            .with_context(|| format!("update_frame failed at frame {frame_count}"))?;
        agent
            .decide()
            .with_context(|| format!("decide failed at frame {frame_count}"))?;
        if !agent.next_input().is_neutral() {
            input_frames += 1;
        }
        if let Some(record) = agent.last_decision() {
            decisions.record(record.path);
            rollouts += record.rollouts as u64;
            observations += u32::from(record.recorded_attack);
            if settings.keep_trace && record.path != DecisionPath::Idle {
                trace.push(record.clone());
            }
        }

        let mine = agent.emitter_mut().take_committed();
        let theirs = opponent.next_action(&live, !settings.agent_is_p1);
        let commands = if settings.agent_is_p1 {
            [mine, theirs]
        } else {
            [theirs, mine]
        };
        arena.step(commands);
        frame_count += 1;
    }

    let history_resets = agent.session().resets();
    let commands_issued = agent.emitter().commands_issued();
    agent.shutdown();

    let me = if settings.agent_is_p1 { 0 } else { 1 };
    let mine_won = if settings.agent_is_p1 {
        RoundWinner::PlayerOne
    } else {
        RoundWinner::PlayerTwo
    };
    let rounds = arena.results().to_vec();
    let rounds_won = rounds.iter().filter(|r| r.winner == mine_won).count() as u32;
    let rounds_drawn = rounds
        .iter()
        .filter(|r| r.winner == RoundWinner::Draw)
        .count() as u32;
    let rounds_lost = rounds.len() as u32 - rounds_won - rounds_drawn;
    let damage_dealt: i32 = rounds.iter().map(|r| START_HP - r.hp[1 - me]).sum();
    let damage_taken: i32 = rounds.iter().map(|r| START_HP - r.hp[me]).sum();

    tracing::info!(
        seed = %seed_to_hex(settings.seed),
        rounds_won,
        rounds_lost,
        rounds_drawn,
        predictive = decisions.predictive,
        fallback = decisions.fallback,
        rollouts,
        "match over"
    );

    Ok(MatchArtifact {
        settings: settings.clone(),
        config: config.clone(),
        metrics: MatchMetrics {
            seed: settings.seed,
            seed_hex: seed_to_hex(settings.seed),
            agent_is_p1: settings.agent_is_p1,
            frame_count,
            rounds_won,
            rounds_lost,
            rounds_drawn,
            damage_dealt,
            damage_taken,
            decisions,
            rollouts,
            observations,
            history_resets,
            commands_issued,
            input_frames,
            rounds,
        },
        trace,
    })
}

pub fn write_artifact(path: &Path, artifact: &MatchArtifact) -> Result<()> {
    write_json(path, artifact)
        .with_context(|| format!("failed writing match artifact {}", path.display()))
}
