//! Per-frame driver tying the opponent model, the lookahead evaluator and the
//! fallback policy together.
//!
//! The host calls `update_frame`, `decide` and `next_input` once per frame, in
//! that order. Every call runs to completion before returning; a cycle that was
//! interrupted (a collaborator panicked) leaves the agent refusing further work.

use rand::Rng;
use serde::Serialize;

use crate::action::Action;
use crate::catalog::{affordable_candidates, candidates_for};
use crate::config::AgentConfig;
use crate::constants::DEFAULT_GUARD_ACTION;
use crate::emitter::{InputEmitter, InputKey};
use crate::error::AgentError;
use crate::evaluator::{evaluate, EvaluationLimits};
use crate::fallback::FallbackPolicy;
use crate::frame::FrameSnapshot;
use crate::history::{AttackObservation, OpponentHistory};
use crate::motion::GameData;
use crate::position::{classify, PositionClass};
use crate::predictor::{predict, KnnParams, Prediction};
use crate::session::Session;
use crate::simulator::{ForwardSimulator, SimulatorAdapter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Idle,
    Observing,
    Deciding,
    Emitting,
    Closed,
}

impl Phase {
    fn name(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Idle => "idle",
            Self::Observing => "observing",
            Self::Deciding => "deciding",
            Self::Emitting => "emitting",
            Self::Closed => "closed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionPath {
    /// Empty frame or no time left.
    Idle,
    /// The agent cannot accept a command yet.
    Busy,
    /// A multi-frame command is still being typed out.
    SkillInProgress,
    Predictive,
    Fallback,
    /// The gate picked prediction but the history could not support it.
    InsufficientEvidence,
}

impl DecisionPath {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Busy => "busy",
            Self::SkillInProgress => "skill_in_progress",
            Self::Predictive => "predictive",
            Self::Fallback => "fallback",
            Self::InsufficientEvidence => "insufficient_evidence",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DecisionRecord {
    pub frame_number: u32,
    pub path: DecisionPath,
    pub action: Option<Action>,
    pub position: Option<PositionClass>,
    pub predicted: Vec<Action>,
    pub score: i32,
    pub rollouts: usize,
    pub recorded_attack: bool,
}

impl DecisionRecord {
    fn new(frame_number: u32, path: DecisionPath) -> Self {
        Self {
            frame_number,
            path,
            action: None,
            position: None,
            predicted: Vec::new(),
            score: 0,
            rollouts: 0,
            recorded_attack: false,
        }
    }
}

/// Scratch state for one decision cycle.
struct DecisionContext {
    frame: FrameSnapshot,
    delayed: FrameSnapshot,
    position: PositionClass,
}

pub struct Agent<S, E, R> {
    config: AgentConfig,
    knn: KnnParams,
    fallback: FallbackPolicy,
    simulator: S,
    emitter: E,
    rng: R,
    game_data: GameData,
    agent_is_p1: bool,
    session: Session,
    frame: Option<FrameSnapshot>,
    input: InputKey,
    phase: Phase,
    last_decision: Option<DecisionRecord>,
}

impl<S, E, R> Agent<S, E, R>
where
    S: ForwardSimulator,
    E: InputEmitter,
    R: Rng,
{
    pub fn new(config: AgentConfig, simulator: S, emitter: E, rng: R) -> Self {
        Self {
            knn: KnnParams::from_config(&config),
            fallback: FallbackPolicy::from_config(&config),
            session: Session::new(config.reset_round_period),
            config,
            simulator,
            emitter,
            rng,
            game_data: GameData::default(),
            agent_is_p1: true,
            frame: None,
            input: InputKey::neutral(),
            phase: Phase::Uninitialized,
            last_decision: None,
        }
    }

    pub fn initialize(&mut self, game_data: GameData, player_one: bool) -> Result<(), AgentError> {
        if self.phase == Phase::Closed {
            return Err(AgentError::Closed);
        }
        self.config.validate()?;

        self.game_data = game_data;
        self.agent_is_p1 = player_one;
        self.session = Session::new(self.config.reset_round_period);
        self.frame = None;
        self.input = InputKey::neutral();
        self.last_decision = None;
        self.phase = Phase::Idle;
        tracing::info!(player_one, "agent initialized");
        Ok(())
    }

    pub fn update_frame(&mut self, frame: FrameSnapshot) -> Result<(), AgentError> {
        self.ensure_idle()?;
        self.session.begin_frame(frame.round);
        self.emitter.set_frame(&frame, self.agent_is_p1);
        self.frame = Some(frame);
        Ok(())
    }

    /// Runs one full observe/decide/emit cycle on the last frame passed to `update_frame`.
    pub fn decide(&mut self) -> Result<(), AgentError> {
        self.ensure_idle()?;
        self.input = InputKey::neutral();

        let frame = match self.frame.as_ref() {
            Some(frame) if frame.is_playable() => frame.clone(),
            other => {
                let frame_number = other.map_or(0, |frame| frame.frame_number);
                self.last_decision = Some(DecisionRecord::new(frame_number, DecisionPath::Idle));
                return Ok(());
            }
        };

        self.phase = Phase::Observing;
        let position = classify(
            frame.me(self.agent_is_p1).is_airborne(),
            frame.opponent(self.agent_is_p1).is_airborne(),
        );
        let recorded_attack = self.observe(&frame, position);

        self.phase = Phase::Deciding;
        let delayed = SimulatorAdapter::new(&self.simulator, self.agent_is_p1)
            .delay_compensate(&frame, self.config.delay_frames);
        let context = DecisionContext {
            frame,
            delayed,
            position,
        };
        let mut record = self.deliberate(&context);
        record.recorded_attack = recorded_attack;

        self.phase = Phase::Emitting;
        match (record.path, record.action) {
            (DecisionPath::SkillInProgress, _) => self.input = self.emitter.take_input(),
            (_, Some(action)) => {
                self.emitter.command_call(action);
                self.input = self.emitter.take_input();
            }
            _ => {}
        }

        tracing::debug!(
            frame = record.frame_number,
            path = record.path.as_str(),
            action = ?record.action,
            predicted = ?record.predicted,
            score = record.score,
            rollouts = record.rollouts,
            "decision"
        );
        self.last_decision = Some(record);
        self.phase = Phase::Idle;
        Ok(())
    }

    /// The input chosen by the last `decide`; neutral until then.
    #[inline]
    pub fn next_input(&self) -> InputKey {
        self.input
    }

    pub fn shutdown(&mut self) {
        self.session.clear();
        self.emitter.cancel();
        self.frame = None;
        self.input = InputKey::neutral();
        self.phase = Phase::Closed;
        tracing::info!("agent closed");
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_player_one(&self) -> bool {
        self.agent_is_p1
    }

    #[inline]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    #[inline]
    pub fn history(&self) -> &OpponentHistory {
        &self.session.history
    }

    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[inline]
    pub fn last_decision(&self) -> Option<&DecisionRecord> {
        self.last_decision.as_ref()
    }

    #[inline]
    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    #[inline]
    pub fn emitter_mut(&mut self) -> &mut E {
        &mut self.emitter
    }

    fn ensure_idle(&self) -> Result<(), AgentError> {
        match self.phase {
            Phase::Idle => Ok(()),
            Phase::Uninitialized => Err(AgentError::NotInitialized),
            Phase::Closed => Err(AgentError::Closed),
            phase => Err(AgentError::ReentrantCall { phase: phase.name() }),
        }
    }

    /// Logs the opponent's attack on the first frame of its attack phase.
    fn observe(&mut self, frame: &FrameSnapshot, position: PositionClass) -> bool {
        let me = frame.me(self.agent_is_p1);
        let opp = frame.opponent(self.agent_is_p1);
        let motion = self.game_data.motion(!self.agent_is_p1);
        if !opp.action.is_attack()
            || !motion.is_attack_start(opp.action, opp.action_elapsed_frames)
        {
            return false;
        }
        self.session
            .history
            .record(position, AttackObservation::relative(me, opp));
        true
    }

    fn deliberate(&mut self, context: &DecisionContext) -> DecisionRecord {
        let frame_number = context.frame.frame_number;
        if self.emitter.has_pending_skill() {
            return DecisionRecord::new(frame_number, DecisionPath::SkillInProgress);
        }

        let me = context.delayed.me(self.agent_is_p1);
        let controllable = context.frame.me(self.agent_is_p1).control || me.remaining_frames <= 0;
        if !controllable {
            return DecisionRecord::new(frame_number, DecisionPath::Busy);
        }

        let opp = context.delayed.opponent(self.agent_is_p1);
        let position = classify(me.is_airborne(), opp.is_airborne());
        let gate_bucket = if position.opponent_airborne() {
            PositionClass::GroundAir
        } else {
            PositionClass::GroundGround
        };
        let try_prediction = !self.config.use_fallback_gate
            || self
                .fallback
                .prefers_prediction(self.session.history.len(gate_bucket), &mut self.rng);

        let mut record = DecisionRecord::new(frame_number, DecisionPath::Fallback);
        record.position = Some(position);
        if !try_prediction {
            record.action = Some(self.fallback.choose(me, opp, &mut self.rng));
            return record;
        }

        let prediction = predict(
            self.session.history.query(position),
            opp.x - me.x,
            opp.y - me.y,
            me.front,
            &self.knn,
        );
        let predicted = match prediction {
            Prediction::Predicted(actions) => actions,
            Prediction::InsufficientEvidence { required, found } => {
                tracing::trace!(%position, required, found, "not enough history to predict");
                record.path = DecisionPath::InsufficientEvidence;
                record.action = Some(self.fallback.choose(me, opp, &mut self.rng));
                return record;
            }
        };

        let candidates = candidates_for(me.is_airborne());
        let candidates = if self.config.filter_unaffordable_candidates {
            affordable_candidates(
                candidates,
                self.game_data.motion(self.agent_is_p1),
                me.energy,
            )
        } else {
            candidates.to_vec()
        };

        let mut adapter = SimulatorAdapter::new(&self.simulator, self.agent_is_p1);
        let evaluation = evaluate(
            &mut adapter,
            &context.delayed,
            &candidates,
            &predicted,
            DEFAULT_GUARD_ACTION,
            EvaluationLimits {
                horizon_frames: self.config.evaluation_frames,
                max_rollouts: self.config.max_rollouts_per_frame,
            },
        );

        record.path = DecisionPath::Predictive;
        record.action = Some(evaluation.action);
        record.predicted = predicted.into_iter().collect();
        record.score = evaluation.score;
        record.rollouts = evaluation.rollouts;
        record
    }
}
