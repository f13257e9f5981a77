use crate::action::Action;
use crate::frame::FrameSnapshot;

/// Deterministic forward model supplied by the host.
///
/// `None` intents let that character keep doing whatever it is doing.
pub trait ForwardSimulator {
    fn simulate(
        &self,
        frame: &FrameSnapshot,
        agent_is_p1: bool,
        agent_intents: Option<&[Action]>,
        opp_intents: Option<&[Action]>,
        frames_ahead: u32,
    ) -> FrameSnapshot;
}

impl<F> ForwardSimulator for F
where
    F: Fn(&FrameSnapshot, bool, Option<&[Action]>, Option<&[Action]>, u32) -> FrameSnapshot,
{
    fn simulate(
        &self,
        frame: &FrameSnapshot,
        agent_is_p1: bool,
        agent_intents: Option<&[Action]>,
        opp_intents: Option<&[Action]>,
        frames_ahead: u32,
    ) -> FrameSnapshot {
        self(frame, agent_is_p1, agent_intents, opp_intents, frames_ahead)
    }
}

/// Consumer-side view of the simulator for one decision cycle. Counts calls so
/// the evaluator can stay inside its per-frame budget.
pub struct SimulatorAdapter<'a, S: ForwardSimulator + ?Sized> {
    simulator: &'a S,
    agent_is_p1: bool,
    calls: usize,
}

impl<'a, S: ForwardSimulator + ?Sized> SimulatorAdapter<'a, S> {
    pub fn new(simulator: &'a S, agent_is_p1: bool) -> Self {
        Self {
            simulator,
            agent_is_p1,
            calls: 0,
        }
    }

    #[inline]
    pub fn agent_is_p1(&self) -> bool {
        self.agent_is_p1
    }

    #[inline]
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Free-running prediction of where the game will be once the agent's input lands.
    pub fn delay_compensate(&mut self, frame: &FrameSnapshot, delay_frames: u32) -> FrameSnapshot {
        if delay_frames == 0 {
            return frame.clone();
        }
        self.calls += 1;
        self.simulator
            .simulate(frame, self.agent_is_p1, None, None, delay_frames)
    }

    /// Plays `mine` against `theirs` for `horizon` frames.
    pub fn rollout(
        &mut self,
        frame: &FrameSnapshot,
        mine: Action,
        theirs: Action,
        horizon: u32,
    ) -> FrameSnapshot {
        self.calls += 1;
        self.simulator.simulate(
            frame,
            self.agent_is_p1,
            Some(&[mine]),
            Some(&[theirs]),
            horizon,
        )
    }
}
