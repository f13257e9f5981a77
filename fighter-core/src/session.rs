use crate::history::OpponentHistory;

/// Detects round changes and decides when the opponent model is wiped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundTracker {
    previous: u32,
    period: u32,
}

impl RoundTracker {
    pub fn new(period: u32) -> Self {
        Self {
            previous: 0,
            period: period.max(1),
        }
    }

    #[inline]
    pub fn previous(&self) -> u32 {
        self.previous
    }

    /// Records `round` and returns true when it is a new, positive multiple of the period.
    pub fn observe(&mut self, round: u32) -> bool {
        let reset = round != self.previous && round != 0 && round % self.period == 0;
        self.previous = round;
        reset
    }
}

/// Everything the agent learns over a match.
#[derive(Clone, Debug)]
pub struct Session {
    pub history: OpponentHistory,
    rounds: RoundTracker,
    resets: u32,
}

impl Session {
    pub fn new(reset_round_period: u32) -> Self {
        Self {
            history: OpponentHistory::new(),
            rounds: RoundTracker::new(reset_round_period),
            resets: 0,
        }
    }

    /// Applies the round-based reset rule. Returns true if history was cleared.
    pub fn begin_frame(&mut self, round: u32) -> bool {
        if !self.rounds.observe(round) {
            return false;
        }
        tracing::info!(
            round,
            discarded = self.history.total(),
            "round boundary reached, resetting opponent history"
        );
        self.history.reset_all();
        self.resets += 1;
        true
    }

    #[inline]
    pub fn resets(&self) -> u32 {
        self.resets
    }

    pub fn clear(&mut self) {
        self.history.reset_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::history::AttackObservation;
    use crate::position::PositionClass;

    fn seeded_session() -> Session {
        let mut session = Session::new(3);
        session.history.record(
            PositionClass::GroundGround,
            AttackObservation {
                offset_x: 40,
                offset_y: 0,
                action: Action::StandA,
            },
        );
        session
    }

    #[test]
    fn resets_only_on_new_positive_multiples() {
        let mut tracker = RoundTracker::new(3);
        let rounds = [0, 0, 1, 1, 2, 3, 3, 3, 4, 0, 6, 6, 7, 9];
        let resets: Vec<u32> = rounds
            .iter()
            .copied()
            .filter(|round| tracker.observe(*round))
            .collect();
        assert_eq!(resets, vec![3, 6, 9]);
    }

    #[test]
    fn same_round_reentry_keeps_history() {
        let mut session = seeded_session();
        assert!(!session.begin_frame(1));
        assert!(!session.begin_frame(1));
        assert!(!session.begin_frame(2));
        assert_eq!(session.history.total(), 1);

        assert!(session.begin_frame(3));
        assert!(session.history.is_empty());
        assert_eq!(session.resets(), 1);

        session.history.record(
            PositionClass::AirAir,
            AttackObservation {
                offset_x: 0,
                offset_y: -30,
                action: Action::AirB,
            },
        );
        assert!(!session.begin_frame(3));
        assert_eq!(session.history.total(), 1);
    }

    #[test]
    fn round_zero_never_resets() {
        let mut session = seeded_session();
        assert!(!session.begin_frame(0));
        assert_eq!(session.history.total(), 1);
    }
}
