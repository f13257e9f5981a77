use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::frame::CharacterSnapshot;
use crate::position::PositionClass;

/// One opponent attack, stored relative to the agent's facing when its attack phase began.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackObservation {
    pub offset_x: i32,
    pub offset_y: i32,
    pub action: Action,
}

impl AttackObservation {
    /// Records `opp`'s current action. The offset points from the agent to the
    /// opponent when the agent faces it, and the other way round when it doesn't.
    pub fn relative(me: &CharacterSnapshot, opp: &CharacterSnapshot) -> Self {
        let (offset_x, offset_y) = if me.front {
            (opp.x - me.x, opp.y - me.y)
        } else {
            (me.x - opp.x, me.y - opp.y)
        };
        Self {
            offset_x,
            offset_y,
            action: opp.action,
        }
    }
}

/// Chronological attack logs, one per position class.
#[derive(Clone, Debug, Default)]
pub struct OpponentHistory {
    buckets: [Vec<AttackObservation>; 4],
}

impl OpponentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record(&mut self, class: PositionClass, observation: AttackObservation) {
        self.buckets[class.index()].push(observation);
    }

    #[inline]
    pub fn query(&self, class: PositionClass) -> &[AttackObservation] {
        &self.buckets[class.index()]
    }

    #[inline]
    pub fn len(&self, class: PositionClass) -> usize {
        self.buckets[class.index()].len()
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    pub fn reset_all(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(offset_x: i32, action: Action) -> AttackObservation {
        AttackObservation {
            offset_x,
            offset_y: 0,
            action,
        }
    }

    #[test]
    fn records_are_bucketed_and_ordered() {
        let mut history = OpponentHistory::new();
        history.record(PositionClass::GroundGround, observation(10, Action::StandA));
        history.record(PositionClass::GroundAir, observation(20, Action::AirA));
        history.record(PositionClass::GroundGround, observation(30, Action::StandB));

        let ground = history.query(PositionClass::GroundGround);
        assert_eq!(ground.len(), 2);
        assert_eq!(ground[0].action, Action::StandA);
        assert_eq!(ground[1].action, Action::StandB);
        assert_eq!(history.len(PositionClass::GroundAir), 1);
        assert!(history.query(PositionClass::AirAir).is_empty());
        assert_eq!(history.total(), 3);
    }

    #[test]
    fn reset_clears_every_bucket() {
        let mut history = OpponentHistory::new();
        for class in PositionClass::ALL {
            history.record(class, observation(1, Action::CrouchB));
        }
        history.reset_all();
        assert!(history.is_empty());
    }

    #[test]
    fn offset_mirrors_with_facing() {
        let me = CharacterSnapshot {
            x: 100,
            y: 300,
            front: true,
            ..CharacterSnapshot::default()
        };
        let opp = CharacterSnapshot {
            x: 160,
            y: 280,
            action: Action::StandFa,
            ..CharacterSnapshot::default()
        };
        let facing = AttackObservation::relative(&me, &opp);
        assert_eq!((facing.offset_x, facing.offset_y), (60, -20));

        let turned = AttackObservation::relative(&CharacterSnapshot { front: false, ..me }, &opp);
        assert_eq!((turned.offset_x, turned.offset_y), (-60, 20));
        assert_eq!(turned.action, Action::StandFa);
    }
}
