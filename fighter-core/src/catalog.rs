use crate::action::Action;
use crate::motion::MotionTable;

/// Responses evaluated while grounded. Order breaks score ties.
pub const GROUND_CANDIDATES: [Action; 20] = [
    Action::CrouchGuard,
    Action::CrouchFa,
    Action::CrouchFb,
    Action::StandFa,
    Action::CrouchA,
    Action::CrouchB,
    Action::StandA,
    Action::StandB,
    Action::ThrowB,
    Action::ThrowA,
    Action::ForJump,
    Action::Jump,
    Action::BackStep,
    Action::StandDDfFa,
    Action::StandDDfFb,
    Action::StandFDDfa,
    Action::StandFDDfb,
    Action::StandDDbBa,
    Action::StandDDbBb,
    Action::StandDDfFc,
];

/// Responses evaluated while airborne. Order breaks score ties.
pub const AIR_CANDIDATES: [Action; 8] = [
    Action::AirGuard,
    Action::AirA,
    Action::AirDa,
    Action::AirFa,
    Action::AirUa,
    Action::AirDDfFa,
    Action::AirFDDfa,
    Action::AirDDbBa,
];

#[inline]
pub fn candidates_for(airborne: bool) -> &'static [Action] {
    if airborne {
        &AIR_CANDIDATES
    } else {
        &GROUND_CANDIDATES
    }
}

/// Candidates whose energy cost `energy` can cover, in catalog order.
pub fn affordable_candidates(candidates: &[Action], motion: &MotionTable, energy: i32) -> Vec<Action> {
    candidates
        .iter()
        .copied()
        .filter(|action| motion.is_affordable(*action, energy))
        .collect()
}
