use core::fmt;

use serde::{Deserialize, Serialize};

/// Air/ground state of the agent (first) and of the opponent (second).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionClass {
    GroundGround,
    GroundAir,
    AirGround,
    AirAir,
}

impl PositionClass {
    pub const ALL: [PositionClass; 4] = [
        PositionClass::GroundGround,
        PositionClass::GroundAir,
        PositionClass::AirGround,
        PositionClass::AirAir,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn opponent_airborne(self) -> bool {
        matches!(self, PositionClass::GroundAir | PositionClass::AirAir)
    }
}

#[inline]
pub fn classify(my_airborne: bool, opp_airborne: bool) -> PositionClass {
    match (my_airborne, opp_airborne) {
        (false, false) => PositionClass::GroundGround,
        (false, true) => PositionClass::GroundAir,
        (true, false) => PositionClass::AirGround,
        (true, true) => PositionClass::AirAir,
    }
}

impl fmt::Display for PositionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GroundGround => write!(f, "ground/ground"),
            Self::GroundAir => write!(f, "ground/air"),
            Self::AirGround => write!(f, "air/ground"),
            Self::AirAir => write!(f, "air/air"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_covers_all_four_cases() {
        assert_eq!(classify(false, false), PositionClass::GroundGround);
        assert_eq!(classify(false, true), PositionClass::GroundAir);
        assert_eq!(classify(true, false), PositionClass::AirGround);
        assert_eq!(classify(true, true), PositionClass::AirAir);
    }

    #[test]
    fn index_is_dense() {
        for (i, class) in PositionClass::ALL.iter().enumerate() {
            assert_eq!(class.index(), i);
        }
    }
}
