use core::fmt;

use serde::{Deserialize, Serialize};

/// Every action a character can be in, in the engine's ordinal order.
///
/// `Ord` follows that order, so sets of actions iterate the way the engine
/// enumerates them.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Neutral,
    Stand,
    ForwardWalk,
    Dash,
    BackStep,
    Crouch,
    Jump,
    ForJump,
    BackJump,
    Air,
    StandGuard,
    CrouchGuard,
    AirGuard,
    StandGuardRecov,
    CrouchGuardRecov,
    AirGuardRecov,
    StandRecov,
    CrouchRecov,
    AirRecov,
    ChangeDown,
    Down,
    Rise,
    Landing,
    ThrowA,
    ThrowB,
    ThrowHit,
    ThrowSuffer,
    StandA,
    StandB,
    CrouchA,
    CrouchB,
    AirA,
    AirB,
    AirDa,
    AirDb,
    StandFa,
    StandFb,
    CrouchFa,
    CrouchFb,
    AirFa,
    AirFb,
    AirUa,
    AirUb,
    StandDDfFa,
    StandDDfFb,
    StandFDDfa,
    StandFDDfb,
    StandDDbBa,
    StandDDbBb,
    AirDDfFa,
    AirDDfFb,
    AirFDDfa,
    AirFDDfb,
    AirDDbBa,
    AirDDbBb,
    StandDDfFc,
}

pub const ACTION_COUNT: usize = 56;

impl Action {
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::Neutral,
        Action::Stand,
        Action::ForwardWalk,
        Action::Dash,
        Action::BackStep,
        Action::Crouch,
        Action::Jump,
        Action::ForJump,
        Action::BackJump,
        Action::Air,
        Action::StandGuard,
        Action::CrouchGuard,
        Action::AirGuard,
        Action::StandGuardRecov,
        Action::CrouchGuardRecov,
        Action::AirGuardRecov,
        Action::StandRecov,
        Action::CrouchRecov,
        Action::AirRecov,
        Action::ChangeDown,
        Action::Down,
        Action::Rise,
        Action::Landing,
        Action::ThrowA,
        Action::ThrowB,
        Action::ThrowHit,
        Action::ThrowSuffer,
        Action::StandA,
        Action::StandB,
        Action::CrouchA,
        Action::CrouchB,
        Action::AirA,
        Action::AirB,
        Action::AirDa,
        Action::AirDb,
        Action::StandFa,
        Action::StandFb,
        Action::CrouchFa,
        Action::CrouchFb,
        Action::AirFa,
        Action::AirFb,
        Action::AirUa,
        Action::AirUb,
        Action::StandDDfFa,
        Action::StandDDfFb,
        Action::StandFDDfa,
        Action::StandFDDfb,
        Action::StandDDbBa,
        Action::StandDDbBb,
        Action::AirDDfFa,
        Action::AirDDfFb,
        Action::AirFDDfa,
        Action::AirFDDfb,
        Action::AirDDbBa,
        Action::AirDDbBb,
        Action::StandDDfFc,
    ];

    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Membership in the closed set of attack-class actions: throws, normals,
    /// air normals, directional specials and the super.
    #[inline]
    pub fn is_attack(self) -> bool {
        matches!(
            self,
            Action::ThrowA
                | Action::ThrowB
                | Action::StandA
                | Action::StandB
                | Action::CrouchA
                | Action::CrouchB
                | Action::AirA
                | Action::AirB
                | Action::AirDa
                | Action::AirDb
                | Action::StandFa
                | Action::StandFb
                | Action::CrouchFa
                | Action::CrouchFb
                | Action::AirFa
                | Action::AirFb
                | Action::AirUa
                | Action::AirUb
                | Action::StandDDfFa
                | Action::StandDDfFb
                | Action::StandFDDfa
                | Action::StandFDDfb
                | Action::StandDDbBa
                | Action::StandDDbBb
                | Action::AirDDfFa
                | Action::AirDDfFb
                | Action::AirFDDfa
                | Action::AirFDDfb
                | Action::AirDDbBa
                | Action::AirDDbBb
                | Action::StandDDfFc
        )
    }

    #[inline]
    pub fn is_air_action(self) -> bool {
        matches!(
            self,
            Action::Air
                | Action::AirGuard
                | Action::AirGuardRecov
                | Action::AirRecov
                | Action::AirA
                | Action::AirB
                | Action::AirDa
                | Action::AirDb
                | Action::AirFa
                | Action::AirFb
                | Action::AirUa
                | Action::AirUb
                | Action::AirDDfFa
                | Action::AirDDfFb
                | Action::AirFDDfa
                | Action::AirFDDfb
                | Action::AirDDbBa
                | Action::AirDDbBb
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Neutral => "NEUTRAL",
            Self::Stand => "STAND",
            Self::ForwardWalk => "FORWARD_WALK",
            Self::Dash => "DASH",
            Self::BackStep => "BACK_STEP",
            Self::Crouch => "CROUCH",
            Self::Jump => "JUMP",
            Self::ForJump => "FOR_JUMP",
            Self::BackJump => "BACK_JUMP",
            Self::Air => "AIR",
            Self::StandGuard => "STAND_GUARD",
            Self::CrouchGuard => "CROUCH_GUARD",
            Self::AirGuard => "AIR_GUARD",
            Self::StandGuardRecov => "STAND_GUARD_RECOV",
            Self::CrouchGuardRecov => "CROUCH_GUARD_RECOV",
            Self::AirGuardRecov => "AIR_GUARD_RECOV",
            Self::StandRecov => "STAND_RECOV",
            Self::CrouchRecov => "CROUCH_RECOV",
            Self::AirRecov => "AIR_RECOV",
            Self::ChangeDown => "CHANGE_DOWN",
            Self::Down => "DOWN",
            Self::Rise => "RISE",
            Self::Landing => "LANDING",
            Self::ThrowA => "THROW_A",
            Self::ThrowB => "THROW_B",
            Self::ThrowHit => "THROW_HIT",
            Self::ThrowSuffer => "THROW_SUFFER",
            Self::StandA => "STAND_A",
            Self::StandB => "STAND_B",
            Self::CrouchA => "CROUCH_A",
            Self::CrouchB => "CROUCH_B",
            Self::AirA => "AIR_A",
            Self::AirB => "AIR_B",
            Self::AirDa => "AIR_DA",
            Self::AirDb => "AIR_DB",
            Self::StandFa => "STAND_FA",
            Self::StandFb => "STAND_FB",
            Self::CrouchFa => "CROUCH_FA",
            Self::CrouchFb => "CROUCH_FB",
            Self::AirFa => "AIR_FA",
            Self::AirFb => "AIR_FB",
            Self::AirUa => "AIR_UA",
            Self::AirUb => "AIR_UB",
            Self::StandDDfFa => "STAND_D_DF_FA",
            Self::StandDDfFb => "STAND_D_DF_FB",
            Self::StandFDDfa => "STAND_F_D_DFA",
            Self::StandFDDfb => "STAND_F_D_DFB",
            Self::StandDDbBa => "STAND_D_DB_BA",
            Self::StandDDbBb => "STAND_D_DB_BB",
            Self::AirDDfFa => "AIR_D_DF_FA",
            Self::AirDDfFb => "AIR_D_DF_FB",
            Self::AirFDDfa => "AIR_F_D_DFA",
            Self::AirFDDfb => "AIR_F_D_DFB",
            Self::AirDDbBa => "AIR_D_DB_BA",
            Self::AirDDbBb => "AIR_D_DB_BB",
            Self::StandDDfFc => "STAND_D_DF_FC",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
