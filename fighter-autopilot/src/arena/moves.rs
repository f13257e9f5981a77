use fighter_core::{Action, MotionEntry, MotionTable};

/// Which guard stops an attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Height {
    /// Blocked by standing or crouching guard.
    Mid,
    /// Blocked by crouching guard only.
    Low,
    /// Blocked by standing or air guard.
    Overhead,
    /// Beats any guard, grounded targets only.
    Throw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Guard {
    Stand,
    Crouch,
    Air,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strike {
    pub damage: i32,
    pub reach: i32,
    pub height: Height,
    /// Connects against airborne targets.
    pub anti_air: bool,
    pub knockdown: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveSpec {
    pub duration: i32,
    pub attack_start: i32,
    /// Negative when the move spends energy.
    pub energy: i32,
    /// Forward speed while the move runs.
    pub step_x: i32,
    /// Initial upward speed for jumps.
    pub jump: Option<(i32, i32)>,
    pub guard: Option<Guard>,
    pub strike: Option<Strike>,
}

const IDLE: MoveSpec = MoveSpec {
    duration: 1,
    attack_start: 0,
    energy: 0,
    step_x: 0,
    jump: None,
    guard: None,
    strike: None,
};

const fn movement(duration: i32, step_x: i32) -> MoveSpec {
    MoveSpec {
        duration,
        step_x,
        ..IDLE
    }
}

const fn jump(forward: i32) -> MoveSpec {
    MoveSpec {
        duration: 1,
        jump: Some((forward, 20)),
        ..IDLE
    }
}

const fn guard(kind: Guard) -> MoveSpec {
    MoveSpec {
        guard: Some(kind),
        ..IDLE
    }
}

const fn strike(
    duration: i32,
    attack_start: i32,
    damage: i32,
    reach: i32,
    height: Height,
    energy: i32,
) -> MoveSpec {
    MoveSpec {
        duration,
        attack_start,
        energy,
        strike: Some(Strike {
            damage,
            reach,
            height,
            anti_air: false,
            knockdown: false,
        }),
        ..IDLE
    }
}

const fn anti_air(spec: MoveSpec) -> MoveSpec {
    match spec.strike {
        Some(s) => MoveSpec {
            strike: Some(Strike { anti_air: true, ..s }),
            ..spec
        },
        None => spec,
    }
}

const fn knockdown(spec: MoveSpec) -> MoveSpec {
    match spec.strike {
        Some(s) => MoveSpec {
            strike: Some(Strike { knockdown: true, ..s }),
            ..spec
        },
        None => spec,
    }
}

/// Frame data for the arena's single character.
pub fn move_spec(action: Action) -> MoveSpec {
    use Height::{Low, Mid, Overhead, Throw};

    match action {
        Action::ForwardWalk => movement(1, 5),
        Action::Dash => movement(10, 9),
        Action::BackStep => movement(12, -10),
        Action::Jump => jump(0),
        Action::ForJump => jump(6),
        Action::BackJump => jump(-6),
        Action::StandGuard => guard(Guard::Stand),
        Action::CrouchGuard => guard(Guard::Crouch),
        Action::AirGuard => guard(Guard::Air),

        Action::ThrowA => strike(30, 5, 10, 55, Throw, 0),
        Action::ThrowB => knockdown(strike(40, 6, 20, 55, Throw, -10)),
        Action::StandA => strike(14, 4, 5, 70, Mid, 0),
        Action::StandB => strike(20, 6, 10, 85, Mid, 0),
        Action::CrouchA => strike(12, 4, 5, 65, Low, 0),
        Action::CrouchB => strike(22, 7, 12, 95, Low, 0),
        Action::StandFa => strike(24, 8, 15, 90, Mid, 0),
        Action::StandFb => knockdown(strike(30, 10, 20, 110, Mid, 0)),
        Action::CrouchFa => anti_air(strike(26, 8, 12, 80, Mid, 0)),
        Action::CrouchFb => knockdown(strike(32, 10, 18, 125, Low, 0)),

        Action::AirA => anti_air(strike(14, 4, 6, 65, Overhead, 0)),
        Action::AirB => anti_air(strike(20, 6, 10, 75, Overhead, 0)),
        Action::AirDa => strike(16, 5, 8, 60, Overhead, 0),
        Action::AirDb => knockdown(strike(22, 7, 12, 70, Overhead, 0)),
        Action::AirFa => anti_air(strike(18, 5, 9, 85, Overhead, 0)),
        Action::AirFb => anti_air(strike(24, 7, 14, 95, Overhead, 0)),
        Action::AirUa => anti_air(strike(16, 4, 7, 60, Overhead, 0)),
        Action::AirUb => anti_air(strike(22, 6, 12, 70, Overhead, 0)),

        Action::StandDDfFa => strike(40, 14, 10, 320, Mid, 5),
        Action::StandDDfFb => knockdown(strike(45, 16, 40, 320, Mid, -30)),
        Action::StandFDDfa => anti_air(strike(36, 5, 15, 75, Mid, 0)),
        Action::StandFDDfb => knockdown(anti_air(strike(40, 5, 30, 80, Mid, -50))),
        Action::StandDDbBa => strike(38, 12, 12, 150, Low, 0),
        Action::StandDDbBb => knockdown(strike(44, 12, 25, 170, Low, -50)),
        Action::AirDDfFa => anti_air(strike(40, 12, 10, 260, Overhead, 5)),
        Action::AirDDfFb => knockdown(anti_air(strike(45, 14, 30, 260, Overhead, -50))),
        Action::AirFDDfa => anti_air(strike(34, 6, 14, 80, Overhead, 0)),
        Action::AirFDDfb => knockdown(anti_air(strike(38, 6, 28, 85, Overhead, -50))),
        Action::AirDDbBa => strike(36, 10, 12, 120, Overhead, 0),
        Action::AirDDbBb => knockdown(strike(42, 10, 25, 140, Overhead, -50)),
        Action::StandDDfFc => knockdown(anti_air(strike(60, 20, 120, 420, Mid, -150))),

        _ => IDLE,
    }
}

/// The motion table the agent reads: attack start frames and energy costs.
pub fn arena_motion_table() -> MotionTable {
    MotionTable::from_fn(|action| {
        let spec = move_spec(action);
        MotionEntry {
            attack_start_frame: spec.attack_start,
            energy_cost: spec.energy,
        }
    })
}
