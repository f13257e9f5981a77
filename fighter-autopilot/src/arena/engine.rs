//! Frame stepping shared by the live match and the lookahead simulator.
//!
//! Everything here is a pure function of the snapshot, so a rollout started
//! from a copy of the live frame reproduces the live game exactly when it is
//! fed the same commands.

use fighter_core::{Action, CharacterSnapshot, CharacterState, FrameSnapshot};

use super::moves::{move_spec, Guard, Height, MoveSpec, Strike};

pub const STAGE_WIDTH: i32 = 960;
pub const GROUND_Y: i32 = 400;
pub const START_HP: i32 = 400;
pub const MAX_ENERGY: i32 = 300;
pub const GRAVITY: i32 = 1;
pub const FRAME_MS: i32 = 1000 / 60;

const HIT_STUN_FRAMES: i32 = 14;
const GUARD_STUN_FRAMES: i32 = 8;
const DOWN_FRAMES: i32 = 40;
const RISE_FRAMES: i32 = 12;
const LANDING_FRAMES: i32 = 4;
const PUSHBACK: i32 = 8;
/// Long enough that an airborne reaction only ends on landing.
const UNTIL_LANDING: i32 = i32::MAX / 2;

/// +1 when `me` is facing the right wall.
pub fn facing_sign(me: &CharacterSnapshot, opp: &CharacterSnapshot) -> i32 {
    let toward = if opp.x >= me.x { 1 } else { -1 };
    if me.front {
        toward
    } else {
        -toward
    }
}

/// Whether `character` would accept a new command this frame.
#[inline]
pub fn accepts_command(character: &CharacterSnapshot) -> bool {
    character.control || character.remaining_frames <= 0
}

fn can_start(character: &CharacterSnapshot, action: Action, spec: &MoveSpec) -> bool {
    if !accepts_command(character) || character.is_knocked_down() {
        return false;
    }
    let airborne_ok = if spec.jump.is_some() {
        !character.is_airborne()
    } else {
        action.is_air_action() == character.is_airborne()
    };
    airborne_ok && (spec.energy >= 0 || character.energy >= -spec.energy)
}

fn crouching(action: Action) -> bool {
    matches!(
        action,
        Action::Crouch
            | Action::CrouchGuard
            | Action::CrouchA
            | Action::CrouchB
            | Action::CrouchFa
            | Action::CrouchFb
    )
}

/// Starts `action` if the character can take it. Returns whether it started.
pub fn begin(character: &mut CharacterSnapshot, action: Action, facing: i32) -> bool {
    let spec = move_spec(action);
    if !can_start(character, action, &spec) {
        return false;
    }

    character.action = action;
    character.action_elapsed_frames = 0;
    character.remaining_frames = spec.duration;
    character.control = false;
    character.front = true;
    character.energy = (character.energy + spec.energy).clamp(0, MAX_ENERGY);
    if let Some((forward, up)) = spec.jump {
        character.state = CharacterState::Air;
        character.speed_x = forward * facing;
        character.speed_y = -up;
    } else if !character.is_airborne() {
        character.state = if crouching(action) {
            CharacterState::Crouch
        } else {
            CharacterState::Stand
        };
    }
    true
}

fn settle(character: &mut CharacterSnapshot) {
    match character.action {
        Action::Down => {
            character.action = Action::Rise;
            character.action_elapsed_frames = 0;
            character.remaining_frames = RISE_FRAMES;
        }
        _ if character.is_airborne() => {
            character.action = Action::Air;
            character.control = true;
        }
        _ => {
            character.action = Action::Stand;
            character.state = CharacterState::Stand;
            character.control = true;
        }
    }
}

fn land(character: &mut CharacterSnapshot) {
    character.y = GROUND_Y;
    character.speed_x = 0;
    character.speed_y = 0;
    character.action_elapsed_frames = 0;
    character.control = false;
    if character.action == Action::AirRecov {
        character.state = CharacterState::Down;
        character.action = Action::Down;
        character.remaining_frames = DOWN_FRAMES;
    } else {
        character.state = CharacterState::Stand;
        character.action = Action::Landing;
        character.remaining_frames = LANDING_FRAMES;
    }
}

fn tick(character: &mut CharacterSnapshot, facing: i32) {
    character.action_elapsed_frames += 1;
    character.remaining_frames -= 1;

    if character.is_airborne() {
        character.x += character.speed_x;
        character.y += character.speed_y;
        character.speed_y += GRAVITY;
        if character.y >= GROUND_Y {
            land(character);
        }
    } else {
        character.x += move_spec(character.action).step_x * facing;
    }
    character.x = character.x.clamp(0, STAGE_WIDTH);
}

fn guard_of(action: Action) -> Option<Guard> {
    match action {
        Action::StandGuardRecov => Some(Guard::Stand),
        Action::CrouchGuardRecov => Some(Guard::Crouch),
        Action::AirGuardRecov => Some(Guard::Air),
        _ => move_spec(action).guard,
    }
}

fn blocks(guard: Guard, height: Height) -> bool {
    matches!(
        (guard, height),
        (Guard::Stand, Height::Mid | Height::Overhead)
            | (Guard::Crouch, Height::Mid | Height::Low)
            | (Guard::Air, Height::Mid | Height::Low | Height::Overhead)
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Contact {
    Hit(Strike),
    Guarded(Strike),
}

fn contact(attacker: &CharacterSnapshot, defender: &CharacterSnapshot) -> Option<Contact> {
    let spec = move_spec(attacker.action);
    let strike = spec.strike?;
    if attacker.action_elapsed_frames != spec.attack_start || !attacker.front {
        return None;
    }
    if defender.is_knocked_down() || (attacker.x - defender.x).abs() > strike.reach {
        return None;
    }
    if defender.is_airborne() {
        if strike.height == Height::Throw || !(strike.anti_air || attacker.is_airborne()) {
            return None;
        }
    } else if strike.height == Height::Throw && attacker.is_airborne() {
        return None;
    }

    match guard_of(defender.action) {
        Some(guard) if blocks(guard, strike.height) => Some(Contact::Guarded(strike)),
        _ => Some(Contact::Hit(strike)),
    }
}

fn apply(
    attacker: &mut CharacterSnapshot,
    defender: &mut CharacterSnapshot,
    outcome: Contact,
    push: i32,
) {
    defender.action_elapsed_frames = 0;
    defender.control = false;
    match outcome {
        Contact::Guarded(strike) => {
            defender.hp -= strike.damage / 10;
            attacker.energy = (attacker.energy + strike.damage / 4).min(MAX_ENERGY);
            defender.action = match guard_of(defender.action) {
                Some(Guard::Air) => Action::AirGuardRecov,
                Some(Guard::Crouch) => Action::CrouchGuardRecov,
                _ => Action::StandGuardRecov,
            };
            defender.remaining_frames = GUARD_STUN_FRAMES;
            defender.x = (defender.x + push / 2).clamp(0, STAGE_WIDTH);
        }
        Contact::Hit(strike) => {
            defender.hp -= strike.damage;
            attacker.energy = (attacker.energy + strike.damage / 2).min(MAX_ENERGY);
            if defender.is_airborne() {
                defender.action = Action::AirRecov;
                defender.remaining_frames = UNTIL_LANDING;
                defender.speed_x = push / 2;
                defender.speed_y = defender.speed_y.min(-6);
            } else if strike.knockdown {
                defender.state = CharacterState::Down;
                defender.action = Action::Down;
                defender.remaining_frames = DOWN_FRAMES;
            } else {
                defender.action = if defender.state == CharacterState::Crouch {
                    Action::CrouchRecov
                } else {
                    Action::StandRecov
                };
                defender.remaining_frames = HIT_STUN_FRAMES;
                defender.x = (defender.x + push).clamp(0, STAGE_WIDTH);
            }
        }
    }
}

/// Advances `frame` by one frame. `commands` are indexed by player slot and
/// ignored for characters that cannot act. Returns which commands started.
pub fn advance(frame: &mut FrameSnapshot, commands: [Option<Action>; 2]) -> [bool; 2] {
    let mut started = [false; 2];
    let mut facing = [0; 2];
    for slot in 0..2 {
        let opp = frame.players[1 - slot];
        let me = &mut frame.players[slot];
        if me.remaining_frames <= 0 {
            settle(me);
        }
        facing[slot] = facing_sign(me, &opp);
        if let Some(action) = commands[slot] {
            started[slot] = begin(me, action, facing[slot]);
            if started[slot] {
                facing[slot] = if opp.x >= me.x { 1 } else { -1 };
            }
        }
    }

    for slot in 0..2 {
        tick(&mut frame.players[slot], facing[slot]);
    }

    let contacts = [
        contact(&frame.players[0], &frame.players[1]),
        contact(&frame.players[1], &frame.players[0]),
    ];
    for (slot, outcome) in contacts.into_iter().enumerate() {
        if let Some(outcome) = outcome {
            let [p1, p2] = &mut frame.players;
            let (attacker, defender) = if slot == 0 { (p1, p2) } else { (p2, p1) };
            let push = PUSHBACK * facing_sign(attacker, defender);
            apply(attacker, defender, outcome, push);
        }
    }

    for slot in 0..2 {
        let opp = frame.players[1 - slot];
        let me = &mut frame.players[slot];
        let toward = if opp.x >= me.x { 1 } else { -1 };
        me.front = accepts_command(me) || facing[slot] == toward;
    }

    frame.frame_number += 1;
    frame.remaining_time_ms -= FRAME_MS;
    started
}

pub fn starting_character(x: i32) -> CharacterSnapshot {
    CharacterSnapshot {
        x,
        y: GROUND_Y,
        hp: START_HP,
        ..CharacterSnapshot::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duel(p1_x: i32, p2_x: i32) -> FrameSnapshot {
        FrameSnapshot {
            players: [starting_character(p1_x), starting_character(p2_x)],
            frame_number: 0,
            round: 1,
            remaining_time_ms: 60_000,
            empty: false,
        }
    }

    fn run(frame: &mut FrameSnapshot, frames: u32) {
        for _ in 0..frames {
            advance(frame, [None, None]);
        }
    }

    #[test]
    fn jab_lands_on_its_start_frame_only() {
        let mut frame = duel(400, 460);
        assert_eq!(advance(&mut frame, [Some(Action::StandA), None]), [true, false]);
        run(&mut frame, 2);
        assert_eq!(frame.players[1].hp, START_HP);
        run(&mut frame, 1);
        assert_eq!(frame.players[0].action_elapsed_frames, 4);
        assert_eq!(frame.players[1].hp, START_HP - 5);
        assert_eq!(frame.players[1].action, Action::StandRecov);
        run(&mut frame, 3);
        assert_eq!(frame.players[1].hp, START_HP - 5);
    }

    #[test]
    fn out_of_reach_attack_whiffs() {
        let mut frame = duel(100, 400);
        advance(&mut frame, [Some(Action::StandB), None]);
        run(&mut frame, 20);
        assert_eq!(frame.players[1].hp, START_HP);
        assert!(accepts_command(&frame.players[0]));
    }

    #[test]
    fn crouch_guard_blocks_low_attacks() {
        let mut frame = duel(400, 450);
        advance(&mut frame, [Some(Action::CrouchB), Some(Action::CrouchGuard)]);
        for _ in 0..6 {
            advance(&mut frame, [None, Some(Action::CrouchGuard)]);
        }
        assert_eq!(frame.players[1].action, Action::CrouchGuardRecov);
        assert_eq!(frame.players[1].hp, START_HP - 1);
        assert_eq!(frame.players[0].energy, 3);
    }

    #[test]
    fn specials_need_energy() {
        let mut frame = duel(400, 460);
        assert_eq!(advance(&mut frame, [Some(Action::StandDDfFb), None]), [false, false]);
        frame.players[0].energy = 40;
        run(&mut frame, 1);
        assert_eq!(advance(&mut frame, [Some(Action::StandDDfFb), None]), [true, false]);
        assert_eq!(frame.players[0].energy, 10);
    }

    #[test]
    fn jump_arcs_back_to_the_ground() {
        let mut frame = duel(400, 700);
        advance(&mut frame, [Some(Action::ForJump), None]);
        assert!(frame.players[0].is_airborne());
        assert_eq!(
            advance(&mut frame, [Some(Action::StandA), None]),
            [false, false]
        );
        let mut airborne_frames = 1;
        while frame.players[0].is_airborne() {
            advance(&mut frame, [None, None]);
            airborne_frames += 1;
            assert!(airborne_frames < 100);
        }
        assert_eq!(frame.players[0].y, GROUND_Y);
        assert_eq!(frame.players[0].action, Action::Landing);
        assert!(frame.players[0].x > 400);
    }

    #[test]
    fn knockdown_recovers_through_rise() {
        let mut frame = duel(400, 480);
        advance(&mut frame, [Some(Action::StandFb), None]);
        run(&mut frame, 9);
        assert!(frame.players[1].is_knocked_down());
        run(&mut frame, (DOWN_FRAMES + RISE_FRAMES + 1) as u32);
        assert!(!frame.players[1].is_knocked_down());
        assert!(accepts_command(&frame.players[1]));
    }

    #[test]
    fn stepping_is_deterministic() {
        let script = [
            [Some(Action::Dash), Some(Action::StandB)],
            [None, None],
            [Some(Action::CrouchFb), Some(Action::Jump)],
        ];
        let play = || {
            let mut frame = duel(300, 600);
            for _ in 0..40 {
                for commands in script {
                    advance(&mut frame, commands);
                }
            }
            frame
        };
        assert_eq!(play(), play());
    }
}
