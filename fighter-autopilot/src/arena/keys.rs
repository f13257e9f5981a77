use std::collections::VecDeque;

use fighter_core::{Action, FrameSnapshot, InputEmitter, InputKey};

use super::engine::facing_sign;

/// Numpad notation, written for a character facing right. `_` presses the
/// following button together with the preceding direction.
fn command(action: Action) -> &'static str {
    match action {
        Action::ForwardWalk => "6",
        Action::Dash => "6 6",
        Action::BackStep => "4 4",
        Action::Crouch => "2",
        Action::Jump => "8",
        Action::ForJump => "9",
        Action::BackJump => "7",
        Action::StandGuard => "4",
        Action::CrouchGuard => "1",
        Action::AirGuard => "7",
        Action::ThrowA => "4 _ A",
        Action::ThrowB => "4 _ B",
        Action::StandA | Action::AirA => "A",
        Action::StandB | Action::AirB => "B",
        Action::CrouchA | Action::AirDa => "2 _ A",
        Action::CrouchB | Action::AirDb => "2 _ B",
        Action::StandFa => "6 _ A",
        Action::StandFb => "6 _ B",
        Action::CrouchFa => "3 _ A",
        Action::CrouchFb => "3 _ B",
        Action::AirFa => "9 _ A",
        Action::AirFb => "9 _ B",
        Action::AirUa => "8 _ A",
        Action::AirUb => "8 _ B",
        Action::StandDDfFa | Action::AirDDfFa => "2 3 6 _ A",
        Action::StandDDfFb | Action::AirDDfFb => "2 3 6 _ B",
        Action::StandFDDfa | Action::AirFDDfa => "6 2 3 _ A",
        Action::StandFDDfb | Action::AirFDDfb => "6 2 3 _ B",
        Action::StandDDbBa | Action::AirDDbBa => "2 1 4 _ A",
        Action::StandDDbBb | Action::AirDDbBb => "2 1 4 _ B",
        Action::StandDDfFc => "2 3 6 _ C",
        _ => "5",
    }
}

fn direction_key(numpad: u32, facing_right: bool) -> InputKey {
    let (forward, back) = (matches!(numpad, 3 | 6 | 9), matches!(numpad, 1 | 4 | 7));
    InputKey {
        up: numpad >= 7,
        down: numpad <= 3,
        right: (forward && facing_right) || (back && !facing_right),
        left: (forward && !facing_right) || (back && facing_right),
        ..InputKey::neutral()
    }
}

fn press(key: &mut InputKey, button: &str) {
    match button {
        "A" => key.a = true,
        "B" => key.b = true,
        "C" => key.c = true,
        _ => {}
    }
}

/// Expands `action` into one key per frame.
pub fn key_sequence(action: Action, facing_right: bool) -> Vec<InputKey> {
    let mut keys: Vec<InputKey> = Vec::new();
    let mut hold = false;
    let mut last_numpad = None;
    for token in command(action).split_whitespace() {
        match token {
            "_" => hold = true,
            "A" | "B" | "C" => {
                match keys.last_mut() {
                    Some(key) if hold => press(key, token),
                    _ => {
                        let mut key = InputKey::neutral();
                        press(&mut key, token);
                        keys.push(key);
                    }
                }
                hold = false;
            }
            digits => {
                let Some(numpad) = digits.parse::<u32>().ok().filter(|n| (1..=9).contains(n)) else {
                    continue;
                };
                if last_numpad == Some(numpad) && numpad != 5 {
                    keys.push(InputKey::neutral());
                }
                keys.push(direction_key(numpad, facing_right));
                last_numpad = Some(numpad);
            }
        }
    }
    keys
}

/// Emits queued commands one key per frame and remembers the action behind
/// the last command so the host can apply it.
#[derive(Clone, Debug, Default)]
pub struct KeyQueueEmitter {
    queue: VecDeque<InputKey>,
    facing_right: bool,
    committed: Option<Action>,
    commands_issued: u32,
}

impl KeyQueueEmitter {
    pub fn new() -> Self {
        Self {
            facing_right: true,
            ..Self::default()
        }
    }

    /// The action of the most recent `command_call`, if not yet taken.
    pub fn take_committed(&mut self) -> Option<Action> {
        self.committed.take()
    }

    #[inline]
    pub fn commands_issued(&self) -> u32 {
        self.commands_issued
    }

    #[inline]
    pub fn pending_keys(&self) -> usize {
        self.queue.len()
    }
}

impl InputEmitter for KeyQueueEmitter {
    fn set_frame(&mut self, frame: &FrameSnapshot, agent_is_p1: bool) {
        if frame.empty {
            return;
        }
        self.facing_right = facing_sign(frame.me(agent_is_p1), frame.opponent(agent_is_p1)) > 0;
    }

    fn has_pending_skill(&self) -> bool {
        !self.queue.is_empty()
    }

    fn take_input(&mut self) -> InputKey {
        self.queue.pop_front().unwrap_or_default()
    }

    fn command_call(&mut self, action: Action) {
        self.queue = key_sequence(action, self.facing_right).into();
        self.committed = Some(action);
        self.commands_issued += 1;
    }

    fn cancel(&mut self) {
        self.queue.clear();
        self.committed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fighter_core::CharacterSnapshot;

    #[test]
    fn fireball_motion_follows_facing() {
        let right = key_sequence(Action::StandDDfFa, true);
        assert_eq!(right.len(), 3);
        assert!(right[0].down && !right[0].left && !right[0].right);
        assert!(right[1].down && right[1].right);
        assert!(right[2].right && right[2].a && !right[2].down);

        let left = key_sequence(Action::StandDDfFa, false);
        assert!(left[1].down && left[1].left);
        assert!(left[2].left && left[2].a);
    }

    #[test]
    fn repeated_direction_is_split_by_neutral() {
        let dash = key_sequence(Action::Dash, true);
        assert_eq!(dash.len(), 3);
        assert!(dash[1].is_neutral());
    }

    #[test]
    fn single_button_and_idle_commands() {
        let jab = key_sequence(Action::StandA, true);
        assert_eq!(jab.len(), 1);
        assert!(jab[0].a);
        let idle = key_sequence(Action::Neutral, true);
        assert_eq!(idle, vec![InputKey::neutral()]);
    }

    #[test]
    fn skill_stays_pending_until_every_key_is_taken() {
        let mut emitter = KeyQueueEmitter::new();
        let mut frame = FrameSnapshot {
            players: [
                CharacterSnapshot {
                    x: 500,
                    ..CharacterSnapshot::default()
                },
                CharacterSnapshot {
                    x: 300,
                    ..CharacterSnapshot::default()
                },
            ],
            remaining_time_ms: 1_000,
            ..FrameSnapshot::default()
        };
        emitter.set_frame(&frame, true);
        emitter.command_call(Action::StandDDbBa);
        assert_eq!(emitter.take_committed(), Some(Action::StandDDbBa));
        assert_eq!(emitter.take_committed(), None);
        assert_eq!(emitter.pending_keys(), 3);

        let first = emitter.take_input();
        assert!(first.down && !first.left && !first.right);
        assert!(emitter.has_pending_skill());
        assert_eq!(emitter.pending_keys(), 2);
        let second = emitter.take_input();
        assert!(second.down && second.right);
        let third = emitter.take_input();
        assert!(third.right && third.a);
        assert!(!emitter.has_pending_skill());
        assert!(emitter.take_input().is_neutral());

        frame.empty = true;
        frame.players[1].x = 900;
        emitter.set_frame(&frame, true);
        emitter.command_call(Action::ForwardWalk);
        assert!(emitter.take_input().left);
        emitter.cancel();
        assert_eq!(emitter.pending_keys(), 0);
        assert!(!emitter.has_pending_skill());
        assert_eq!(emitter.commands_issued(), 2);
    }
}
