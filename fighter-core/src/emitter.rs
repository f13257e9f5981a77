use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::frame::FrameSnapshot;

/// Buttons held for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputKey {
    pub a: bool,
    pub b: bool,
    pub c: bool,
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputKey {
    #[inline]
    pub fn neutral() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_neutral(&self) -> bool {
        *self == Self::neutral()
    }
}

/// Turns abstract actions into queued key sequences. Supplied by the host.
pub trait InputEmitter {
    /// Refreshes the frame used to orient directional input.
    fn set_frame(&mut self, frame: &FrameSnapshot, agent_is_p1: bool);
    /// A multi-frame command is still being typed out.
    fn has_pending_skill(&self) -> bool;
    /// Pops the next key of the queued command, or neutral when nothing is queued.
    fn take_input(&mut self) -> InputKey;
    /// Replaces whatever is queued with `action`'s command.
    fn command_call(&mut self, action: Action);
    fn cancel(&mut self);
}
