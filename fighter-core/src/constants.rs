use crate::action::Action;

// k-nearest-neighbour opponent model
pub const K_DISTANCE: i32 = 50;
pub const K_THRESHOLD: f64 = 0.3;
pub const MAX_K: usize = 3;

// Lookahead
pub const DELAY_FRAMES: u32 = 14;
pub const EVALUATION_FRAMES: u32 = 60;
pub const MAX_ROLLOUTS_PER_FRAME: usize = 64;

// Fallback gate calibration (history samples) and attack range calibration (pixels)
pub const MIN_OPP_DATA: i32 = 5;
pub const UPPER_OPP_DATA: i32 = 15;
pub const MIN_DISTANCE: i32 = 40;
pub const UPPER_DISTANCE: i32 = 80;

/// History is wiped whenever the round counter moves to a positive multiple of this.
pub const RESET_ROUND_PERIOD: u32 = 3;

pub const DEFAULT_GUARD_ACTION: Action = Action::CrouchGuard;

// Energy thresholds gating the fallback menu's specials
pub const LIGHT_SPECIAL_ENERGY: i32 = 5;
pub const MEDIUM_SPECIAL_ENERGY: i32 = 30;
pub const HEAVY_SPECIAL_ENERGY: i32 = 50;
