pub mod action;
pub mod agent;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod emitter;
pub mod error;
pub mod evaluator;
pub mod fallback;
pub mod frame;
pub mod history;
pub mod motion;
pub mod position;
pub mod predictor;
pub mod session;
pub mod simulator;

pub use action::Action;
pub use agent::{Agent, DecisionPath, DecisionRecord, Phase};
pub use config::AgentConfig;
pub use emitter::{InputEmitter, InputKey};
pub use error::{AgentError, ConfigError};
pub use frame::{CharacterSnapshot, CharacterState, FrameSnapshot};
pub use motion::{GameData, MotionEntry, MotionTable};
pub use position::{classify, PositionClass};
pub use simulator::ForwardSimulator;
