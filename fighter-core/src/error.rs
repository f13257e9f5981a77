use core::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    NonPositive { field: &'static str, value: i64 },
    NegativeThreshold { value: f64 },
    DegenerateInterval {
        field: &'static str,
        min: i32,
        upper: i32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::NegativeThreshold { value } => {
                write!(f, "k_threshold must be non-negative, got {value}")
            }
            Self::DegenerateInterval { field, min, upper } => write!(
                f,
                "{field} calibration interval is degenerate: min={min}, upper={upper}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug, PartialEq)]
pub enum AgentError {
    NotInitialized,
    Closed,
    /// A lifecycle method was entered while another one was still running.
    ReentrantCall { phase: &'static str },
    InvalidConfig(ConfigError),
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "agent used before initialize"),
            Self::Closed => write!(f, "agent used after shutdown"),
            Self::ReentrantCall { phase } => {
                write!(f, "lifecycle call overlapped an in-flight {phase} phase")
            }
            Self::InvalidConfig(err) => write!(f, "invalid agent config: {err}"),
        }
    }
}

impl std::error::Error for AgentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidConfig(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for AgentError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig(err)
    }
}
