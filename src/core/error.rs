use std::fmt;

/// Device-level failures. The queue and registry themselves never fail:
/// an empty read is `None`, duplicate or missing subscriptions are no-ops.
#[derive(Debug, Clone, PartialEq)]
pub enum ThermoError {
    InvalidTopic { topic: String, reason: &'static str },
    InvalidPayload { topic: String, payload: String },
    Transport(String),
}

impl std::error::Error for ThermoError {}

impl fmt::Display for ThermoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThermoError::InvalidTopic { topic, reason } => {
                write!(f, "Invalid topic '{topic}': {reason}")
            }
            ThermoError::InvalidPayload { topic, payload } => {
                write!(f, "Invalid payload '{payload}' on topic '{topic}'")
            }
            ThermoError::Transport(msg) => write!(f, "Transport error: {msg}"),
        }
    }
}
