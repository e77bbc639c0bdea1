//! Session and sampler error types

use stillmint_domain::{SessionPhase, StillMintError};
use thiserror::Error;

/// Errors raised by the sampler and the session state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// `start` called while already running or sampling.
    #[error("{component} is already active")]
    AlreadyActive { component: &'static str },

    /// `start` called on a session that already reached a verdict.
    #[error("session already finished as {phase}")]
    SessionFinished { phase: SessionPhase },

    /// `on_tick` called while the session is not running.
    #[error("session is not running (phase: {phase})")]
    NotRunning { phase: SessionPhase },

    /// Zero duration or zero violation limit.
    #[error("invalid session configuration: {0}")]
    InvalidConfiguration(String),

    /// Sensor feed could not be opened.
    #[error("motion sensor unavailable: {0}")]
    SensorUnavailable(String),
}

impl From<SessionError> for StillMintError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidConfiguration(_) => Self::Config(err.to_string()),
            SessionError::SensorUnavailable(_) => Self::Sensor(err.to_string()),
            SessionError::AlreadyActive { .. }
            | SessionError::SessionFinished { .. }
            | SessionError::NotRunning { .. } => Self::InvalidState(err.to_string()),
        }
    }
}
