//! Session runner error types

use std::time::Duration;

use stillmint_core::SessionError;
use stillmint_domain::StillMintError;
use thiserror::Error;

use crate::errors::InfraError;

/// Runner-specific errors
#[derive(Debug, Error)]
pub enum RunnerError {
    /// A session is already being driven
    #[error("Session runner already running")]
    AlreadyRunning,

    /// No session is being driven
    #[error("Session runner not running")]
    NotRunning,

    /// The session was cancelled before a verdict
    #[error("Session cancelled before completion")]
    Cancelled,

    /// Timer or sampler rejected an operation
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Operation timed out
    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Task join failed
    #[error("Task join failed: {0}")]
    TaskJoinFailed(String),
}

impl From<RunnerError> for InfraError {
    fn from(err: RunnerError) -> Self {
        let domain_err = match err {
            RunnerError::Session(inner) => StillMintError::from(inner),
            RunnerError::AlreadyRunning | RunnerError::NotRunning | RunnerError::Cancelled => {
                StillMintError::InvalidState(err.to_string())
            }
            RunnerError::Timeout { .. } | RunnerError::TaskJoinFailed(_) => {
                StillMintError::Internal(err.to_string())
            }
        };
        InfraError(domain_err)
    }
}

impl From<RunnerError> for StillMintError {
    fn from(err: RunnerError) -> Self {
        InfraError::from(err).into()
    }
}

/// Convenience type alias for runner operations
pub type RunnerResult<T> = Result<T, RunnerError>;

#[cfg(test)]
mod tests {
    use stillmint_domain::SessionPhase;

    use super::*;

    #[test]
    fn session_errors_keep_their_domain_mapping() {
        let err: StillMintError =
            RunnerError::Session(SessionError::InvalidConfiguration("zero".into())).into();
        assert!(matches!(err, StillMintError::Config(_)));

        let err: StillMintError =
            RunnerError::Session(SessionError::NotRunning { phase: SessionPhase::Idle }).into();
        assert!(matches!(err, StillMintError::InvalidState(_)));
    }

    #[test]
    fn lifecycle_errors_are_invalid_state() {
        let err: StillMintError = RunnerError::Cancelled.into();
        assert_eq!(err, StillMintError::InvalidState("Session cancelled before completion".into()));
    }
}
