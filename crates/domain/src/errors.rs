//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for StillMint
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum StillMintError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sensor error: {0}")]
    Sensor(String),

    #[error("Reward error: {0}")]
    Reward(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid state transition: {0}")]
    InvalidState(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StillMintError {
    /// Stable label suitable for logging fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Database(_) => "database",
            Self::Config(_) => "config",
            Self::Sensor(_) => "sensor",
            Self::Reward(_) => "reward",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidState(_) => "invalid_state",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for StillMint operations
pub type Result<T> = std::result::Result<T, StillMintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let err = StillMintError::NotFound("user u-1".into());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"type":"NotFound","message":"user u-1"}"#);

        let back: StillMintError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn display_includes_category() {
        let err = StillMintError::InvalidState("session already active".into());
        assert_eq!(err.to_string(), "Invalid state transition: session already active");
        assert_eq!(err.label(), "invalid_state");
    }
}
