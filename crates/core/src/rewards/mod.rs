//! Reward issuance for completed sessions.

pub mod ports;
pub mod service;

pub use service::{MeditationService, RewardOutcome};
