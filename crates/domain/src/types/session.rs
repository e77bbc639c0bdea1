//! Meditation session state types

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SESSION_SECONDS, DEFAULT_VIOLATION_LIMIT};
use crate::impl_domain_status_conversions;

/// Lifecycle phase of a session. Transitions only move forward:
/// Idle → Running → (Completed | Disqualified).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Running,
    Completed,
    Disqualified,
}

impl_domain_status_conversions!(SessionPhase {
    Idle => "idle",
    Running => "running",
    Completed => "completed",
    Disqualified => "disqualified",
});

impl SessionPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Disqualified)
    }
}

/// Parameters for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub total_seconds: u32,
    /// Reaching this many violations disqualifies the session.
    pub violation_limit: u32,
}

impl SessionConfig {
    pub fn new(total_seconds: u32, violation_limit: u32) -> Self {
        Self { total_seconds, violation_limit }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_SECONDS, DEFAULT_VIOLATION_LIMIT)
    }
}

/// What the sampler reported at one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    /// 1-based tick number.
    pub tick: u32,
    pub still: bool,
    pub magnitude: Option<f64>,
}

/// Mutable state of one in-progress or finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub total_seconds: u32,
    pub remaining_seconds: u32,
    pub violation_count: u32,
    pub violation_limit: u32,
    pub phase: SessionPhase,
    pub tick_log: Vec<TickRecord>,
}

impl SessionState {
    /// Fresh state for a session that has not started.
    pub fn idle() -> Self {
        Self {
            total_seconds: 0,
            remaining_seconds: 0,
            violation_count: 0,
            violation_limit: 0,
            phase: SessionPhase::Idle,
            tick_log: Vec::new(),
        }
    }

    /// Fresh running state for `config`.
    pub fn running(config: SessionConfig) -> Self {
        Self {
            total_seconds: config.total_seconds,
            remaining_seconds: config.total_seconds,
            violation_count: 0,
            violation_limit: config.violation_limit,
            phase: SessionPhase::Running,
            tick_log: Vec::with_capacity(config.total_seconds as usize),
        }
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.total_seconds.saturating_sub(self.remaining_seconds)
    }

    /// Phase the session would end in if it expired now.
    pub fn terminal_phase(&self) -> SessionPhase {
        if self.violation_count < self.violation_limit {
            SessionPhase::Completed
        } else {
            SessionPhase::Disqualified
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::idle()
    }
}

/// Terminal outcome of a session, reported exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionVerdict {
    pub phase: SessionPhase,
    pub violation_count: u32,
    pub elapsed_seconds: u32,
}

impl SessionVerdict {
    pub fn is_qualified(&self) -> bool {
        self.phase == SessionPhase::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_phases() {
        assert!(!SessionPhase::Idle.is_terminal());
        assert!(!SessionPhase::Running.is_terminal());
        assert!(SessionPhase::Completed.is_terminal());
        assert!(SessionPhase::Disqualified.is_terminal());
    }

    #[test]
    fn phase_text_round_trips_through_storage_form() {
        assert_eq!(SessionPhase::Disqualified.to_string(), "disqualified");
        assert_eq!("completed".parse::<SessionPhase>(), Ok(SessionPhase::Completed));
    }

    #[test]
    fn running_state_starts_full() {
        let state = SessionState::running(SessionConfig::default());
        assert_eq!(state.remaining_seconds, 300);
        assert_eq!(state.elapsed_seconds(), 0);
        assert_eq!(state.phase, SessionPhase::Running);
    }

    #[test]
    fn terminal_phase_requires_count_below_limit() {
        let mut state = SessionState::running(SessionConfig::new(10, 3));
        state.violation_count = 2;
        assert_eq!(state.terminal_phase(), SessionPhase::Completed);

        state.violation_count = 3;
        assert_eq!(state.terminal_phase(), SessionPhase::Disqualified);
    }
}
