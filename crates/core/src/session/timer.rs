//! Session countdown timer
//!
//! `SessionTimer` owns one [`SessionState`] and moves it through
//! Idle → Running → (Completed | Disqualified). It does not schedule itself;
//! a driver calls [`SessionTimer::on_tick`] once per tick period.

use std::fmt;
use std::sync::Arc;

use stillmint_domain::{SessionConfig, SessionPhase, SessionState, SessionVerdict, TickRecord};
use tracing::{debug, info};

use crate::errors::SessionError;
use crate::motion::ports::StillnessView;

/// Receives the terminal verdict. Called at most once per session.
pub type VerdictCallback = Box<dyn FnOnce(SessionVerdict) + Send>;

/// Result of a single processed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still running; keep scheduling ticks.
    Continue { remaining_seconds: u32, still: bool },
    /// This tick ended the session.
    Finished(SessionVerdict),
}

impl TickOutcome {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }
}

pub struct SessionTimer {
    stillness: Arc<dyn StillnessView>,
    state: SessionState,
    on_verdict: Option<VerdictCallback>,
}

impl SessionTimer {
    pub fn new(stillness: Arc<dyn StillnessView>) -> Self {
        Self { stillness, state: SessionState::idle(), on_verdict: None }
    }

    /// Move from Idle to Running with a fresh countdown.
    ///
    /// # Errors
    /// - `AlreadyActive` if the session is running
    /// - `SessionFinished` if a verdict was already reached
    /// - `InvalidConfiguration` for a zero duration or zero violation limit
    pub fn start(
        &mut self,
        config: SessionConfig,
        on_verdict: VerdictCallback,
    ) -> Result<(), SessionError> {
        match self.state.phase {
            SessionPhase::Idle => {}
            SessionPhase::Running => {
                return Err(SessionError::AlreadyActive { component: "session timer" });
            }
            phase => return Err(SessionError::SessionFinished { phase }),
        }

        validate(&config)?;

        self.state = SessionState::running(config);
        self.on_verdict = Some(on_verdict);
        info!(
            total_seconds = config.total_seconds,
            violation_limit = config.violation_limit,
            "meditation session started"
        );
        Ok(())
    }

    /// Process one tick.
    ///
    /// Decrements the countdown, counts a violation when the sampler reports
    /// movement, and at zero remaining settles the verdict and fires the
    /// callback.
    ///
    /// # Errors
    /// `NotRunning` when the session is idle or already finished. The state is
    /// left untouched in that case.
    pub fn on_tick(&mut self) -> Result<TickOutcome, SessionError> {
        if self.state.phase != SessionPhase::Running {
            return Err(SessionError::NotRunning { phase: self.state.phase });
        }

        let reading = self.stillness.current_state();
        let state = &mut self.state;

        state.remaining_seconds = state.remaining_seconds.saturating_sub(1);
        if !reading.still {
            state.violation_count = state.violation_count.saturating_add(1);
        }

        let tick = u32::try_from(state.tick_log.len()).unwrap_or(u32::MAX).saturating_add(1);
        state.tick_log.push(TickRecord {
            tick,
            still: reading.still,
            magnitude: reading.last_magnitude,
        });

        debug!(
            tick,
            remaining_seconds = state.remaining_seconds,
            still = reading.still,
            violations = state.violation_count,
            "session tick"
        );

        if state.remaining_seconds > 0 {
            return Ok(TickOutcome::Continue {
                remaining_seconds: state.remaining_seconds,
                still: reading.still,
            });
        }

        state.phase = state.terminal_phase();
        let verdict = SessionVerdict {
            phase: state.phase,
            violation_count: state.violation_count,
            elapsed_seconds: state.elapsed_seconds(),
        };
        info!(
            phase = %verdict.phase,
            violations = verdict.violation_count,
            elapsed_seconds = verdict.elapsed_seconds,
            "meditation session finished"
        );

        if let Some(callback) = self.on_verdict.take() {
            callback(verdict);
        }

        Ok(TickOutcome::Finished(verdict))
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    /// The verdict, once the session has reached a terminal phase.
    pub fn verdict(&self) -> Option<SessionVerdict> {
        self.state.phase.is_terminal().then(|| SessionVerdict {
            phase: self.state.phase,
            violation_count: self.state.violation_count,
            elapsed_seconds: self.state.elapsed_seconds(),
        })
    }

    /// Consume the timer, handing back the final state.
    pub fn into_state(self) -> SessionState {
        self.state
    }
}

impl fmt::Debug for SessionTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTimer")
            .field("state", &self.state)
            .field("verdict_pending", &self.on_verdict.is_some())
            .finish_non_exhaustive()
    }
}

fn validate(config: &SessionConfig) -> Result<(), SessionError> {
    if config.total_seconds == 0 {
        return Err(SessionError::InvalidConfiguration("total_seconds must be positive".into()));
    }
    if config.violation_limit == 0 {
        return Err(SessionError::InvalidConfiguration("violation_limit must be positive".into()));
    }
    Ok(())
}
