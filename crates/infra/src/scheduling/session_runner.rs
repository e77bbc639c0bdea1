//! Session runner
//!
//! Owns one meditation session end to end: subscribes a fresh
//! [`MotionSampler`] to the sensor, starts a [`SessionTimer`], feeds it one
//! tick per period from a cancellable [`Ticker`], and hands back the final
//! report. The sampler is stopped on every exit path of the tick loop.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use stillmint_domain::{SensorConfig, SessionConfig};
//! use stillmint_infra::scheduling::{RunnerResult, SessionRunner, SessionRunnerConfig};
//! use stillmint_infra::sensors::BroadcastMotionSensor;
//!
//! # async fn example() -> RunnerResult<()> {
//! let sensor = Arc::new(BroadcastMotionSensor::new());
//! let mut runner =
//!     SessionRunner::new(sensor, SensorConfig::default(), SessionRunnerConfig::default());
//!
//! let report = runner.run(SessionConfig::default(), Box::new(|_| {})).await?;
//! println!("{}", report.verdict.phase);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use stillmint_common::{Ticker, TickerConfig};
use stillmint_core::{
    MotionSampler, MotionSensor, SamplerMode, SessionTimer, TickOutcome, VerdictCallback,
};
use stillmint_domain::{
    SensorConfig, SessionConfig, SessionPhase, SessionSettings, SessionState, SessionVerdict,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::scheduling::error::{RunnerError, RunnerResult};

/// Configuration for the session runner.
#[derive(Debug, Clone)]
pub struct SessionRunnerConfig {
    /// Countdown tick period.
    pub tick_interval: Duration,
    /// Timeout for awaiting the tick task after cancellation.
    pub join_timeout: Duration,
}

impl SessionRunnerConfig {
    pub fn from_settings(settings: &SessionSettings) -> Self {
        Self { tick_interval: settings.tick_interval(), ..Self::default() }
    }
}

impl Default for SessionRunnerConfig {
    fn default() -> Self {
        Self { tick_interval: Duration::from_secs(1), join_timeout: Duration::from_secs(5) }
    }
}

/// Live view of a running session for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub phase: SessionPhase,
    pub remaining_seconds: u32,
    pub violation_count: u32,
    /// Classification read at the latest tick.
    pub still: bool,
}

impl SessionProgress {
    fn idle() -> Self {
        Self { phase: SessionPhase::Idle, remaining_seconds: 0, violation_count: 0, still: true }
    }

    fn from_state(state: &SessionState, still: bool) -> Self {
        Self {
            phase: state.phase,
            remaining_seconds: state.remaining_seconds,
            violation_count: state.violation_count,
            still,
        }
    }
}

/// Final outcome of a session that ran to its verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub verdict: SessionVerdict,
    pub state: SessionState,
    pub sampler_mode: SamplerMode,
}

type TickTask = JoinHandle<RunnerResult<Option<SessionReport>>>;

/// Drives one session at a time with explicit lifecycle management.
pub struct SessionRunner {
    sensor: Arc<dyn MotionSensor>,
    sensor_config: SensorConfig,
    config: SessionRunnerConfig,
    shutdown: CancellationToken,
    cancellation_token: CancellationToken,
    task_handle: Option<TickTask>,
    progress: watch::Sender<SessionProgress>,
}

impl SessionRunner {
    pub fn new(
        sensor: Arc<dyn MotionSensor>,
        sensor_config: SensorConfig,
        config: SessionRunnerConfig,
    ) -> Self {
        let (progress, _) = watch::channel(SessionProgress::idle());
        let shutdown = CancellationToken::new();
        Self {
            sensor,
            sensor_config,
            config,
            cancellation_token: shutdown.child_token(),
            shutdown,
            task_handle: None,
            progress,
        }
    }

    /// Cancel sessions through an externally owned token (e.g. Ctrl-C).
    ///
    /// Every session started afterwards is cancelled when `token` is.
    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token.child_token();
        self.shutdown = token;
        self
    }

    /// Start a session in the background.
    ///
    /// The configuration is validated before the sensor is touched. Returns
    /// how the sampler is running (live or fail-open).
    ///
    /// # Errors
    /// - `AlreadyRunning` if a session is in progress
    /// - `Session(InvalidConfiguration)` for zero duration or limit
    #[instrument(skip(self, on_verdict))]
    pub fn start(
        &mut self,
        session: SessionConfig,
        on_verdict: VerdictCallback,
    ) -> RunnerResult<SamplerMode> {
        if self.is_running() {
            return Err(RunnerError::AlreadyRunning);
        }

        let sampler = Arc::new(MotionSampler::from_config(&self.sensor_config));
        let mut timer = SessionTimer::new(sampler.clone());
        timer.start(session, on_verdict)?;

        let mode = sampler.start(self.sensor.as_ref())?;

        // Fresh token per session so a previous stop does not leak into this one.
        self.cancellation_token = self.shutdown.child_token();
        let ticker = Ticker::new(
            TickerConfig::new(self.config.tick_interval),
            self.cancellation_token.clone(),
        );

        self.progress.send_replace(SessionProgress::from_state(timer.state(), true));
        let progress = self.progress.clone();

        let handle = tokio::spawn(async move {
            Self::tick_loop(timer, sampler, mode, ticker, progress).await
        });
        self.task_handle = Some(handle);

        info!(?mode, tick_ms = self.config.tick_interval.as_millis(), "session runner started");
        Ok(mode)
    }

    /// Wait for the running session to finish.
    ///
    /// Returns `None` if the session was cancelled before its verdict.
    ///
    /// # Errors
    /// `NotRunning` if no session was started, `TaskJoinFailed` if the tick
    /// task panicked.
    pub async fn wait(&mut self) -> RunnerResult<Option<SessionReport>> {
        let handle = self.task_handle.take().ok_or(RunnerError::NotRunning)?;
        handle.await.map_err(|e| RunnerError::TaskJoinFailed(e.to_string()))?
    }

    /// Start a session and wait for its report.
    ///
    /// # Errors
    /// Everything [`start`](Self::start) returns, plus `Cancelled` when the
    /// shutdown token fires first.
    pub async fn run(
        &mut self,
        session: SessionConfig,
        on_verdict: VerdictCallback,
    ) -> RunnerResult<SessionReport> {
        self.start(session, on_verdict)?;
        self.wait().await?.ok_or(RunnerError::Cancelled)
    }

    /// Cancel the running session and wait for the tick task to exit.
    ///
    /// No verdict is reported for a cancelled session, and the sampler has
    /// been unsubscribed by the time this returns.
    ///
    /// # Errors
    /// `NotRunning` if nothing is running, `Timeout` if the task did not exit
    /// within the join timeout (it is aborted in that case).
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> RunnerResult<()> {
        let Some(mut handle) = self.task_handle.take() else {
            return Err(RunnerError::NotRunning);
        };

        info!("Stopping session runner");
        self.cancellation_token.cancel();

        let join_timeout = self.config.join_timeout;
        match tokio::time::timeout(join_timeout, &mut handle).await {
            Ok(joined) => {
                let outcome = joined.map_err(|e| RunnerError::TaskJoinFailed(e.to_string()))??;
                if let Some(report) = outcome {
                    debug!(phase = %report.verdict.phase, "session finished before stop");
                }
            }
            Err(_) => {
                handle.abort();
                return Err(RunnerError::Timeout { duration: join_timeout });
            }
        }

        self.progress.send_replace(SessionProgress::idle());
        info!("Session runner stopped");
        Ok(())
    }

    /// Whether a tick task is alive.
    pub fn is_running(&self) -> bool {
        self.task_handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Subscribe to per-tick progress updates.
    pub fn progress(&self) -> watch::Receiver<SessionProgress> {
        self.progress.subscribe()
    }

    /// Token that cancels the current and future sessions.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    async fn tick_loop(
        mut timer: SessionTimer,
        sampler: Arc<MotionSampler>,
        mode: SamplerMode,
        mut ticker: Ticker,
        progress: watch::Sender<SessionProgress>,
    ) -> RunnerResult<Option<SessionReport>> {
        let _teardown = StopSampler(sampler);

        while ticker.tick().await.is_some() {
            match timer.on_tick()? {
                TickOutcome::Continue { still, .. } => {
                    progress.send_replace(SessionProgress::from_state(timer.state(), still));
                }
                TickOutcome::Finished(verdict) => {
                    let still = timer.state().tick_log.last().map_or(true, |r| r.still);
                    progress.send_replace(SessionProgress::from_state(timer.state(), still));
                    return Ok(Some(SessionReport {
                        verdict,
                        state: timer.into_state(),
                        sampler_mode: mode,
                    }));
                }
            }
        }

        info!(
            remaining_seconds = timer.state().remaining_seconds,
            "session cancelled before verdict"
        );
        Ok(None)
    }
}

/// Stops the sampler when the tick loop exits, however it exits.
struct StopSampler(Arc<MotionSampler>);

impl Drop for StopSampler {
    fn drop(&mut self) {
        self.0.stop();
    }
}

/// Ensure the tick task is cancelled when the runner is dropped
impl Drop for SessionRunner {
    fn drop(&mut self) {
        if self.is_running() && !self.cancellation_token.is_cancelled() {
            warn!("SessionRunner dropped while running; cancelling");
            self.cancellation_token.cancel();
        }
    }
}
