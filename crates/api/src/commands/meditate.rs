//! Meditation session command
//!
//! Runs one timed session against the chosen motion source and settles the
//! verdict: a completed session mints the reward and lands in the history,
//! a disqualified one is reported without a reward.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use stillmint_core::{MotionSensor, RewardOutcome, SamplerMode};
use stillmint_domain::{
    MotionSample, Result as DomainResult, RewardReceipt, SessionConfig, SessionRecord,
    SessionVerdict, StillMintError,
};
use stillmint_infra::scheduling::SessionProgress;
use stillmint_infra::sensors::{BroadcastMotionSensor, ReplayMotionSensor, UnavailableMotionSensor};
use tracing::{debug, info, warn};

use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

/// Where motion samples come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SensorSource {
    /// Recorded JSON-lines trace.
    Trace { path: PathBuf, looping: bool },
    /// JSON-lines samples read from standard input as they arrive.
    Stdin,
    /// No accelerometer; the session runs fail-open.
    #[default]
    Unavailable,
}

/// Input for [`meditate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeditateRequest {
    pub user_id: String,
    pub source: SensorSource,
    /// Overrides the configured session length.
    pub total_seconds: Option<u32>,
    /// Overrides the configured violation limit.
    pub violation_limit: Option<u32>,
}

impl MeditateRequest {
    pub fn new(user_id: impl Into<String>, source: SensorSource) -> Self {
        Self { user_id: user_id.into(), source, total_seconds: None, violation_limit: None }
    }

    fn session_config(&self, ctx: &AppContext) -> SessionConfig {
        let defaults = ctx.config.session.session_config();
        SessionConfig::new(
            self.total_seconds.unwrap_or(defaults.total_seconds),
            self.violation_limit.unwrap_or(defaults.violation_limit),
        )
    }
}

/// What a finished session produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeditationSummary {
    pub user_id: String,
    pub verdict: SessionVerdict,
    /// True when no accelerometer was available and every tick counted as still.
    pub fail_open: bool,
    pub receipt: Option<RewardReceipt>,
    pub record: Option<SessionRecord>,
}

/// Called with every progress update while the session runs.
pub type ProgressFn = Box<dyn Fn(SessionProgress) + Send + 'static>;

/// Run a session for `request.user_id` and settle its verdict.
///
/// # Errors
/// - `NotFound` if the user is not registered (checked before the session starts)
/// - `InvalidInput` if the trace cannot be loaded
/// - `Config` for a zero session length or violation limit
/// - `InvalidState` if the session was cancelled through the context's
///   shutdown token
pub async fn meditate(
    ctx: &AppContext,
    request: MeditateRequest,
    on_progress: Option<ProgressFn>,
) -> DomainResult<MeditationSummary> {
    let sensor = open_sensor(&request.source)?;
    meditate_with_sensor(ctx, request, sensor, on_progress).await
}

/// Like [`meditate`], with the motion sensor supplied by the caller.
pub async fn meditate_with_sensor(
    ctx: &AppContext,
    request: MeditateRequest,
    sensor: Arc<dyn MotionSensor>,
    on_progress: Option<ProgressFn>,
) -> DomainResult<MeditationSummary> {
    let command_name = "meditate";
    let start = Instant::now();
    info!(command = command_name, user_id = %request.user_id, "Executing meditate");

    let result = run_session(ctx, &request, sensor, on_progress).await;

    log_command_execution(command_name, start.elapsed(), &result);
    result
}

async fn run_session(
    ctx: &AppContext,
    request: &MeditateRequest,
    sensor: Arc<dyn MotionSensor>,
    on_progress: Option<ProgressFn>,
) -> DomainResult<MeditationSummary> {
    ctx.users.profile(&request.user_id).await?;
    let session = request.session_config(ctx);

    let mut runner = ctx.session_runner(sensor);
    let watcher = on_progress.map(|callback| {
        let mut updates = runner.progress();
        tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let progress = *updates.borrow_and_update();
                callback(progress);
            }
        })
    });

    let user_id = request.user_id.clone();
    let outcome = runner
        .run(
            session,
            Box::new(move |verdict| {
                debug!(user_id = %user_id, phase = %verdict.phase, "verdict delivered");
            }),
        )
        .await;

    // Dropping the runner closes the progress channel so the watcher drains
    // the final update and exits.
    drop(runner);
    if let Some(watcher) = watcher {
        if let Err(err) = watcher.await {
            warn!(error = %err, "progress watcher failed");
        }
    }

    let report = outcome?;
    let fail_open = report.sampler_mode == SamplerMode::FailOpen;

    let settled = ctx.meditation.complete_session(&request.user_id, report.verdict).await?;
    let (receipt, record) = match settled {
        RewardOutcome::Granted { receipt, record } => (Some(receipt), Some(record)),
        RewardOutcome::Withheld { .. } => (None, None),
    };

    Ok(MeditationSummary {
        user_id: request.user_id.clone(),
        verdict: report.verdict,
        fail_open,
        receipt,
        record,
    })
}

/// Build the motion sensor for `source`.
///
/// # Errors
/// `InvalidInput` if a trace cannot be read, `Sensor` if the stdin reader
/// thread cannot be started.
pub fn open_sensor(source: &SensorSource) -> DomainResult<Arc<dyn MotionSensor>> {
    match source {
        SensorSource::Trace { path, looping } => {
            let sensor = ReplayMotionSensor::from_path(path)?.with_looping(*looping);
            if sensor.is_empty() {
                warn!(path = %path.display(), "motion trace is empty; every tick reads the initial state");
            }
            Ok(Arc::new(sensor))
        }
        SensorSource::Stdin => {
            let sensor = BroadcastMotionSensor::new();
            spawn_stdin_feed(sensor.clone())?;
            Ok(Arc::new(sensor))
        }
        SensorSource::Unavailable => {
            Ok(Arc::new(UnavailableMotionSensor::new("no accelerometer configured")))
        }
    }
}

/// Pump JSON-lines samples from stdin into `sensor` on a detached thread.
///
/// Runtime shutdown waits on blocking tasks, so this must not be one.
fn spawn_stdin_feed(sensor: BroadcastMotionSensor) -> DomainResult<()> {
    std::thread::Builder::new()
        .name("stillmint-stdin-feed".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for (index, line) in stdin.lock().lines().enumerate() {
                let Ok(line) = line else { break };
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
                match serde_json::from_str::<MotionSample>(trimmed) {
                    Ok(sample) => {
                        sensor.emit(sample);
                    }
                    Err(err) => warn!(line = index + 1, error = %err, "skipping malformed sample"),
                }
            }
            debug!("stdin motion feed closed");
        })
        .map(|_| ())
        .map_err(|err| StillMintError::Sensor(format!("failed to start stdin reader: {err}")))
}
