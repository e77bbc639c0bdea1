//! Application context - dependency injection container

use std::fs;
use std::path::Path;
use std::sync::Arc;

use stillmint_common::{Clock, SystemClock};
use stillmint_core::rewards::ports::SessionRepository as SessionRepositoryPort;
use stillmint_core::user::ports::UserProfileRepository as UserProfileRepositoryPort;
use stillmint_core::{MeditationService, MotionSensor, RewardIssuer, UserService};
use stillmint_domain::{Config, Result, StillMintError};
use stillmint_infra::scheduling::{SessionRunner, SessionRunnerConfig};
use stillmint_infra::{
    DbManager, LocalLedgerRewardIssuer, SqliteSessionRepository, SqliteUserProfileRepository,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::utils::health::{ComponentHealth, HealthStatus};

/// Type alias for user profile repository port trait object
type DynUserProfileRepositoryPort = dyn UserProfileRepositoryPort;

/// Type alias for session repository port trait object
type DynSessionRepositoryPort = dyn SessionRepositoryPort;

/// Type alias for reward issuer port trait object
type DynRewardIssuerPort = dyn RewardIssuer;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub clock: Arc<dyn Clock>,

    // Repositories
    pub user_profiles: Arc<DynUserProfileRepositoryPort>,
    pub sessions: Arc<DynSessionRepositoryPort>,
    pub rewards: Arc<DynRewardIssuerPort>,

    // Services
    pub users: Arc<UserService>,
    pub meditation: Arc<MeditationService>,

    shutdown: CancellationToken,
}

impl AppContext {
    /// Create a context from the environment or a probed config file,
    /// falling back to defaults.
    pub async fn new() -> Result<Self> {
        let config = stillmint_infra::config::load_or_default()?;
        Self::new_with_config(config).await
    }

    /// Create a context with a custom configuration
    ///
    /// Tests use this to point at a temporary database.
    pub async fn new_with_config(config: Config) -> Result<Self> {
        Self::new_with_clock(config, Arc::new(SystemClock)).await
    }

    /// Create a context with a custom configuration and clock.
    pub async fn new_with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self> {
        validate(&config)?;
        ensure_parent_dir(Path::new(&config.database.path))?;

        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let user_profiles: Arc<DynUserProfileRepositoryPort> =
            Arc::new(SqliteUserProfileRepository::new(Arc::clone(&db)));
        let sessions: Arc<DynSessionRepositoryPort> =
            Arc::new(SqliteSessionRepository::new(Arc::clone(&db)));
        let rewards: Arc<DynRewardIssuerPort> =
            Arc::new(LocalLedgerRewardIssuer::new(Arc::clone(&db), Arc::clone(&clock)));

        let users = Arc::new(UserService::new(Arc::clone(&user_profiles), Arc::clone(&clock)));
        let meditation = Arc::new(MeditationService::new(
            Arc::clone(&rewards),
            Arc::clone(&sessions),
            Arc::clone(&user_profiles),
            Arc::clone(&clock),
            config.reward.tokens_per_session,
        ));

        info!(
            db_path = %config.database.path,
            session_seconds = config.session.total_seconds,
            violation_limit = config.session.violation_limit,
            "StillMint context initialised"
        );

        Ok(Self {
            config,
            db,
            clock,
            user_profiles,
            sessions,
            rewards,
            users,
            meditation,
            shutdown: CancellationToken::new(),
        })
    }

    /// Build a session runner for `sensor` using the configured timing.
    ///
    /// The runner is tied to the context's shutdown token, so
    /// [`shutdown`](Self::shutdown) cancels any session it is driving.
    pub fn session_runner(&self, sensor: Arc<dyn MotionSensor>) -> SessionRunner {
        SessionRunner::new(
            sensor,
            self.config.sensor.clone(),
            SessionRunnerConfig::from_settings(&self.config.session),
        )
        .with_shutdown_token(self.shutdown.clone())
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Check health of all application components
    pub async fn health_check(&self) -> HealthStatus {
        let mut status = HealthStatus::new().add_component(self.check_database_health().await);

        let shutdown = if self.shutdown.is_cancelled() {
            ComponentHealth::unhealthy("runtime", "shutdown requested")
        } else {
            ComponentHealth::healthy("runtime")
        };
        status = status.add_component(shutdown);

        status.calculate_score();
        status
    }

    async fn check_database_health(&self) -> ComponentHealth {
        let db = Arc::clone(&self.db);
        match tokio::task::spawn_blocking(move || db.health_check()).await {
            Ok(Ok(())) => ComponentHealth::healthy("database"),
            Ok(Err(e)) => {
                warn!(error = %e, "database health check failed");
                ComponentHealth::unhealthy("database", format!("query failed: {e}"))
            }
            Err(e) => {
                error!(error = %e, "database health check task panicked");
                ComponentHealth::unhealthy("database", format!("task panic: {e}"))
            }
        }
    }

    /// Cancel any running session. Idempotent.
    ///
    /// Everything else is released when the context is dropped.
    pub async fn shutdown(&self) -> Result<()> {
        if !self.shutdown.is_cancelled() {
            info!("shutdown called on AppContext");
            self.shutdown.cancel();
        }
        Ok(())
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.database.path.trim().is_empty() {
        return Err(StillMintError::Config("database.path must not be empty".into()));
    }
    if config.session.tick_interval_ms == 0 {
        return Err(StillMintError::Config("session.tick_interval_ms must be positive".into()));
    }
    if config.sensor.interval_ms == 0 {
        return Err(StillMintError::Config("sensor.interval_ms must be positive".into()));
    }
    if !(config.sensor.stillness_threshold.is_finite() && config.sensor.stillness_threshold > 0.0)
    {
        return Err(StillMintError::Config(format!(
            "sensor.stillness_threshold must be a positive number, got {}",
            config.sensor.stillness_threshold
        )));
    }
    if config.reward.tokens_per_session == 0 {
        return Err(StillMintError::Config("reward.tokens_per_session must be positive".into()));
    }
    if i64::try_from(config.reward.tokens_per_session).is_err() {
        return Err(StillMintError::Config(format!(
            "reward.tokens_per_session must fit the ledger, got {}",
            config.reward.tokens_per_session
        )));
    }
    Ok(())
}

fn ensure_parent_dir(db_path: &Path) -> Result<()> {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|err| {
                StillMintError::Config(format!(
                    "failed to create database directory {}: {err}",
                    parent.display()
                ))
            }),
        _ => Ok(()),
    }
}
