//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `STILLMINT_DB_PATH` is unset, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `STILLMINT_DB_PATH`: Database file path (required for env loading)
//! - `STILLMINT_DB_POOL_SIZE`: Connection pool size
//! - `STILLMINT_SESSION_SECONDS`: Session length in seconds
//! - `STILLMINT_VIOLATION_LIMIT`: Violations that disqualify a session
//! - `STILLMINT_TICK_INTERVAL_MS`: Countdown tick period
//! - `STILLMINT_SENSOR_INTERVAL_MS`: Accelerometer sample period
//! - `STILLMINT_STILLNESS_THRESHOLD`: Magnitude below which a sample is still
//! - `STILLMINT_REWARD_TOKENS`: Whole tokens minted per completed session
//! - `STILLMINT_LOG_LEVEL`: Default log filter
//!
//! Optional variables fall back to the built-in defaults.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./stillmint.json` or `./stillmint.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use stillmint_domain::{
    Config, DatabaseConfig, Result, RewardConfig, SensorConfig, SessionSettings, StillMintError,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variable is missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `StillMintError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - An environment variable has an invalid value
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Like [`load`], but falls back to [`Config::default`] when no source is
/// available.
///
/// Malformed files and invalid environment values are still reported.
///
/// # Errors
/// Returns `StillMintError::Config` for invalid values or unreadable files.
pub fn load_or_default() -> Result<Config> {
    if std::env::var_os("STILLMINT_DB_PATH").is_some() {
        return load_from_env();
    }
    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::warn!("No configuration found; using built-in defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration from environment variables
///
/// `STILLMINT_DB_PATH` must be present; every other variable is optional.
///
/// # Errors
/// Returns `StillMintError::Config` if the database path is missing or a
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let defaults = Config::default();

    let db_path = env_var("STILLMINT_DB_PATH")?;
    let pool_size = env_parse("STILLMINT_DB_POOL_SIZE", defaults.database.pool_size)?;

    let session = SessionSettings {
        total_seconds: env_parse("STILLMINT_SESSION_SECONDS", defaults.session.total_seconds)?,
        violation_limit: env_parse(
            "STILLMINT_VIOLATION_LIMIT",
            defaults.session.violation_limit,
        )?,
        tick_interval_ms: env_parse(
            "STILLMINT_TICK_INTERVAL_MS",
            defaults.session.tick_interval_ms,
        )?,
    };

    let sensor = SensorConfig {
        interval_ms: env_parse("STILLMINT_SENSOR_INTERVAL_MS", defaults.sensor.interval_ms)?,
        stillness_threshold: env_parse(
            "STILLMINT_STILLNESS_THRESHOLD",
            defaults.sensor.stillness_threshold,
        )?,
    };

    let reward = RewardConfig {
        tokens_per_session: env_parse(
            "STILLMINT_REWARD_TOKENS",
            defaults.reward.tokens_per_session,
        )?,
    };

    let log_level = std::env::var("STILLMINT_LOG_LEVEL").unwrap_or(defaults.log_level);

    Ok(Config {
        database: DatabaseConfig { path: db_path, pool_size },
        session,
        sensor,
        reward,
        log_level,
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `StillMintError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(StillMintError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            StillMintError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| StillMintError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `StillMintError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| StillMintError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| StillMintError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(StillMintError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 6] = [
        "config.json",
        "config.toml",
        "stillmint.json",
        "stillmint.toml",
        "../config.json",
        "../config.toml",
    ];

    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(NAMES.iter().map(|name| cwd.join(name)));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(NAMES.iter().map(|name| exe_dir.join(name)));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `StillMintError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        StillMintError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional environment variable, using `default` when unset.
///
/// # Errors
/// Returns `StillMintError::Config` if the variable is set but does not parse.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| StillMintError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}
