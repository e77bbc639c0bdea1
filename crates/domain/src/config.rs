//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DB_PATH, DEFAULT_DB_POOL_SIZE, DEFAULT_SESSION_SECONDS, DEFAULT_VIOLATION_LIMIT,
    REWARD_TOKENS_PER_SESSION, SAMPLE_INTERVAL_MS, STILLNESS_THRESHOLD, TICK_INTERVAL_MS,
};
use crate::types::SessionConfig;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub reward: RewardConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

/// Meditation session defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub total_seconds: u32,
    pub violation_limit: u32,
    pub tick_interval_ms: u64,
}

impl SessionSettings {
    /// Countdown tick period.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(self.total_seconds, self.violation_limit)
    }
}

/// Motion sensor sampling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub interval_ms: u64,
    pub stillness_threshold: f64,
}

impl SensorConfig {
    /// Sensor update period.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Reward issuance configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Whole tokens minted per completed session.
    pub tokens_per_session: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            session: SessionSettings::default(),
            sensor: SensorConfig::default(),
            reward: RewardConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: DEFAULT_DB_PATH.to_string(), pool_size: DEFAULT_DB_POOL_SIZE }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            total_seconds: DEFAULT_SESSION_SECONDS,
            violation_limit: DEFAULT_VIOLATION_LIMIT,
            tick_interval_ms: TICK_INTERVAL_MS,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self { interval_ms: SAMPLE_INTERVAL_MS, stillness_threshold: STILLNESS_THRESHOLD }
    }
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self { tokens_per_session: REWARD_TOKENS_PER_SESSION }
    }
}
