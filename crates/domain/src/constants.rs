//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Stillness classification
pub const STILLNESS_THRESHOLD: f64 = 0.3;
pub const SAMPLE_INTERVAL_MS: u64 = 1000;

// Session defaults
pub const DEFAULT_SESSION_SECONDS: u32 = 300;
pub const DEFAULT_VIOLATION_LIMIT: u32 = 3;
pub const TICK_INTERVAL_MS: u64 = 1000;

// Reward token
pub const REWARD_TOKENS_PER_SESSION: u64 = 10;
pub const TOKEN_DECIMALS: u32 = 18;
pub const TOKEN_SYMBOL: &str = "X1T";
pub const DISPLAY_FRACTION_DIGITS: u32 = 2;

// Persistence
pub const DEFAULT_DB_PATH: &str = "stillmint.db";
pub const DEFAULT_DB_POOL_SIZE: u32 = 4;
