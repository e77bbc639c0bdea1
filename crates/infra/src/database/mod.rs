//! Database implementations

use chrono::{DateTime, Utc};

pub mod manager;
pub mod reward_ledger;
pub mod session_repository;
pub mod user_profile_repository;

pub use manager::*;
pub use reward_ledger::*;
pub use session_repository::*;
pub use user_profile_repository::*;

/// Timestamps are stored as Unix milliseconds.
pub(crate) fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

pub(crate) fn from_millis(millis: i64, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        rusqlite::Error::IntegralValueOutOfRange(column, millis)
    })
}
