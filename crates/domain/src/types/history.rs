//! Session history records
//!
//! One record per rewarded session; the live `SessionState` is discarded once
//! its verdict is handled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::session::SessionVerdict;

/// Persisted summary of a completed, rewarded session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String, // UUIDv7
    pub user_id: String,
    pub recorded_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub reward_tokens: u64,
    pub violation_count: u32,
    pub tx_id: String,
}

impl SessionRecord {
    pub fn from_verdict(
        user_id: impl Into<String>,
        verdict: &SessionVerdict,
        reward_tokens: u64,
        tx_id: impl Into<String>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            user_id: user_id.into(),
            recorded_at,
            duration_minutes: verdict.elapsed_seconds / 60,
            reward_tokens,
            violation_count: verdict.violation_count,
            tx_id: tx_id.into(),
        }
    }
}
