//! Session history repository implementation using SQLite

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Row};
use stillmint_core::rewards::ports::SessionRepository as SessionRepositoryPort;
use stillmint_domain::{Result as DomainResult, SessionRecord, StillMintError};
use tokio::task;
use tracing::debug;

use super::manager::DbManager;
use super::{from_millis, to_millis};
use crate::errors::conversions::to_domain;

/// SQLite-backed implementation of `SessionRepository`
pub struct SqliteSessionRepository {
    db: Arc<DbManager>,
}

impl SqliteSessionRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionRepositoryPort for SqliteSessionRepository {
    async fn save_session(&self, record: SessionRecord) -> DomainResult<()> {
        let reward_tokens = i64::try_from(record.reward_tokens).map_err(|_| {
            StillMintError::InvalidInput(format!(
                "session {} reward of {} tokens exceeds the storable range",
                record.id, record.reward_tokens
            ))
        })?;
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO sessions (
                    id, user_id, recorded_at, duration_minutes, reward_tokens,
                    violation_count, tx_id
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    &record.id,
                    &record.user_id,
                    to_millis(record.recorded_at),
                    record.duration_minutes,
                    reward_tokens,
                    record.violation_count,
                    &record.tx_id,
                ],
            )
            .map_err(to_domain)?;
            debug!(session_id = %record.id, user_id = %record.user_id, "session record saved");
            Ok(())
        })
        .await
        .map_err(to_domain)?
    }

    async fn sessions_for_user(&self, user_id: &str) -> DomainResult<Vec<SessionRecord>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<SessionRecord>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, user_id, recorded_at, duration_minutes, reward_tokens,
                            violation_count, tx_id
                     FROM sessions
                     WHERE user_id = ?1
                     ORDER BY recorded_at DESC, id DESC",
                )
                .map_err(to_domain)?;

            let rows = stmt.query_map(params![&user_id], map_session_row).map_err(to_domain)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(to_domain)
        })
        .await
        .map_err(to_domain)?
    }
}

fn map_session_row(row: &Row<'_>) -> rusqlite::Result<SessionRecord> {
    let reward_tokens: i64 = row.get(4)?;
    Ok(SessionRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        recorded_at: from_millis(row.get(2)?, 2)?,
        duration_minutes: row.get(3)?,
        reward_tokens: u64::try_from(reward_tokens)
            .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(4, reward_tokens))?,
        violation_count: row.get(5)?,
        tx_id: row.get(6)?,
    })
}
