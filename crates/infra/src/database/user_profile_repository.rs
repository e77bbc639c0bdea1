//! User profile repository implementation using SQLite

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use stillmint_core::user::ports::{
    StoredCredentials, UserProfileRepository as UserProfileRepositoryPort,
};
use stillmint_domain::{Result as DomainResult, UserProfile, WalletAddress};
use tokio::task;

use super::manager::DbManager;
use super::{from_millis, to_millis};
use crate::errors::conversions::to_domain;

/// SQLite-backed implementation of `UserProfileRepository`
pub struct SqliteUserProfileRepository {
    db: Arc<DbManager>,
}

impl SqliteUserProfileRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserProfileRepositoryPort for SqliteUserProfileRepository {
    async fn get_by_id(&self, id: &str) -> DomainResult<Option<UserProfile>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<UserProfile>> {
            let conn = db.get_connection()?;

            conn.query_row(
                "SELECT id, email, wallet_address, created_at FROM users WHERE id = ?1",
                params![&id],
                map_user_profile_row,
            )
            .optional()
            .map_err(to_domain)
        })
        .await
        .map_err(to_domain)?
    }

    async fn get_credentials_by_email(&self, email: &str) -> DomainResult<Option<StoredCredentials>> {
        let db = Arc::clone(&self.db);
        let email = email.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<StoredCredentials>> {
            let conn = db.get_connection()?;

            conn.query_row(
                "SELECT id, email, wallet_address, created_at, password_hash
                 FROM users
                 WHERE email = ?1 COLLATE NOCASE
                 ORDER BY created_at
                 LIMIT 1",
                params![&email],
                |row| {
                    Ok(StoredCredentials {
                        profile: map_user_profile_row(row)?,
                        password_hash: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(to_domain)
        })
        .await
        .map_err(to_domain)?
    }

    async fn create(&self, profile: UserProfile, password_hash: String) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO users (id, email, wallet_address, created_at, password_hash)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    &profile.id,
                    &profile.email,
                    profile.wallet_address.as_str(),
                    to_millis(profile.created_at),
                    &password_hash,
                ],
            )
            .map_err(to_domain)?;
            Ok(())
        })
        .await
        .map_err(to_domain)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Map a row to a UserProfile
fn map_user_profile_row(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    let wallet: String = row.get(2)?;
    let wallet_address = WalletAddress::parse(&wallet).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, err.to_string())),
        )
    })?;
    let created_at: DateTime<Utc> = from_millis(row.get(3)?, 3)?;

    Ok(UserProfile { id: row.get(0)?, email: row.get(1)?, wallet_address, created_at })
}
