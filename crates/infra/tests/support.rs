#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use stillmint_common::MockClock;
use stillmint_infra::database::DbManager;
use tempfile::TempDir;

pub const WALLET: &str = "0x52908400098527886E0F7030069857D2E4169EE7";
pub const OTHER_WALLET: &str = "0xde709f2102306220921060314715629080e2fb77";
pub const PASSWORD: &str = "sit-still-42";

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a new temporary database with the schema applied.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("stillmint-test.db");

        let manager = DbManager::new(&db_path, 4).expect("db manager should be created");
        manager.run_migrations().expect("schema migrations should apply");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    pub fn count(&self, table: &str) -> i64 {
        let conn = self.manager.get_connection().expect("connection should be available");
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .expect("count query should succeed")
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// Clock pinned to a fixed morning so stored timestamps are predictable.
pub fn morning_clock() -> Arc<MockClock> {
    Arc::new(MockClock::at(
        Utc.with_ymd_and_hms(2025, 3, 1, 7, 0, 0).single().expect("valid timestamp"),
    ))
}
