#![allow(dead_code)]

use std::path::PathBuf;

use stillmint_domain::{Config, DatabaseConfig, SensorConfig, SessionSettings};
use stillmint_lib::commands::RegisterRequest;
use stillmint_lib::AppContext;
use tempfile::TempDir;

pub const WALLET: &str = "0x52908400098527886E0F7030069857D2E4169EE7";
pub const PASSWORD: &str = "sit-still-42";

pub fn register_request(id: &str, email: &str, wallet: &str) -> RegisterRequest {
    RegisterRequest {
        id: id.into(),
        email: email.into(),
        wallet: wallet.into(),
        password: PASSWORD.into(),
    }
}

/// AppContext over a temporary database. Keep the struct alive for the
/// duration of the test.
pub struct TestApp {
    pub ctx: AppContext,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn db_path(&self) -> PathBuf {
        self.temp_dir.path().join("data").join("stillmint.db")
    }

    /// Write a JSON-lines trace into the temp dir and return its path.
    pub fn write_trace(&self, name: &str, lines: &[&str]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, lines.join("\n")).expect("trace written");
        path
    }
}

/// Five-second sessions with a limit of two. Samples arrive every 400ms so a
/// fresh reading always precedes each one-second tick.
pub fn test_config(temp_dir: &TempDir) -> Config {
    Config {
        database: DatabaseConfig {
            path: temp_dir.path().join("data").join("stillmint.db").to_string_lossy().to_string(),
            pool_size: 2,
        },
        session: SessionSettings { total_seconds: 5, violation_limit: 2, tick_interval_ms: 1000 },
        sensor: SensorConfig { interval_ms: 400, ..SensorConfig::default() },
        ..Config::default()
    }
}

pub async fn test_app() -> TestApp {
    let temp_dir = TempDir::new().expect("temp dir created");
    let ctx = AppContext::new_with_config(test_config(&temp_dir)).await.expect("context created");
    TestApp { ctx, temp_dir }
}
