//! # StillMint Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite persistence for profiles, sessions and the local reward ledger
//! - Motion sensor adapters (in-process broadcast, trace replay, unavailable)
//! - The async session runner that drives a timer from a ticker
//! - Configuration loading from environment and files
//!
//! ## Architecture
//! - Implements traits defined in `stillmint-core`
//! - Contains all "impure" code (I/O, runtime tasks)

pub mod config;
pub mod database;
pub mod errors;
pub mod scheduling;
pub mod sensors;

pub use database::{
    DbManager, LocalLedgerRewardIssuer, SqliteSessionRepository, SqliteUserProfileRepository,
};
pub use errors::InfraError;
pub use scheduling::{RunnerError, SessionReport, SessionRunner, SessionRunnerConfig};
pub use sensors::{BroadcastMotionSensor, ReplayMotionSensor, UnavailableMotionSensor};
