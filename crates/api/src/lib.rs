//! # StillMint App
//!
//! Application layer - commands, CLI parsing and wiring.
//!
//! This crate contains:
//! - Commands (register, login, meditate, history, balance)
//! - Application context (dependency injection)
//! - Tracing setup and health checks
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - The `stillmint` binary is a thin shell over [`cli`] and [`commands`]

pub mod cli;
pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
