//! Session scheduling
//!
//! Drives a `SessionTimer` from a tokio tick source. Follows the same
//! lifecycle rules as every long-running task in this crate:
//! - Explicit lifecycle management (start/stop)
//! - Join handles for spawned tasks
//! - Cancellation token support
//! - Timeout wrapping on shutdown

pub mod error;
pub mod session_runner;

pub use error::{RunnerError, RunnerResult};
pub use session_runner::{SessionProgress, SessionReport, SessionRunner, SessionRunnerConfig};
