//! Session countdown state machine.

pub mod timer;

pub use timer::{SessionTimer, TickOutcome, VerdictCallback};
