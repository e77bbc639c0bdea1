//! Modular common utilities shared across StillMint crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: wall-clock abstraction ([`time::Clock`])
//! - `runtime`: async infrastructure (cancellable ticker, disposable
//!   subscriptions)
//! - `observability`: optional tracing (not included by default)
//! - `security`: Argon2 password hashing ([`crypto::password`])

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod time;

// Security tier
// -------------------------------------------------------------------
#[cfg(feature = "security")]
pub mod crypto;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod lifecycle;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use lifecycle::subscription::Subscription;
#[cfg(feature = "foundation")]
pub use time::{Clock, MockClock, SystemClock};
#[cfg(feature = "runtime")]
pub use time::ticker::{Ticker, TickerConfig};
