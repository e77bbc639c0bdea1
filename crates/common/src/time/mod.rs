//! Time utilities and abstractions
//!
//! - **[`clock`]**: real and mock wall clocks so timestamps are testable
//! - **[`ticker`]**: fixed-period, cancellable tick source (runtime tier)
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "foundation")]
//! # {
//! use chrono::Duration;
//! use stillmint_common::time::{Clock, MockClock};
//!
//! let clock = MockClock::new();
//! let start = clock.now_utc();
//! clock.advance(Duration::seconds(300));
//! assert_eq!((clock.now_utc() - start).num_seconds(), 300);
//! # }
//! ```

pub mod clock;
#[cfg(feature = "runtime")]
pub mod ticker;

pub use clock::{Clock, MockClock, SystemClock};
