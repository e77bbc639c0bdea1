//! # StillMint Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The stillness sampler and the session countdown state machine
//! - Port/adapter interfaces (traits) for sensors, rewards and persistence
//! - Use cases and services
//!
//! ## Architecture Principles
//! - Only depends on `stillmint-common` and `stillmint-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod errors;
pub mod motion;
pub mod rewards;
pub mod session;
pub mod user;

// Re-export specific items to avoid ambiguity
pub use errors::SessionError;
pub use motion::ports::{MotionSensor, SampleListener, StillnessView};
pub use motion::{MotionSampler, SamplerMode};
pub use rewards::ports::{RewardIssuer, SessionRepository};
pub use rewards::{MeditationService, RewardOutcome};
pub use session::{SessionTimer, TickOutcome, VerdictCallback};
pub use user::ports::{StoredCredentials, UserProfileRepository};
pub use user::UserService;
