//! Domain types and models

pub mod history;
pub mod motion;
pub mod reward;
pub mod session;
pub mod user;

pub use history::SessionRecord;
pub use motion::{classify, MotionClass, MotionSample, StillnessState};
pub use reward::{RewardReceipt, TokenAmount};
pub use session::{SessionConfig, SessionPhase, SessionState, SessionVerdict, TickRecord};
pub use user::{UserProfile, WalletAddress};
