//! Command layer
//!
//! Each command wraps a service call with timing and structured logging.
//! Commands return domain results; rendering is left to the caller.

pub mod history;
pub mod meditate;
pub mod user;

pub use history::{get_balance, get_session_history, BalanceView};
pub use meditate::{
    meditate, meditate_with_sensor, open_sensor, MeditateRequest, MeditationSummary, ProgressFn,
    SensorSource,
};
pub use user::{get_user_profile, login_user, register_user, RegisterRequest};
