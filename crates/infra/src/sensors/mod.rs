//! Motion sensor adapters
//!
//! Implementations of [`stillmint_core::MotionSensor`] for in-process feeds,
//! recorded traces and devices without an accelerometer.

pub mod broadcast;
pub mod replay;
pub mod unavailable;

pub use broadcast::BroadcastMotionSensor;
pub use replay::ReplayMotionSensor;
pub use unavailable::UnavailableMotionSensor;
