//! Port interfaces for motion sensing
//!
//! These traits define the boundaries between the stillness logic and the
//! sensor feeds that supply samples.

use std::sync::Arc;
use std::time::Duration;

use stillmint_common::Subscription;
use stillmint_domain::{MotionSample, StillnessState};

use crate::errors::SessionError;

/// Callback invoked for every delivered sample.
pub type SampleListener = Arc<dyn Fn(MotionSample) + Send + Sync>;

/// A periodic three-axis accelerometer feed.
pub trait MotionSensor: Send + Sync {
    /// Request a sample period. Feeds that cannot honour it may ignore it.
    fn set_update_interval(&self, interval: Duration);

    /// Register `listener`. Dropping or unsubscribing the returned handle
    /// must stop further deliveries to it.
    ///
    /// # Errors
    /// `SessionError::SensorUnavailable` when the feed cannot be opened.
    fn subscribe(&self, listener: SampleListener) -> Result<Subscription, SessionError>;
}

/// Read-only access to the latest stillness classification.
pub trait StillnessView: Send + Sync {
    fn current_state(&self) -> StillnessState;
}
