//! Sensor for hosts without an accelerometer.

use std::time::Duration;

use stillmint_common::Subscription;
use stillmint_core::{MotionSensor, SampleListener, SessionError};

/// Always refuses subscriptions, which puts the sampler in fail-open mode.
#[derive(Debug, Clone)]
pub struct UnavailableMotionSensor {
    reason: String,
}

impl UnavailableMotionSensor {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl Default for UnavailableMotionSensor {
    fn default() -> Self {
        Self::new("no accelerometer on this host")
    }
}

impl MotionSensor for UnavailableMotionSensor {
    fn set_update_interval(&self, _interval: Duration) {}

    fn subscribe(&self, _listener: SampleListener) -> Result<Subscription, SessionError> {
        Err(SessionError::SensorUnavailable(self.reason.clone()))
    }
}
