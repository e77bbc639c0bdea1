//! In-process motion feed
//!
//! Whoever owns the sensor pushes samples with [`BroadcastMotionSensor::emit`];
//! every live subscriber receives them in subscription order.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use stillmint_common::Subscription;
use stillmint_core::{MotionSensor, SampleListener, SessionError};
use stillmint_domain::MotionSample;
use tracing::trace;

#[derive(Default)]
struct Registry {
    listeners: Vec<(u64, SampleListener)>,
    next_id: u64,
    interval: Option<Duration>,
}

/// Fan-out motion sensor. Clones share the same subscriber list.
#[derive(Clone, Default)]
pub struct BroadcastMotionSensor {
    registry: Arc<Mutex<Registry>>,
}

impl BroadcastMotionSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `sample` to every current subscriber. Returns how many
    /// listeners were called.
    pub fn emit(&self, sample: MotionSample) -> usize {
        // Listeners run outside the lock so they may (un)subscribe.
        let listeners: Vec<SampleListener> =
            self.registry.lock().listeners.iter().map(|(_, l)| Arc::clone(l)).collect();

        trace!(subscribers = listeners.len(), magnitude = sample.magnitude(), "motion sample");
        for listener in &listeners {
            listener(sample);
        }
        listeners.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().listeners.len()
    }

    /// Last interval requested by a consumer, if any.
    pub fn requested_interval(&self) -> Option<Duration> {
        self.registry.lock().interval
    }
}

impl MotionSensor for BroadcastMotionSensor {
    fn set_update_interval(&self, interval: Duration) {
        self.registry.lock().interval = Some(interval);
    }

    fn subscribe(&self, listener: SampleListener) -> Result<Subscription, SessionError> {
        let id = {
            let mut registry = self.registry.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.listeners.push((id, listener));
            id
        };

        let registry = Arc::clone(&self.registry);
        Ok(Subscription::new("broadcast-motion", move || {
            registry.lock().listeners.retain(|(other, _)| *other != id);
        }))
    }
}
