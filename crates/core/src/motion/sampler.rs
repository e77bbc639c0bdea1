//! Stillness sampler
//!
//! Subscribes to a [`MotionSensor`] and keeps the latest [`StillnessState`].
//! Each sample replaces the classification outright: magnitude below the
//! threshold is still, anything else is moving. There is no smoothing, so a
//! single jittery sample flips the state.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use stillmint_common::Subscription;
use stillmint_domain::{MotionSample, SensorConfig, StillnessState};
use tracing::{debug, info, warn};

use super::ports::{MotionSensor, SampleListener, StillnessView};
use crate::errors::SessionError;

/// How the sampler ended up running after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerMode {
    /// Receiving samples from the sensor.
    Live,
    /// Sensor unavailable; reporting `still = true` until stopped.
    FailOpen,
}

struct SamplerInner {
    stillness: StillnessState,
    accepting: bool,
}

/// Tracks the latest stillness classification from a motion feed.
pub struct MotionSampler {
    threshold: f64,
    interval: Duration,
    inner: Arc<RwLock<SamplerInner>>,
    subscription: Mutex<Option<Subscription>>,
}

impl MotionSampler {
    /// Create a sampler with an explicit threshold and sample period.
    pub fn new(threshold: f64, interval: Duration) -> Self {
        let interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        Self {
            threshold,
            interval,
            inner: Arc::new(RwLock::new(SamplerInner {
                stillness: StillnessState::initial(threshold, interval_ms),
                accepting: false,
            })),
            subscription: Mutex::new(None),
        }
    }

    pub fn from_config(config: &SensorConfig) -> Self {
        Self::new(config.stillness_threshold, config.interval())
    }

    /// Begin sampling from `sensor`.
    ///
    /// The exposed state is reset to "still, no data yet". If the sensor
    /// cannot be opened the sampler fails open and still returns `Ok`.
    ///
    /// # Errors
    /// `SessionError::AlreadyActive` if the sampler was already started.
    pub fn start(&self, sensor: &dyn MotionSensor) -> Result<SamplerMode, SessionError> {
        let mut slot = self.subscription.lock();
        if slot.is_some() {
            return Err(SessionError::AlreadyActive { component: "motion sampler" });
        }

        let interval_ms = self.interval_ms();
        {
            let mut inner = self.inner.write();
            inner.stillness = StillnessState::initial(self.threshold, interval_ms);
            inner.accepting = true;
        }

        sensor.set_update_interval(self.interval);

        let weak = Arc::downgrade(&self.inner);
        let listener: SampleListener = Arc::new(move |sample| {
            record(&weak, &sample);
        });

        match sensor.subscribe(listener) {
            Ok(subscription) => {
                *slot = Some(subscription);
                info!(interval_ms, threshold = self.threshold, "motion sampler started");
                Ok(SamplerMode::Live)
            }
            Err(err) => {
                {
                    let mut inner = self.inner.write();
                    inner.stillness = StillnessState::unavailable(self.threshold, interval_ms);
                    inner.accepting = false;
                }
                *slot = Some(Subscription::detached("motion-sampler-fail-open"));
                warn!(error = %err, "motion sensor unavailable; reporting still until stopped");
                Ok(SamplerMode::FailOpen)
            }
        }
    }

    /// Stop sampling.
    ///
    /// Idempotent. Once this returns no further sample can change the exposed
    /// state. Returns `true` if the sampler was running.
    pub fn stop(&self) -> bool {
        let Some(subscription) = self.subscription.lock().take() else {
            return false;
        };

        self.inner.write().accepting = false;
        subscription.unsubscribe();
        debug!("motion sampler stopped");
        true
    }

    /// Latest classification (default `still = true` before any sample).
    pub fn current_state(&self) -> StillnessState {
        self.inner.read().stillness
    }

    pub fn is_sampling(&self) -> bool {
        self.subscription.lock().is_some()
    }

    /// Feed one sample directly, as a sensor callback would.
    ///
    /// Returns `false` when the sampler is not accepting samples.
    pub fn record_sample(&self, sample: &MotionSample) -> bool {
        apply(&self.inner, sample)
    }

    fn interval_ms(&self) -> u64 {
        u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX)
    }
}

impl StillnessView for MotionSampler {
    fn current_state(&self) -> StillnessState {
        Self::current_state(self)
    }
}

impl Drop for MotionSampler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn record(inner: &Weak<RwLock<SamplerInner>>, sample: &MotionSample) {
    if let Some(inner) = inner.upgrade() {
        apply(&inner, sample);
    }
}

// The accepting check and the update share one write lock so `stop` cannot
// interleave between them.
fn apply(inner: &RwLock<SamplerInner>, sample: &MotionSample) -> bool {
    let mut guard = inner.write();
    if !guard.accepting {
        return false;
    }
    guard.stillness = guard.stillness.observe(sample);
    true
}
