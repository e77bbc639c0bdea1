//! Motion sample and stillness classification types

use serde::{Deserialize, Serialize};

use crate::constants::{SAMPLE_INTERVAL_MS, STILLNESS_THRESHOLD};

/// One accelerometer reading in device units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Monotonic capture time, when the feed provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
}

impl MotionSample {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, timestamp_ms: None }
    }

    pub fn at(timestamp_ms: u64, x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, timestamp_ms: Some(timestamp_ms) }
    }

    /// Euclidean norm of the three components.
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Per-sample classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionClass {
    Still,
    Moving,
}

impl MotionClass {
    pub fn is_still(self) -> bool {
        matches!(self, Self::Still)
    }
}

/// Classify a magnitude against `threshold`.
///
/// Strict inequality: a magnitude equal to the threshold is `Moving`, and so
/// is NaN.
pub fn classify(magnitude: f64, threshold: f64) -> MotionClass {
    if magnitude < threshold {
        MotionClass::Still
    } else {
        MotionClass::Moving
    }
}

/// Latest stillness reading exposed by the sampler.
///
/// Before any sample arrives, and for the whole session when the sensor is
/// unavailable, `still` is `true`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StillnessState {
    pub still: bool,
    pub last_magnitude: Option<f64>,
    pub samples_observed: u64,
    pub sensor_available: bool,
    pub threshold: f64,
    pub interval_ms: u64,
}

impl StillnessState {
    /// "No data yet" state for a live sensor.
    pub fn initial(threshold: f64, interval_ms: u64) -> Self {
        Self {
            still: true,
            last_magnitude: None,
            samples_observed: 0,
            sensor_available: true,
            threshold,
            interval_ms,
        }
    }

    /// Fail-open state used when the sensor feed cannot be opened.
    pub fn unavailable(threshold: f64, interval_ms: u64) -> Self {
        Self { sensor_available: false, ..Self::initial(threshold, interval_ms) }
    }

    /// State after observing `sample`.
    pub fn observe(&self, sample: &MotionSample) -> Self {
        let magnitude = sample.magnitude();
        Self {
            still: classify(magnitude, self.threshold).is_still(),
            last_magnitude: Some(magnitude),
            samples_observed: self.samples_observed.saturating_add(1),
            ..*self
        }
    }

    pub fn class(&self) -> MotionClass {
        if self.still {
            MotionClass::Still
        } else {
            MotionClass::Moving
        }
    }
}

impl Default for StillnessState {
    fn default() -> Self {
        Self::initial(STILLNESS_THRESHOLD, SAMPLE_INTERVAL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_is_euclidean_norm() {
        let sample = MotionSample::new(0.3, 0.4, 0.0);
        assert!((sample.magnitude() - 0.5).abs() < 1e-12);

        let sample = MotionSample::new(-1.0, 2.0, -2.0);
        assert!((sample.magnitude() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn classify_uses_strict_inequality() {
        assert_eq!(classify(0.0, STILLNESS_THRESHOLD), MotionClass::Still);
        assert_eq!(classify(0.299_999, STILLNESS_THRESHOLD), MotionClass::Still);
        assert_eq!(classify(0.3, STILLNESS_THRESHOLD), MotionClass::Moving);
        assert_eq!(classify(0.300_001, STILLNESS_THRESHOLD), MotionClass::Moving);
        assert_eq!(classify(9.81, STILLNESS_THRESHOLD), MotionClass::Moving);
    }

    #[test]
    fn nan_magnitude_is_moving() {
        assert_eq!(classify(f64::NAN, STILLNESS_THRESHOLD), MotionClass::Moving);
    }

    #[test]
    fn default_state_is_still_without_data() {
        let state = StillnessState::default();
        assert!(state.still);
        assert!(state.sensor_available);
        assert_eq!(state.last_magnitude, None);
        assert_eq!(state.samples_observed, 0);
        assert_eq!(state.interval_ms, 1000);
    }

    #[test]
    fn observe_replaces_classification_without_smoothing() {
        let state = StillnessState::default()
            .observe(&MotionSample::new(0.0, 0.0, 0.1))
            .observe(&MotionSample::new(0.0, 0.0, 0.5));

        assert!(!state.still);
        assert_eq!(state.class(), MotionClass::Moving);
        assert_eq!(state.samples_observed, 2);

        let state = state.observe(&MotionSample::new(0.1, 0.0, 0.0));
        assert!(state.still);
        assert_eq!(state.samples_observed, 3);
    }

    #[test]
    fn sample_json_accepts_missing_timestamp() {
        let sample: MotionSample = serde_json::from_str(r#"{"x":0.1,"y":0.2,"z":0.0}"#).unwrap();
        assert_eq!(sample, MotionSample::new(0.1, 0.2, 0.0));
    }
}
