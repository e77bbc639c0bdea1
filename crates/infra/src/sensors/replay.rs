//! Recorded accelerometer trace playback
//!
//! Traces are JSON lines, one `{"x":..,"y":..,"z":..}` object per line.
//! Blank lines and lines starting with `#` are skipped. Each subscription
//! gets its own playback task that emits one sample per update interval
//! until the trace runs out (or forever when looping).

use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use stillmint_common::{Subscription, Ticker, TickerConfig};
use stillmint_core::{MotionSensor, SampleListener, SessionError};
use stillmint_domain::constants::SAMPLE_INTERVAL_MS;
use stillmint_domain::{MotionSample, Result as DomainResult, StillMintError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::errors::conversions::to_domain;

/// Motion sensor that replays a recorded trace on the tokio runtime.
pub struct ReplayMotionSensor {
    samples: Arc<[MotionSample]>,
    interval: Mutex<Duration>,
    looping: bool,
}

impl ReplayMotionSensor {
    pub fn new(samples: Vec<MotionSample>) -> Self {
        Self {
            samples: samples.into(),
            interval: Mutex::new(Duration::from_millis(SAMPLE_INTERVAL_MS)),
            looping: false,
        }
    }

    /// Restart from the first sample after the last one.
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Parse a JSON-lines trace.
    ///
    /// # Errors
    /// `InvalidInput` naming the offending line when a line is not a sample.
    pub fn from_reader<R: BufRead>(reader: R) -> DomainResult<Self> {
        let mut samples = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                StillMintError::InvalidInput(format!("failed to read trace line {}: {e}", index + 1))
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let sample: MotionSample = serde_json::from_str(trimmed).map_err(|e| {
                StillMintError::InvalidInput(format!(
                    "trace line {}: {}",
                    index + 1,
                    to_domain(e)
                ))
            })?;
            samples.push(sample);
        }
        Ok(Self::new(samples))
    }

    /// Load a JSON-lines trace from disk.
    ///
    /// # Errors
    /// `InvalidInput` if the file cannot be opened or parsed.
    pub fn from_path(path: &Path) -> DomainResult<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            StillMintError::InvalidInput(format!("cannot open trace {}: {e}", path.display()))
        })?;
        let sensor = Self::from_reader(std::io::BufReader::new(file))?;
        info!(path = %path.display(), samples = sensor.len(), "motion trace loaded");
        Ok(sensor)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl MotionSensor for ReplayMotionSensor {
    fn set_update_interval(&self, interval: Duration) {
        *self.interval.lock() = interval;
    }

    fn subscribe(&self, listener: SampleListener) -> Result<Subscription, SessionError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            SessionError::SensorUnavailable("trace replay needs a tokio runtime".into())
        })?;

        let cancel = CancellationToken::new();
        // Delivery happens under this lock; teardown flips it under the same
        // lock, so nothing is delivered once unsubscribe returns.
        let live = Arc::new(Mutex::new(true));

        let samples = Arc::clone(&self.samples);
        let looping = self.looping;
        let mut ticker = Ticker::new(TickerConfig::new(*self.interval.lock()), cancel.clone());
        let task_live = Arc::clone(&live);

        runtime.spawn(async move {
            let mut position = 0usize;
            while ticker.tick().await.is_some() {
                if position == samples.len() {
                    if !looping || samples.is_empty() {
                        debug!(delivered = position, "motion trace exhausted");
                        break;
                    }
                    position = 0;
                }
                let sample = samples[position];
                position += 1;

                let guard = task_live.lock();
                if !*guard {
                    break;
                }
                listener(sample);
            }
        });

        Ok(Subscription::new("replay-motion", move || {
            *live.lock() = false;
            cancel.cancel();
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const TRACE: &str = r#"
# recorded on a desk
{"x": 0.01, "y": 0.02, "z": 0.00}
{"x": 0.40, "y": 0.10, "z": 0.05, "timestamp_ms": 2000}

{"x": 0.00, "y": 0.00, "z": 0.10}
"#;

    fn collector() -> (Arc<Mutex<Vec<MotionSample>>>, SampleListener) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, Arc::new(move |sample| sink.lock().push(sample)))
    }

    #[test]
    fn parses_json_lines_and_skips_comments() {
        let sensor = ReplayMotionSensor::from_reader(Cursor::new(TRACE)).unwrap();
        assert_eq!(sensor.len(), 3);
        assert_eq!(sensor.samples[1].timestamp_ms, Some(2000));
    }

    #[test]
    fn reports_offending_line() {
        let err = ReplayMotionSensor::from_reader(Cursor::new("{\"x\":0,\"y\":0,\"z\":0}\nnope\n"))
            .err()
            .unwrap();
        match err {
            StillMintError::InvalidInput(msg) => assert!(msg.contains("trace line 2"), "{msg}"),
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn subscribe_outside_runtime_is_unavailable() {
        let sensor = ReplayMotionSensor::new(vec![MotionSample::new(0.0, 0.0, 0.0)]);
        let err = sensor.subscribe(Arc::new(|_| {})).unwrap_err();
        assert!(matches!(err, SessionError::SensorUnavailable(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn plays_one_sample_per_interval_then_stops() {
        let sensor = ReplayMotionSensor::from_reader(Cursor::new(TRACE)).unwrap();
        sensor.set_update_interval(Duration::from_secs(1));
        let (seen, listener) = collector();
        let _sub = sensor.subscribe(listener).unwrap();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(seen.lock().len(), 1);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(seen.lock().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn looping_trace_wraps_around() {
        let sensor = ReplayMotionSensor::new(vec![
            MotionSample::new(0.0, 0.0, 0.1),
            MotionSample::new(1.0, 0.0, 0.0),
        ])
        .with_looping(true);
        let (seen, listener) = collector();
        let _sub = sensor.subscribe(listener).unwrap();

        tokio::time::sleep(Duration::from_millis(5500)).await;

        let seen = seen.lock();
        assert_eq!(seen.len(), 5);
        assert_eq!(seen[2], MotionSample::new(0.0, 0.0, 0.1));
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_delivered_after_unsubscribe() {
        let sensor = ReplayMotionSensor::new(vec![MotionSample::new(0.0, 0.0, 0.0); 10]);
        let (seen, listener) = collector();
        let sub = sensor.subscribe(listener).unwrap();

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert!(sub.unsubscribe());
        let delivered = seen.lock().len();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(seen.lock().len(), delivered);
        assert_eq!(delivered, 2);
    }
}
