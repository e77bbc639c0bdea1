//! Scripted stillness feeds for driving `SessionTimer` tick by tick.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};

use stillmint_core::StillnessView;
use stillmint_domain::StillnessState;

/// Reports `moving` on a fixed set of 1-based ticks and `still` otherwise.
///
/// Each `current_state` call counts as one tick, matching how the timer reads
/// the view exactly once per `on_tick`.
#[derive(Default)]
pub struct ScriptedStillness {
    moving_ticks: HashSet<u32>,
    reads: AtomicU32,
}

impl ScriptedStillness {
    pub fn always_still() -> Self {
        Self::default()
    }

    pub fn moving_on(ticks: impl IntoIterator<Item = u32>) -> Self {
        Self { moving_ticks: ticks.into_iter().collect(), reads: AtomicU32::new(0) }
    }

    pub fn reads(&self) -> u32 {
        self.reads.load(Ordering::SeqCst)
    }
}

impl StillnessView for ScriptedStillness {
    fn current_state(&self) -> StillnessState {
        let tick = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
        let still = !self.moving_ticks.contains(&tick);
        let magnitude = if still { 0.05 } else { 1.2 };
        StillnessState {
            still,
            last_magnitude: Some(magnitude),
            samples_observed: u64::from(tick),
            ..StillnessState::default()
        }
    }
}
