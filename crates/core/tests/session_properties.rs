//! Countdown and violation behaviour of `SessionTimer` over full sessions.

mod support;

use std::sync::Arc;

use parking_lot::Mutex;
use stillmint_core::{MotionSampler, SessionError, SessionTimer, TickOutcome, VerdictCallback};
use stillmint_domain::constants::STILLNESS_THRESHOLD;
use stillmint_domain::{MotionSample, SessionConfig, SessionPhase, SessionVerdict};
use support::stillness::ScriptedStillness;

fn capture() -> (Arc<Mutex<Vec<SessionVerdict>>>, VerdictCallback) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, Box::new(move |verdict| sink.lock().push(verdict)))
}

/// Tick until the session finishes, returning the number of ticks taken.
fn run_to_end(timer: &mut SessionTimer) -> u32 {
    let mut ticks = 0;
    loop {
        ticks += 1;
        if timer.on_tick().unwrap().is_finished() {
            return ticks;
        }
    }
}

#[test]
fn all_still_session_completes_after_exactly_300_ticks() {
    let (seen, callback) = capture();
    let mut timer = SessionTimer::new(Arc::new(ScriptedStillness::always_still()));
    timer.start(SessionConfig::default(), callback).unwrap();

    assert_eq!(run_to_end(&mut timer), 300);

    let state = timer.state();
    assert_eq!(state.phase, SessionPhase::Completed);
    assert_eq!(state.violation_count, 0);
    assert_eq!(state.remaining_seconds, 0);
    assert_eq!(state.tick_log.len(), 300);
    assert_eq!(
        seen.lock().as_slice(),
        &[SessionVerdict { phase: SessionPhase::Completed, violation_count: 0, elapsed_seconds: 300 }]
    );
}

#[test]
fn three_violations_disqualify_with_limit_three() {
    let (seen, callback) = capture();
    let view = Arc::new(ScriptedStillness::moving_on([10, 50, 120]));
    let mut timer = SessionTimer::new(view.clone());
    timer.start(SessionConfig::new(300, 3), callback).unwrap();

    assert_eq!(run_to_end(&mut timer), 300);

    assert_eq!(timer.phase(), SessionPhase::Disqualified);
    assert_eq!(timer.state().violation_count, 3);
    assert_eq!(view.reads(), 300);
    assert_eq!(seen.lock()[0].phase, SessionPhase::Disqualified);
}

#[test]
fn one_below_limit_still_completes() {
    let mut timer = SessionTimer::new(Arc::new(ScriptedStillness::moving_on([7, 299])));
    timer.start(SessionConfig::new(300, 3), Box::new(|_| {})).unwrap();

    run_to_end(&mut timer);

    assert_eq!(timer.phase(), SessionPhase::Completed);
    assert_eq!(timer.state().violation_count, 2);
}

#[test]
fn violation_count_matches_moving_ticks() {
    let moving = [1, 2, 3, 5, 8, 13, 21, 34, 55];
    let mut timer = SessionTimer::new(Arc::new(ScriptedStillness::moving_on(moving)));
    timer.start(SessionConfig::new(60, 100), Box::new(|_| {})).unwrap();

    for n in 1..=40u32 {
        timer.on_tick().unwrap();
        let expected = moving.iter().filter(|&&t| t <= n).count() as u32;
        assert_eq!(timer.state().violation_count, expected, "after tick {n}");
    }

    let moving_in_log: Vec<u32> =
        timer.state().tick_log.iter().filter(|r| !r.still).map(|r| r.tick).collect();
    assert_eq!(moving_in_log, vec![1, 2, 3, 5, 8, 13, 21, 34]);
}

#[test]
fn remaining_and_violations_are_monotonic() {
    let mut timer = SessionTimer::new(Arc::new(ScriptedStillness::moving_on([2, 4, 6])));
    timer.start(SessionConfig::new(10, 5), Box::new(|_| {})).unwrap();

    let mut last_remaining = timer.state().remaining_seconds;
    let mut last_violations = 0;
    while timer.phase() == SessionPhase::Running {
        timer.on_tick().unwrap();
        assert!(timer.state().remaining_seconds < last_remaining);
        assert!(timer.state().violation_count >= last_violations);
        last_remaining = timer.state().remaining_seconds;
        last_violations = timer.state().violation_count;
    }
}

#[test]
fn ticks_after_terminal_leave_state_unchanged() {
    let (seen, callback) = capture();
    let mut timer = SessionTimer::new(Arc::new(ScriptedStillness::moving_on([1])));
    timer.start(SessionConfig::new(3, 1), callback).unwrap();
    run_to_end(&mut timer);
    let finished = timer.state().clone();

    for _ in 0..5 {
        let err = timer.on_tick().unwrap_err();
        assert_eq!(err, SessionError::NotRunning { phase: SessionPhase::Disqualified });
        assert_eq!(timer.state(), &finished);
    }
    assert_eq!(seen.lock().len(), 1);
}

#[test]
fn timer_reads_live_sampler_state() {
    let sampler = Arc::new(MotionSampler::new(STILLNESS_THRESHOLD, std::time::Duration::from_secs(1)));
    let mut timer = SessionTimer::new(sampler.clone());
    timer.start(SessionConfig::new(3, 2), Box::new(|_| {})).unwrap();

    // Not started: samples are ignored and the default still state is reused.
    assert!(!sampler.record_sample(&MotionSample::new(2.0, 0.0, 0.0)));
    assert_eq!(
        timer.on_tick().unwrap(),
        TickOutcome::Continue { remaining_seconds: 2, still: true }
    );
    assert_eq!(timer.state().tick_log[0].magnitude, None);
}
