use std::cmp::Ordering;
use std::ops::Deref;

use crate::clock::{self, Timestamp};
use crate::error::{Error, Result};

/// Lifecycle of a [`Stopwatch`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StopwatchState {
    Unstarted,
    Running,
    Stopped,
}

/// Records the wall-clock span of a scope plus any checkpoints taken inside it.
///
/// A stopwatch is single use: [`Stopwatch::start`] opens the scope and returns a
/// guard, and dropping the guard closes it. The end timestamp is captured on
/// every exit path, including `?` returns and panic unwinding.
///
/// ```rust
/// use timely::Stopwatch;
///
/// let mut sw = Stopwatch::new();
/// {
///     let mut run = sw.start().unwrap();
///     run.tick();
///     // ... work ...
///     let so_far = run.duration(); // live reading
///     assert!(so_far >= 0.0);
/// }
/// let total = sw.duration(); // frozen at scope exit
/// assert!(sw >= 0.0);
/// assert_eq!(total, sw.duration());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    start: Option<Timestamp>,
    end: Option<Timestamp>,
    ticks: Vec<Timestamp>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the measured scope.
    ///
    /// Fails with [`Error::AlreadyStarted`] if this stopwatch has been started
    /// before; there is no reset.
    pub fn start(&mut self) -> Result<StopwatchGuard<'_>> {
        if self.start.is_some() {
            return Err(Error::AlreadyStarted);
        }
        Ok(self.enter())
    }

    /// Runs `f` inside a fresh stopwatch scope and returns its output together
    /// with the stopped stopwatch.
    ///
    /// If `f` panics the end timestamp is still recorded before unwinding
    /// continues.
    pub fn measure<R>(f: impl FnOnce(&mut StopwatchGuard<'_>) -> R) -> (R, Stopwatch) {
        let mut sw = Stopwatch::new();
        let out = {
            let mut guard = sw.enter();
            f(&mut guard)
        };
        (out, sw)
    }

    fn enter(&mut self) -> StopwatchGuard<'_> {
        let start = clock::now();
        self.start = Some(start);
        log::trace!("stopwatch started at {start}");
        StopwatchGuard { stopwatch: self }
    }

    /// Records a checkpoint at the current time.
    ///
    /// Ticks taken before `start` or after the scope closed are kept, in call
    /// order, but fall outside the measured span.
    pub fn tick(&mut self) {
        self.ticks.push(clock::now());
    }

    /// Recorded checkpoints, oldest first.
    pub fn ticks(&self) -> Vec<Timestamp> {
        self.ticks.clone()
    }

    /// Seconds between consecutive checkpoints, measured from the scope start.
    ///
    /// Empty before the stopwatch has been started.
    pub fn splits(&self) -> Vec<f64> {
        let Some(start) = self.start else {
            return Vec::new();
        };

        let mut prev = start;
        self.ticks
            .iter()
            .map(|&t| {
                let split = clock::seconds_between(t, prev);
                prev = t;
                split
            })
            .collect()
    }

    /// Elapsed seconds.
    ///
    /// Frozen once the scope has closed; while running it is the time so far.
    /// An unstarted stopwatch reports `0.0`.
    pub fn duration(&self) -> f64 {
        match (self.start, self.end) {
            (Some(start), Some(end)) => clock::seconds_between(end, start),
            (Some(start), None) => clock::seconds_since(start),
            (None, _) => 0.0,
        }
    }

    /// Compares [`duration`](Self::duration) against `secs`.
    pub fn compare(&self, secs: f64) -> Option<Ordering> {
        self.duration().partial_cmp(&secs)
    }

    pub fn state(&self) -> StopwatchState {
        match (self.start, self.end) {
            (None, _) => StopwatchState::Unstarted,
            (Some(_), None) => StopwatchState::Running,
            (Some(_), Some(_)) => StopwatchState::Stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == StopwatchState::Running
    }

    pub fn is_stopped(&self) -> bool {
        self.state() == StopwatchState::Stopped
    }

    pub fn start_time(&self) -> Option<Timestamp> {
        self.start
    }

    pub fn end_time(&self) -> Option<Timestamp> {
        self.end
    }
}

impl PartialEq<f64> for Stopwatch {
    fn eq(&self, other: &f64) -> bool {
        self.duration() == *other
    }
}

impl PartialOrd<f64> for Stopwatch {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.compare(*other)
    }
}

/// Open stopwatch scope. Dropping it records the end timestamp.
#[derive(Debug)]
pub struct StopwatchGuard<'a> {
    stopwatch: &'a mut Stopwatch,
}

impl StopwatchGuard<'_> {
    /// Records a checkpoint at the current time.
    pub fn tick(&mut self) {
        self.stopwatch.tick();
    }
}

impl Deref for StopwatchGuard<'_> {
    type Target = Stopwatch;

    fn deref(&self) -> &Stopwatch {
        self.stopwatch
    }
}

impl PartialEq<f64> for StopwatchGuard<'_> {
    fn eq(&self, other: &f64) -> bool {
        *self.stopwatch == *other
    }
}

impl PartialOrd<f64> for StopwatchGuard<'_> {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.stopwatch.compare(*other)
    }
}

impl Drop for StopwatchGuard<'_> {
    fn drop(&mut self) {
        let end = clock::now();
        self.stopwatch.end = Some(end);

        if std::thread::panicking() {
            log::trace!("stopwatch stopped at {end} while unwinding");
        } else {
            log::trace!(
                "stopwatch stopped at {end} after {:.6}s",
                self.stopwatch.duration()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};
    use std::thread;
    use std::time::Duration;

    fn sleep_secs(secs: f64) {
        thread::sleep(Duration::from_secs_f64(secs));
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn new_is_unstarted() {
        let sw = Stopwatch::new();
        assert_eq!(sw.state(), StopwatchState::Unstarted);
        assert_eq!(sw.duration(), 0.0);
        assert!(sw.start_time().is_none());
        assert!(sw.end_time().is_none());
        assert!(sw.ticks().is_empty());
    }

    #[test]
    fn guard_drop_stops() {
        let mut sw = Stopwatch::new();
        {
            let run = sw.start().unwrap();
            assert!(run.is_running());
        }
        assert!(sw.is_stopped());
        assert!(sw.end_time().unwrap() >= sw.start_time().unwrap());
    }

    #[test]
    fn second_start_fails() {
        let mut sw = Stopwatch::new();
        drop(sw.start().unwrap());
        let end = sw.end_time();

        assert_eq!(sw.start().unwrap_err(), Error::AlreadyStarted);
        assert_eq!(sw.end_time(), end);
    }

    // ── duration ──────────────────────────────────────────────────────────

    #[test]
    fn duration_is_live_while_running() {
        let mut sw = Stopwatch::new();
        let run = sw.start().unwrap();
        let first = run.duration();
        sleep_secs(0.05);
        let second = run.duration();
        assert!(second > first);
        assert!(second >= 0.05);
    }

    #[test]
    fn duration_is_frozen_after_exit() {
        let mut sw = Stopwatch::new();
        {
            let _run = sw.start().unwrap();
            sleep_secs(0.02);
        }
        let frozen = sw.duration();
        sleep_secs(0.05);
        assert_eq!(sw.duration(), frozen);
    }

    #[test]
    fn ticks_track_sleep() {
        let wait_time = 0.5;

        let start = clock::now();
        let mut sw = Stopwatch::new();
        {
            let mut run = sw.start().unwrap();
            run.tick();
            sleep_secs(wait_time);
            run.tick();
        }

        assert!(sw >= wait_time);

        let ticks = sw.ticks();
        assert_eq!(ticks.len(), 2);
        let first = clock::seconds_between(ticks[0], start);
        assert!((0.0..=0.1).contains(&first));
        let gap = clock::seconds_between(ticks[1], ticks[0]);
        assert!((0.3..=0.7).contains(&gap), "gap {gap}");
    }

    // ── ticks ─────────────────────────────────────────────────────────────

    #[test]
    fn ticks_returns_a_copy() {
        let mut sw = Stopwatch::new();
        {
            let mut run = sw.start().unwrap();
            run.tick();
        }
        let mut copy = sw.ticks();
        copy.clear();
        assert_eq!(sw.ticks().len(), 1);
    }

    #[test]
    fn tick_outside_scope_keeps_order() {
        let mut sw = Stopwatch::new();
        sw.tick();
        {
            let mut run = sw.start().unwrap();
            run.tick();
        }
        sw.tick();

        let ticks = sw.ticks();
        assert_eq!(ticks.len(), 3);
        assert!(ticks.windows(2).all(|w| w[0] <= w[1]));
        assert!(ticks[0] <= sw.start_time().unwrap());
        assert!(ticks[2] >= sw.end_time().unwrap());
    }

    #[test]
    fn splits_measure_from_start() {
        let mut sw = Stopwatch::new();
        {
            let mut run = sw.start().unwrap();
            sleep_secs(0.05);
            run.tick();
            sleep_secs(0.1);
            run.tick();
        }

        let splits = sw.splits();
        assert_eq!(splits.len(), 2);
        assert!(splits[0] >= 0.05);
        assert!(splits[1] >= 0.1);
        assert!(splits.iter().sum::<f64>() <= sw.duration());
    }

    #[test]
    fn splits_empty_when_unstarted() {
        let mut sw = Stopwatch::new();
        sw.tick();
        assert!(sw.splits().is_empty());
    }

    // ── comparison ────────────────────────────────────────────────────────

    #[test]
    fn compares_against_seconds() {
        let mut sw = Stopwatch::new();
        {
            let _run = sw.start().unwrap();
            sleep_secs(0.05);
        }
        assert!(sw > 0.0);
        assert!(sw >= 0.05);
        assert!(sw < 60.0);
        assert!(sw <= 60.0);
        assert!(sw == sw.duration());
        assert_eq!(sw.compare(60.0), Some(Ordering::Less));
        assert_eq!(sw.compare(f64::NAN), None);
    }

    #[test]
    fn guard_compares_live() {
        let mut sw = Stopwatch::new();
        let run = sw.start().unwrap();
        assert!(run < 60.0);
    }

    // ── exit paths ────────────────────────────────────────────────────────

    #[test]
    fn early_return_still_stops() {
        fn fail() -> std::result::Result<(), &'static str> {
            Err("failed")
        }

        fn work(sw: &mut Stopwatch) -> std::result::Result<(), &'static str> {
            let _run = sw.start().map_err(|_| "start")?;
            fail()?;
            Ok(())
        }

        let mut sw = Stopwatch::new();
        assert_eq!(work(&mut sw), Err("failed"));
        assert!(sw.is_stopped());
    }

    #[test]
    fn panic_still_stops() {
        let mut sw = Stopwatch::new();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _run = sw.start().unwrap();
            panic!("boom");
        }));

        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"boom"));
        assert!(sw.is_stopped());
    }

    #[test]
    fn measure_returns_output_and_stopped_watch() {
        let (out, sw) = Stopwatch::measure(|run| {
            run.tick();
            sleep_secs(0.02);
            41 + 1
        });
        assert_eq!(out, 42);
        assert!(sw.is_stopped());
        assert_eq!(sw.ticks().len(), 1);
        assert!(sw >= 0.02);
    }
}
