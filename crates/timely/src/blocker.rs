use std::thread;
use std::time::Duration;

use crate::clock::{self, Span, Timestamp};
use crate::error::{Error, Result};

/// Accepted forms of a blocker's target duration.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Target {
    /// Plain seconds.
    Seconds(f64),
    /// An absolute deadline, measured from the moment the blocker is built.
    Until(Timestamp),
    /// A signed span.
    Span(Span),
}

impl Target {
    /// Collapses the target to seconds, reading the clock for `Until`.
    fn resolve(self) -> f64 {
        match self {
            Target::Seconds(secs) => secs,
            Target::Until(deadline) => clock::seconds_between(deadline, clock::now()),
            Target::Span(span) => clock::seconds(span),
        }
    }
}

impl From<f64> for Target {
    fn from(secs: f64) -> Self {
        Target::Seconds(secs)
    }
}

impl From<u64> for Target {
    fn from(secs: u64) -> Self {
        Target::Seconds(secs as f64)
    }
}

impl From<Timestamp> for Target {
    fn from(deadline: Timestamp) -> Self {
        Target::Until(deadline)
    }
}

impl From<Span> for Target {
    fn from(span: Span) -> Self {
        Target::Span(span)
    }
}

impl From<Duration> for Target {
    fn from(duration: Duration) -> Self {
        Target::Seconds(duration.as_secs_f64())
    }
}

/// Guarantees a minimum wall-clock duration for a scope.
///
/// Work inside the scope runs immediately; when the scope closes the calling
/// thread sleeps out whatever part of the target has not yet elapsed. The wait
/// happens on every exit path, so neither an early `?` return nor a panic lets
/// the caller observe completion before the target.
///
/// ```rust
/// use timely::Blocker;
///
/// let started = timely::now();
/// {
///     let _hold = Blocker::new(0.05).unwrap().enter();
///     // returns right away, then waits on drop
/// }
/// assert!(timely::seconds_since(started) >= 0.05);
/// ```
#[derive(Debug)]
pub struct Blocker {
    target: Duration,
}

impl Blocker {
    /// Resolves `target` to seconds now, not at scope entry.
    ///
    /// A deadline that has already passed, or any other negative target, is
    /// rejected with [`Error::NegativeDuration`]. Targets too large to sleep
    /// are rejected with [`Error::DurationOutOfRange`].
    pub fn new(target: impl Into<Target>) -> Result<Self> {
        let target = target.into();
        let secs = target.resolve();

        if !secs.is_finite() {
            return Err(Error::NonFiniteDuration);
        }
        if secs < 0.0 {
            return Err(Error::NegativeDuration(secs));
        }
        let wait =
            Duration::try_from_secs_f64(secs).map_err(|_| Error::DurationOutOfRange(secs))?;

        log::debug!("blocker resolved {target:?} to {secs:.6}s");
        Ok(Self { target: wait })
    }

    /// Resolved target in seconds.
    pub fn target_seconds(&self) -> f64 {
        self.target.as_secs_f64()
    }

    /// Opens the scope. The returned guard waits out the remainder on drop.
    pub fn enter(self) -> BlockerGuard {
        let start = clock::now();
        log::trace!("blocker entered at {start} with target {:?}", self.target);
        BlockerGuard {
            target: self.target,
            start,
        }
    }

    /// Runs `f` inside the scope and returns its result once the target has
    /// elapsed. An `Err` from `f` comes back unchanged, after the wait.
    pub fn run<R>(self, f: impl FnOnce() -> R) -> R {
        let _guard = self.enter();
        f()
    }
}

/// Open blocker scope.
#[derive(Debug)]
pub struct BlockerGuard {
    target: Duration,
    start: Timestamp,
}

impl BlockerGuard {
    pub fn start_time(&self) -> Timestamp {
        self.start
    }

    /// Seconds still to wait if the scope closed now. Zero once the target has
    /// passed.
    pub fn remaining(&self) -> f64 {
        self.remaining_wait().as_secs_f64()
    }

    fn remaining_wait(&self) -> Duration {
        // A clock that stepped backwards counts as nothing elapsed.
        let elapsed = (clock::now() - self.start).to_std().unwrap_or(Duration::ZERO);
        self.target.saturating_sub(elapsed)
    }
}

impl Drop for BlockerGuard {
    fn drop(&mut self) {
        let wait = self.remaining_wait();
        if wait.is_zero() {
            log::trace!("blocker target {:?} already elapsed", self.target);
            return;
        }

        log::debug!("blocker sleeping {wait:?} of {:?}", self.target);
        // Resumes after signal interruption; never returns early.
        thread::sleep(wait);
    }
}
