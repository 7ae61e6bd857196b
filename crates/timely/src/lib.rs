//! Scoped wall-clock timing.
//!
//! Two independent guards built on the same UTC clock:
//!
//! | Type | Scope behavior |
//! |------|----------------|
//! | [`Stopwatch`] | records start, checkpoints, and end of a scope |
//! | [`Blocker`] | holds a scope open until a minimum duration has passed |
//!
//! Both do their exit work in `Drop`, so it runs on normal completion, early
//! `?` returns, and panic unwinding alike. Errors from the enclosed work are
//! passed through untouched.
//!
//! # Quick start
//!
//! ```rust
//! use timely::{Blocker, Stopwatch};
//!
//! let (_, sw) = Stopwatch::measure(|run| {
//!     Blocker::new(0.02).unwrap().run(|| ());
//!     run.tick();
//! });
//!
//! assert!(sw >= 0.02);
//! assert_eq!(sw.ticks().len(), 1);
//! ```

pub mod blocker;
pub mod clock;
pub mod error;
pub mod logging;
pub mod stopwatch;

pub use blocker::{Blocker, BlockerGuard, Target};
pub use clock::{now, seconds, seconds_between, seconds_since, span_from_seconds, Span, Timestamp};
pub use error::{Error, Result};
pub use stopwatch::{Stopwatch, StopwatchGuard, StopwatchState};
