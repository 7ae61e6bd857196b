//! UTC wall-clock readings and seconds arithmetic.
//!
//! Every timestamp in this crate comes from [`now`], so stopwatch checkpoints
//! and blocker deadlines share one time reference and never cross a local
//! timezone or DST transition.

use chrono::{DateTime, TimeDelta, Utc};

/// Absolute point in time, UTC, nanosecond resolution.
pub type Timestamp = DateTime<Utc>;

/// Signed difference between two timestamps.
pub type Span = TimeDelta;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Current wall-clock time in UTC.
#[inline]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Converts a span to fractional seconds, preserving sign.
///
/// Whole seconds and the sub-second remainder are combined separately so
/// spans of several years keep nanosecond-level precision.
pub fn seconds(span: Span) -> f64 {
    // `subsec_nanos` carries the same sign as `num_seconds`.
    span.num_seconds() as f64 + f64::from(span.subsec_nanos()) / NANOS_PER_SEC
}

/// `a - b` in seconds. Positive when `a` is after `b`.
#[inline]
pub fn seconds_between(a: Timestamp, b: Timestamp) -> f64 {
    seconds(a - b)
}

/// Seconds elapsed from `t` until now.
#[inline]
pub fn seconds_since(t: Timestamp) -> f64 {
    seconds_between(now(), t)
}

/// Inverse of [`seconds`].
///
/// Returns `None` for NaN, infinities, and magnitudes beyond what a [`Span`]
/// can hold.
pub fn span_from_seconds(secs: f64) -> Option<Span> {
    if !secs.is_finite() {
        return None;
    }

    let whole = secs.trunc();
    if whole.abs() >= i64::MAX as f64 {
        return None;
    }

    let nanos = ((secs - whole) * NANOS_PER_SEC).round() as i64;
    TimeDelta::try_seconds(whole as i64)?.checked_add(&TimeDelta::nanoseconds(nanos))
}
