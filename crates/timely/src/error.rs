use std::fmt;

/// Errors reported by this crate.
///
/// Errors raised by caller work inside a scope are never converted into this
/// type; they propagate unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A blocker target resolved to fewer than zero seconds.
    NegativeDuration(f64),
    /// A blocker target was NaN or infinite.
    NonFiniteDuration,
    /// A blocker target was finite but too large to sleep for.
    DurationOutOfRange(f64),
    /// `Stopwatch::start` was called on a stopwatch that has already run.
    AlreadyStarted,
}

impl Error {
    /// Whether this error rejects a constructor argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::NegativeDuration(_) | Error::NonFiniteDuration | Error::DurationOutOfRange(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NegativeDuration(secs) => {
                write!(f, "can't wait for under 0 seconds (got {secs}s)")
            }
            Error::NonFiniteDuration => {
                write!(f, "wait duration must be a finite number of seconds")
            }
            Error::DurationOutOfRange(secs) => {
                write!(f, "wait duration of {secs}s is too large to sleep for")
            }
            Error::AlreadyStarted => write!(f, "stopwatch has already been started"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
