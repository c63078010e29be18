//! Error status for retry decisions

use std::fmt;

/// Whether an error is worth retrying.
///
/// Status drives the retry loop: `Temporary` errors are retried,
/// `Permanent` errors are returned immediately, and `Persistent` marks a
/// temporary error that kept failing after retries were exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorStatus {
    /// The error is final - retrying will not help
    Permanent,

    /// The error is transient - retrying may succeed
    Temporary,

    /// The error was temporary but survived all retries
    Persistent,
}

impl ErrorStatus {
    /// Returns the status as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorStatus::Permanent => "permanent",
            ErrorStatus::Temporary => "temporary",
            ErrorStatus::Persistent => "persistent",
        }
    }

    /// Check if an error with this status should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorStatus::Temporary)
    }

    /// Transition after retries have been exhausted.
    ///
    /// Temporary becomes Persistent; other statuses are unchanged.
    pub fn persist(self) -> Self {
        match self {
            ErrorStatus::Temporary => ErrorStatus::Persistent,
            other => other,
        }
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
