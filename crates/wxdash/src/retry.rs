//! Fixed-interval retry for startup operations.
//!
//! The database may not be reachable when wxdash starts (a network share that
//! is still mounting, a file locked by another process). [`RetryPolicy`] runs
//! an operation a bounded number of times with a constant pause between
//! attempts.

use std::time::Duration;

use tracing::{info, warn};

use crate::error::{Error, Result};

/// Default number of attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 40;

/// Default pause between attempts.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(5);

/// How often, and how patiently, to retry an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub max_attempts: u32,
    /// Pause between consecutive attempts.
    pub wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            wait: DEFAULT_WAIT,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given attempt budget and pause.
    #[must_use]
    pub fn new(max_attempts: u32, wait: Duration) -> Self {
        Self { max_attempts, wait }
    }

    /// Run `operation` until it succeeds or the attempts are used up.
    ///
    /// The closure receives the 1-based attempt number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RetriesExhausted`] wrapping the last failure.
    pub fn run<T, F>(&self, operation: &str, mut attempt_fn: F) -> Result<T>
    where
        F: FnMut(u32) -> Result<T>,
    {
        let attempts = self.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match attempt_fn(attempt) {
                Ok(value) => {
                    if attempt > 1 {
                        info!("{} succeeded on attempt {}", operation, attempt);
                    }
                    return Ok(value);
                }
                Err(e) => {
                    warn!("{} attempt {} failed: {}", operation, attempt, e);
                    last_error = Some(e);
                    if attempt < attempts {
                        std::thread::sleep(self.wait);
                    }
                }
            }
        }

        let last = last_error.unwrap_or_else(|| Error::internal("retry loop made no attempts"));
        Err(Error::RetriesExhausted {
            operation: operation.to_string(),
            attempts,
            last: Box::new(last),
        })
    }
}
