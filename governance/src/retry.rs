//! Bounded retry for store operations that may hit write conflicts.

use heritage_store::StoreError;

use crate::GovernanceError;

/// How many times a conflicting store operation is attempted before giving up.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    pub const DEFAULT_ATTEMPTS: u32 = 3;

    /// `max_attempts` is clamped to at least 1.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent. A failed attempt must have had no effect,
    /// which every store guarantees for [`StoreError::Conflict`].
    pub fn run<T>(
        &self,
        what: &str,
        mut op: impl FnMut() -> Result<T, StoreError>,
    ) -> Result<T, GovernanceError> {
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    tracing::debug!(operation = what, attempt, error = %e, "retrying after conflict");
                    attempt += 1;
                }
                Err(e) if e.is_retryable() => {
                    tracing::warn!(operation = what, attempts = attempt, "retry budget exhausted");
                    return Err(GovernanceError::Conflict(format!(
                        "{what} conflicted {attempt} times: {e}"
                    )));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ATTEMPTS)
    }
}
