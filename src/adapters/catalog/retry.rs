//! Fixed-delay retry policy for catalog lookups.
//!
//! Every failure is retried the same way (status, transport, decode),
//! with a constant pause between attempts and none after the last one.
//! The pause is a `tokio::time::sleep`, so dropping the surrounding
//! future (e.g. a request deadline firing) cancels the wait.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

/// Bounded attempts with a fixed inter-attempt delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first try included. Always at least 1.
    pub max_attempts: u32,
    /// Pause between consecutive attempts.
    pub delay: Duration,
}

/// Failure of the last attempt after the policy gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exhausted<E> {
    /// Attempts performed.
    pub attempts: u32,
    /// Error from the final attempt.
    pub last_error: E,
}

impl RetryPolicy {
    /// Build a fixed-delay policy; `max_attempts` is clamped to >= 1.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Run `op` until it succeeds or attempts are exhausted.
    ///
    /// `op` receives the 1-based attempt number.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut op: F) -> Result<T, Exhausted<E>>
    where
        E: Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.max_attempts => {
                    return Err(Exhausted {
                        attempts: attempt,
                        last_error: e,
                    });
                }
                Err(e) => {
                    warn!(
                        op = label,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Attempt failed, retrying"
                    );
                    debug!(delay_ms = self.delay.as_millis() as u64, "Waiting before retry");
                    sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
