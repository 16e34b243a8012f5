//! Exponential-backoff retry executor.
//!
//! Wraps a single fallible upstream operation and retries it on failure,
//! giving the upstream service room to recover from transient errors
//! (rate limiting, flaky networking) without hammering it.
//!
//! The executor does not swallow or transform errors: after the final
//! attempt fails, the last error is propagated unchanged. Classification
//! into the caller-facing taxonomy is a separate concern that happens
//! exactly once, in the facade.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Delay schedule for retries.
///
/// The delay before attempt `n + 1` is `base_delay * 2^n` (zero-indexed,
/// capped at `max_delay`). There is no jitter: the caller population is a
/// single interactive client, not a fleet, so synchronized retries are
/// not a concern.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Backoff before the attempt following failed attempt `attempt`.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let base = self.base_delay.as_millis() as u64;
        let cap = self.max_delay.as_millis() as u64;
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(base.saturating_mul(factor).min(cap))
    }

    /// Execute `op` up to `max_attempts` times.
    ///
    /// Returns the first success, or the last error unchanged after the
    /// final attempt fails. Once a sequence starts it runs to completion
    /// or exhaustion; there is no external cancellation signal.
    pub async fn run<T, E, F, Fut>(&self, max_attempts: u32, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let max_attempts = max_attempts.max(1);
        let mut attempt: u32 = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt >= max_attempts {
                        warn!(
                            attempts = attempt,
                            error = %err,
                            "upstream call failed; retries exhausted"
                        );
                        return Err(err);
                    }
                    let delay = self.backoff_delay(attempt - 1);
                    debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "upstream call failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new().with_base_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn first_attempt_success_does_not_retry() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result: Result<u32, String> = fast_policy()
            .run(3, move || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                }
            })
            .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result: Result<&str, String> = fast_policy()
            .run(3, move || {
                let c = Arc::clone(&c);
                async move {
                    if c.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err("transient".to_string())
                    } else {
                        Ok("recovered")
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhaustion_returns_last_error_unchanged() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result: Result<(), String> = fast_policy()
            .run(3, move || {
                let c = Arc::clone(&c);
                async move {
                    let n = c.fetch_add(1, Ordering::SeqCst);
                    Err(format!("failure {n}"))
                }
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // The final attempt's error, not the first.
        assert_eq!(result.unwrap_err(), "failure 2");
    }

    #[tokio::test]
    async fn zero_attempts_is_clamped_to_one() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result: Result<(), String> = fast_policy()
            .run(0, move || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err("nope".to_string())
                }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::new()
            .with_base_delay(Duration::from_millis(1000))
            .with_max_delay(Duration::from_millis(5000));
        assert_eq!(policy.backoff_delay(0), Duration::from_millis(1000));
        assert_eq!(policy.backoff_delay(1), Duration::from_millis(2000));
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(4000));
        assert_eq!(policy.backoff_delay(3), Duration::from_millis(5000));
        // A huge attempt index must not overflow the shift.
        assert_eq!(policy.backoff_delay(80), Duration::from_millis(5000));
    }
}
