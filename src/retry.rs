//! Bounded retries with exponential backoff and jitter

use crate::error::{Error, Result};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Backoff configuration for non-streaming requests.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retry attempts after the initial one. Zero disables retries.
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Ceiling on the computed delay
    pub max_delay: Duration,
    /// Multiplier applied per attempt
    pub backoff_factor: f64,
    /// Fraction of the delay randomized in both directions (0.0 to 1.0)
    pub jitter: f64,
    /// Honor server-provided retry-after hints over computed backoff
    pub respect_retry_after: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            backoff_factor: 2.0,
            jitter: 0.1,
            respect_retry_after: true,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// A policy that never retries.
    pub fn disabled() -> Self {
        Self::new(0)
    }

    /// Delay before retry number `attempt` (zero-based) for the given error.
    pub(crate) fn delay_for(&self, attempt: u32, error: &Error) -> Duration {
        if self.respect_retry_after {
            if let Some(hint) = error.retry_delay() {
                return hint.min(self.max_delay);
            }
        }

        let base = self.initial_delay.as_millis() as f64 * self.backoff_factor.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_millis() as f64);

        let with_jitter = if self.jitter > 0.0 {
            let spread = capped * self.jitter;
            let offset = rand::thread_rng().gen_range(-spread..=spread);
            (capped + offset).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(with_jitter as u64)
    }

    pub(crate) fn should_retry(&self, error: &Error, attempt: u32) -> bool {
        attempt < self.max_retries && error.is_retryable()
    }
}

/// Run `operation` until it succeeds, its error is not retryable, or the
/// policy's attempt budget runs out. Returns the last error on exhaustion.
pub(crate) async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if !policy.should_retry(&error, attempt) {
                    return Err(error);
                }

                let delay = policy.delay_for(attempt, &error);
                warn!(
                    attempt = attempt + 1,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    %error,
                    "request failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
