//! Backoff policy for contact webhook delivery.
//!
//! A submitter's request stays open while delivery runs, so the budget is a
//! few attempts spread over a couple of seconds. Whether a failure is worth
//! another attempt is decided by [`DeliveryError::is_retryable`].

use crate::transport::DeliveryError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// How many times to try a delivery and how long to wait in between.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
    backoff_multiplier: f64,
}

impl RetryConfig {
    /// `max_attempts` includes the first try. Zero is raised to one: a
    /// delivery is always attempted.
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Contact webhook preset: 3 attempts, waiting 500ms then 1s.
    pub fn webhook() -> Self {
        Self::new(3, Duration::from_millis(500)).with_max_delay(Duration::from_secs(2))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Wait after failed attempt number `attempt` (1-based).
    fn backoff_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let millis = self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(exponent);
        Duration::from_millis(millis as u64).min(self.max_delay)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::webhook()
    }
}

/// Run `send` until it succeeds, fails with an error that is not retryable,
/// or the configured attempts are used up. The last error is returned.
pub async fn deliver_with_retry<F, Fut>(
    config: &RetryConfig,
    destination: &str,
    mut send: F,
) -> Result<(), DeliveryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), DeliveryError>>,
{
    let mut attempt = 1;
    loop {
        let error = match send().await {
            Ok(()) => {
                if attempt > 1 {
                    debug!(destination, attempt, "Delivered after retrying");
                }
                return Ok(());
            }
            Err(e) => e,
        };

        if !error.is_retryable() {
            warn!(destination, attempt, "Delivery rejected, not retrying: {}", error);
            return Err(error);
        }
        if attempt >= config.max_attempts {
            warn!(
                destination,
                "Delivery failed after {} attempt(s): {}", attempt, error
            );
            return Err(error);
        }

        let delay = config.backoff_after(attempt);
        warn!(
            destination,
            attempt,
            max_attempts = config.max_attempts,
            "Delivery attempt failed ({}), retrying in {:?}",
            error,
            delay
        );
        sleep(delay).await;
        attempt += 1;
    }
}
