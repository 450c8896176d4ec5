//! Retry with exponential backoff
//!
//! Upstream calls (geocoding) are retried on transient failures with
//! `delay = initial * multiplier^attempt`, capped at `max_delay_ms`, plus
//! symmetric random jitter so concurrent callers spread out.
//!
//! # Example
//!
//! ```rust,ignore
//! use infrastructure::retry::{RetryConfig, retry};
//!
//! let location = retry(&RetryConfig::default(), || client.geocode("Dallas, TX")).await?;
//! ```

use std::future::Future;
use std::time::{Duration, Instant};

use integration_geocoding::GeocodingError;
use rand::Rng;
use tracing::{debug, warn};

/// Backoff parameters
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Delay before the first retry in milliseconds
    pub initial_delay_ms: u64,
    /// Upper bound for a single delay in milliseconds
    pub max_delay_ms: u64,
    /// Growth factor between consecutive delays
    pub multiplier: f64,
    /// Retries after the first attempt (0 = try once)
    pub max_retries: u32,
    /// Fraction of the delay used as +/- jitter (0.0 disables)
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(250, 4_000, 2.0, 2)
    }
}

impl RetryConfig {
    /// Create a configuration with 10% jitter
    #[must_use]
    pub const fn new(
        initial_delay_ms: u64,
        max_delay_ms: u64,
        multiplier: f64,
        max_retries: u32,
    ) -> Self {
        Self {
            initial_delay_ms,
            max_delay_ms,
            multiplier,
            max_retries,
            jitter_factor: 0.1,
        }
    }

    /// Never retry
    #[must_use]
    pub const fn none() -> Self {
        Self::new(0, 0, 1.0, 0)
    }

    /// Deterministic delays, for tests
    #[must_use]
    pub const fn without_jitter(mut self) -> Self {
        self.jitter_factor = 0.0;
        self
    }

    /// Delay before retry number `attempt` (0-indexed)
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(i32::MAX as u32) as i32;
        let base = (self.initial_delay_ms as f64) * self.multiplier.powi(exponent);
        let capped = base.min(self.max_delay_ms as f64);

        let delay = if self.jitter_factor > 0.0 && capped > 0.0 {
            let spread = capped * self.jitter_factor;
            (capped + rand::rng().random_range(-spread..=spread)).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(delay as u64)
    }
}

/// Errors that know whether repeating the call may help
pub trait Retryable {
    /// Returns true if this error is retryable
    fn is_retryable(&self) -> bool;
}

impl Retryable for application::ApplicationError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

impl Retryable for GeocodingError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

/// Final result plus how it was reached
#[derive(Debug)]
pub struct RetryResult<T, E> {
    pub result: Result<T, E>,
    /// Attempts made (1 = no retry)
    pub attempts: u32,
    pub elapsed: Duration,
}

impl<T, E> RetryResult<T, E> {
    /// Discard the metadata
    pub fn into_result(self) -> Result<T, E> {
        self.result
    }
}

/// Run `operation` until it succeeds, fails permanently, or retries run out
#[allow(clippy::cast_possible_truncation)]
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> RetryResult<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let start = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let err = match operation().await {
            Ok(value) => {
                if attempts > 1 {
                    debug!(attempts, "Operation succeeded after retries");
                }
                return RetryResult {
                    result: Ok(value),
                    attempts,
                    elapsed: start.elapsed(),
                };
            },
            Err(err) => err,
        };

        let retries_used = attempts - 1;
        if !err.is_retryable() || retries_used >= config.max_retries {
            if err.is_retryable() {
                warn!(attempts, error = %err, "Giving up after max retries");
            }
            return RetryResult {
                result: Err(err),
                attempts,
                elapsed: start.elapsed(),
            };
        }

        let delay = config.delay_for_attempt(retries_used);
        warn!(
            attempt = attempts,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Transient failure, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

/// [`with_retry`] without the metadata
pub async fn retry<F, Fut, T, E>(config: &RetryConfig, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    with_retry(config, operation).await.into_result()
}
