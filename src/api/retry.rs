//
//  sonarqube-client
//  api/retry.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Retry with exponential backoff, layered outside the executor.
//!
//! The executor itself never retries. Callers that want resilience wrap a
//! call with [`with_retry`], which re-issues it while the error is
//! retryable (`RateLimit`, `Network`, `Timeout`, `Server`). A rate-limit
//! error's `retry_after` hint takes precedence over the computed backoff and
//! is waited in full. A hint longer than `max_delay` ends the retries, so the
//! `RateLimit` error reaches the caller instead of an early retry.
//!
//! ```rust,no_run
//! use sonarqube_client::api::{with_retry, RetryPolicy, SonarQubeClient};
//! use sonarqube_client::auth::AuthProvider;
//!
//! # async fn example() -> sonarqube_client::api::common::Result<()> {
//! let client = SonarQubeClient::new("https://sonar.example.com", AuthProvider::None)?;
//! let server = client.server();
//! let version = with_retry(&RetryPolicy::default(), || server.version()).await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use super::common::{Result, SonarQubeError};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    /// Adds up to 50% random extra delay to computed backoffs.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay before retry number `retry` (1-based) after `error`, or `None`
    /// when the call should not be retried.
    ///
    /// A `retry_after` hint above `max_delay` yields `None`.
    pub fn delay_for(&self, retry: u32, error: &SonarQubeError) -> Option<Duration> {
        if retry >= self.max_attempts || !error.is_retryable() {
            return None;
        }

        if let Some(secs) = error.retry_after() {
            let hint = Duration::from_secs(secs);
            return (hint <= self.max_delay).then_some(hint);
        }

        let exponent = retry.saturating_sub(1).min(i32::MAX as u32) as i32;
        let mut secs = self.base_delay.as_secs_f64() * self.multiplier.max(0.0).powi(exponent);
        if self.jitter {
            let extra: f64 = rand::rng().random_range(0.0..0.5);
            secs *= 1.0 + extra;
        }
        // Overflowing or NaN products saturate at the cap.
        let delay = Duration::try_from_secs_f64(secs).unwrap_or(self.max_delay);
        Some(delay.min(self.max_delay))
    }
}

/// Runs `operation` until it succeeds or [`RetryPolicy::delay_for`] declines
/// another attempt. The last error is returned as is.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => match policy.delay_for(attempt, &error) {
                Some(delay) => {
                    tracing::warn!(
                        attempt,
                        code = error.code(),
                        delay_ms = delay.as_millis() as u64,
                        "retrying SonarQube call: {}",
                        error
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => return Err(error),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts)
            .with_base_delay(Duration::from_millis(1))
            .with_jitter(false)
    }

    #[test]
    fn test_delay_grows_and_is_capped() {
        let policy = RetryPolicy::new(10)
            .with_base_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(350))
            .with_jitter(false);
        let err = SonarQubeError::server("boom", Some(500));
        assert_eq!(policy.delay_for(1, &err), Some(Duration::from_millis(100)));
        assert_eq!(policy.delay_for(2, &err), Some(Duration::from_millis(200)));
        assert_eq!(policy.delay_for(3, &err), Some(Duration::from_millis(350)));
    }

    #[test]
    fn test_retry_after_wins() {
        let policy = RetryPolicy::new(3).with_jitter(false);
        let err = SonarQubeError::rate_limit("slow down", Some(7));
        assert_eq!(policy.delay_for(1, &err), Some(Duration::from_secs(7)));
    }

    #[test]
    fn test_retry_after_beyond_cap_gives_up() {
        let policy = RetryPolicy::default();
        let err = SonarQubeError::rate_limit("slow down", Some(120));
        assert_eq!(policy.delay_for(1, &err), None);
        let err = SonarQubeError::rate_limit("slow down", Some(30));
        assert_eq!(policy.delay_for(1, &err), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_backoff_saturates_at_cap() {
        let policy = RetryPolicy::new(100).with_jitter(false);
        let err = SonarQubeError::server("down", Some(503));
        for retry in 1..100 {
            let delay = policy.delay_for(retry, &err).unwrap();
            assert!(delay <= policy.max_delay, "retry {retry}: {delay:?}");
        }
        assert_eq!(policy.delay_for(99, &err), Some(policy.max_delay));

        let jittered = RetryPolicy::new(100);
        assert!(jittered.delay_for(99, &err).unwrap() <= jittered.max_delay);

        let odd = RetryPolicy {
            multiplier: f64::NAN,
            ..RetryPolicy::new(5).with_jitter(false)
        };
        assert!(odd.delay_for(3, &err).unwrap() <= odd.max_delay);

        let negative = RetryPolicy {
            multiplier: -3.0,
            ..RetryPolicy::new(5).with_jitter(false)
        };
        assert!(negative.delay_for(2, &err).unwrap() <= negative.max_delay);
    }

    #[test]
    fn test_non_retryable_and_exhausted() {
        let policy = RetryPolicy::new(2);
        assert_eq!(policy.delay_for(1, &SonarQubeError::authentication(None)), None);
        assert_eq!(policy.delay_for(2, &SonarQubeError::network("x", None)), None);
    }

    #[tokio::test]
    async fn test_with_retry_recovers() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&fast_policy(3), || async {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(SonarQubeError::server("flaky", Some(503)))
            } else {
                Ok("ok")
            }
        })
        .await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_with_retry_gives_up() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_retry(&fast_policy(3), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(SonarQubeError::network("down", None))
        })
        .await;
        assert_eq!(result.unwrap_err().code(), "NETWORK_ERROR");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_with_retry_surfaces_long_rate_limit() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_retry(&fast_policy(5), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(SonarQubeError::rate_limit("slow down", Some(120)))
        })
        .await;
        let err = result.unwrap_err();
        assert_eq!(err.code(), "RATE_LIMIT_ERROR");
        assert_eq!(err.retry_after(), Some(120));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_with_retry_stops_on_client_error() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_retry(&fast_policy(5), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(SonarQubeError::not_found(None, Some("project".into())))
        })
        .await;
        assert_eq!(result.unwrap_err().code(), "NOT_FOUND_ERROR");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
