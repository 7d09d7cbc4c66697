// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::errors::{AnalysisError, ErrorKind};
use crate::observability::messages::resilience::RetryScheduled;
use crate::observability::messages::StructuredLog;

/// Retry budget and delay curve for one class of errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub multiplier: f64,
    pub max_delay_ms: u64,
    /// `base * (attempt + 1)` instead of `base * multiplier^attempt`.
    pub linear: bool,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: 100,
            multiplier: 2.0,
            max_delay_ms: 5_000,
            linear: false,
        }
    }
}

impl BackoffPolicy {
    /// Delay before retry number `attempt + 1` (`attempt` is zero-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let raw_ms = if self.linear {
            self.base_delay_ms as f64 * f64::from(attempt + 1)
        } else {
            self.base_delay_ms as f64 * self.multiplier.powi(attempt as i32)
        };
        Duration::from_millis(raw_ms.min(self.max_delay_ms as f64) as u64)
    }
}

/// Which errors are retried, and how.
///
/// * timeout - up to 3 retries, exponential delay capped at 5s
/// * engine - up to 2 retries, only when the error is recoverable
/// * worker - up to 3 retries, short linear backoff
/// * resource, configuration, initialization, unknown - never retried
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorPolicy {
    pub timeout: BackoffPolicy,
    pub engine: BackoffPolicy,
    pub worker: BackoffPolicy,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self {
            timeout: BackoffPolicy {
                max_retries: 3,
                base_delay_ms: 1_000,
                multiplier: 2.0,
                max_delay_ms: 5_000,
                linear: false,
            },
            engine: BackoffPolicy {
                max_retries: 2,
                base_delay_ms: 500,
                multiplier: 2.0,
                max_delay_ms: 5_000,
                linear: false,
            },
            worker: BackoffPolicy {
                max_retries: 3,
                base_delay_ms: 100,
                multiplier: 1.0,
                max_delay_ms: 1_000,
                linear: true,
            },
        }
    }
}

impl ErrorPolicy {
    /// The backoff to use for `error`, or `None` when it must not be retried.
    pub fn policy_for(&self, error: &AnalysisError) -> Option<&BackoffPolicy> {
        match error.kind {
            ErrorKind::Timeout if error.recoverable => Some(&self.timeout),
            ErrorKind::Engine if error.recoverable => Some(&self.engine),
            ErrorKind::Worker if error.recoverable => Some(&self.worker),
            _ => None,
        }
    }
}

/// Ceiling for a single [`with_retry`] backoff delay.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Retry `operation` on any error with `delay = base_delay * backoff_multiplier^attempt`,
/// capped at [`MAX_RETRY_DELAY`].
/// Returns the last error once `max_retries` retries are exhausted.
pub async fn with_retry<T, E, F, Fut>(
    mut operation: F,
    max_retries: u32,
    base_delay: Duration,
    backoff_multiplier: f64,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt >= max_retries => return Err(error),
            Err(_) => {
                let raw_secs = base_delay.as_secs_f64() * backoff_multiplier.powi(attempt as i32);
                let capped = if raw_secs.is_nan() { 0.0 } else { raw_secs.clamp(0.0, MAX_RETRY_DELAY.as_secs_f64()) };
                let delay = Duration::from_secs_f64(capped);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Retry `operation` as `policy` dictates for each error it returns.
///
/// `operation` receives the zero-based attempt number. `max_retries_cap`
/// lowers (never raises) the per-kind budget. `on_failure` sees every failed
/// attempt and returns `false` to stop retrying early.
pub async fn retry_with_policy<T, F, Fut, G>(
    operation_name: &str,
    policy: &ErrorPolicy,
    max_retries_cap: Option<u32>,
    mut operation: F,
    mut on_failure: G,
) -> Result<T, AnalysisError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AnalysisError>>,
    G: FnMut(&AnalysisError) -> bool,
{
    let mut attempt = 0u32;
    loop {
        let error = match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };
        if !on_failure(&error) {
            return Err(error);
        }
        let Some(backoff) = policy.policy_for(&error) else {
            return Err(error);
        };
        let budget = max_retries_cap.map_or(backoff.max_retries, |cap| cap.min(backoff.max_retries));
        if attempt >= budget {
            return Err(error);
        }

        let delay = backoff.delay_for(attempt);
        RetryScheduled {
            operation: operation_name,
            attempt: attempt + 1,
            max_retries: budget,
            delay,
            error: &error,
        }
        .log();
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_exponential_delay_is_capped() {
        let policy = ErrorPolicy::default().timeout;
        assert_eq!(policy.delay_for(0), Duration::from_millis(1_000));
        assert_eq!(policy.delay_for(1), Duration::from_millis(2_000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(4_000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(5_000));
    }

    #[test]
    fn test_linear_delay() {
        let policy = ErrorPolicy::default().worker;
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(300));
    }

    #[test]
    fn test_policy_selection_by_kind() {
        let policy = ErrorPolicy::default();
        let timeout = AnalysisError::timeout("slow", Duration::from_millis(5));
        assert_eq!(policy.policy_for(&timeout).map(|p| p.max_retries), Some(3));
        assert_eq!(
            policy.policy_for(&AnalysisError::engine("flaky", true)).map(|p| p.max_retries),
            Some(2)
        );
        assert!(policy.policy_for(&AnalysisError::engine("broken", false)).is_none());
        assert_eq!(
            policy.policy_for(&AnalysisError::worker("panic")).map(|p| p.max_retries),
            Some(3)
        );
        assert!(policy.policy_for(&AnalysisError::resource("missing")).is_none());
        assert!(policy.policy_for(&AnalysisError::configuration("bad")).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_succeeds_after_failures() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let started = tokio::time::Instant::now();
        let result: Result<u32, &str> = with_retry(
            move || async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n < 2 { Err("not yet") } else { Ok(n) }
            },
            3,
            Duration::from_millis(100),
            2.0,
        )
        .await;
        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 100ms + 200ms of backoff
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_returns_last_error_when_exhausted() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), String> = with_retry(
            move || async move { Err(format!("failure {}", counter.fetch_add(1, Ordering::SeqCst))) },
            2,
            Duration::from_millis(10),
            2.0,
        )
        .await;
        assert_eq!(result, Err("failure 2".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_caps_large_delays() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let started = tokio::time::Instant::now();
        let result: Result<(), &str> = with_retry(
            move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err("down")
            },
            1_100,
            Duration::from_secs(1),
            4.0,
        )
        .await;
        assert_eq!(result, Err("down"));
        assert_eq!(calls.load(Ordering::SeqCst), 1_101);
        assert!(started.elapsed() <= MAX_RETRY_DELAY * 1_100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_with_policy_never_retries_resource_errors() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), AnalysisError> = retry_with_policy(
            "test",
            &ErrorPolicy::default(),
            None,
            move |_| async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(AnalysisError::resource("dictionary missing"))
            },
            |_| true,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_with_policy_respects_cap_and_on_failure() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let failures = AtomicU32::new(0);
        let result: Result<(), AnalysisError> = retry_with_policy(
            "test",
            &ErrorPolicy::default(),
            Some(1),
            move |_| async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(AnalysisError::worker("crashed"))
            },
            |_| {
                failures.fetch_add(1, Ordering::SeqCst);
                true
            },
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(failures.load(Ordering::SeqCst), 2);

        let calls = AtomicU32::new(0);
        let counter = &calls;
        let _ = retry_with_policy::<(), _, _, _>(
            "test",
            &ErrorPolicy::default(),
            None,
            move |_| async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(AnalysisError::worker("crashed"))
            },
            |_| false,
        )
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_with_policy_recovers() {
        let result = retry_with_policy(
            "test",
            &ErrorPolicy::default(),
            None,
            |attempt| async move {
                if attempt == 0 {
                    Err(AnalysisError::engine("flaky", true))
                } else {
                    Ok(attempt)
                }
            },
            |_| true,
        )
        .await;
        assert_eq!(result, Ok(1));
    }
}
