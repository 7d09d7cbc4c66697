// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for circuit breaker and retry events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Circuit opened: the engine is excluded from dispatch.
///
/// # Log Level
/// `warn!` - Degraded behavior
///
/// # Example
/// ```
/// use the_proofreader::observability::messages::resilience::CircuitOpened;
/// use std::time::Duration;
///
/// let msg = CircuitOpened {
///     engine_id: "grammar",
///     failure_count: 5,
///     window: Duration::from_secs(60),
/// };
///
/// assert!(msg.to_string().contains("grammar"));
/// ```
pub struct CircuitOpened<'a> {
    pub engine_id: &'a str,
    pub failure_count: usize,
    pub window: Duration,
}

impl Display for CircuitOpened<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Circuit opened for engine '{}': {} failures within {:?}",
            self.engine_id, self.failure_count, self.window
        )
    }
}

impl StructuredLog for CircuitOpened<'_> {
    fn log(&self) {
        tracing::warn!(
            engine_id = self.engine_id,
            failure_count = self.failure_count,
            window_secs = self.window.as_secs(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "circuit_opened",
            span_name = name,
            engine_id = self.engine_id,
            failure_count = self.failure_count,
        )
    }
}

/// Circuit closed after a quiet period; the engine is eligible again.
///
/// # Log Level
/// `info!` - Important operational event
pub struct CircuitClosed<'a> {
    pub engine_id: &'a str,
    pub quiet_for: Duration,
}

impl Display for CircuitClosed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Circuit closed for engine '{}' after {:?} without failures",
            self.engine_id, self.quiet_for
        )
    }
}

impl StructuredLog for CircuitClosed<'_> {
    fn log(&self) {
        tracing::info!(
            engine_id = self.engine_id,
            quiet_for_secs = self.quiet_for.as_secs(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "circuit_closed",
            span_name = name,
            engine_id = self.engine_id,
        )
    }
}

/// A failed operation will be retried after a delay.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct RetryScheduled<'a> {
    pub operation: &'a str,
    /// One-based number of the upcoming retry.
    pub attempt: u32,
    pub max_retries: u32,
    pub delay: Duration,
    pub error: &'a dyn std::error::Error,
}

impl Display for RetryScheduled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Retrying '{}' ({}/{}) in {:?} after: {}",
            self.operation, self.attempt, self.max_retries, self.delay, self.error
        )
    }
}

impl StructuredLog for RetryScheduled<'_> {
    fn log(&self) {
        tracing::debug!(
            operation = self.operation,
            attempt = self.attempt,
            max_retries = self.max_retries,
            delay_ms = self.delay.as_millis() as u64,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "retry",
            span_name = name,
            operation = self.operation,
            attempt = self.attempt,
        )
    }
}
