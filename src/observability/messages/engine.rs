// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for per-engine lifecycle and invocation events.
//!
//! This module contains message types for logging events related to:
//! * Engine initialization and shutdown
//! * Engine invocation failures and timeouts
//! * Engine output sanitation

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Engine finished initializing.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_proofreader::observability::messages::engine::EngineInitialized;
/// use std::time::Duration;
///
/// let msg = EngineInitialized {
///     engine_id: "spelling",
///     duration: Duration::from_millis(12),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct EngineInitialized<'a> {
    pub engine_id: &'a str,
    pub duration: Duration,
}

impl Display for EngineInitialized<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Engine '{}' initialized in {:?}",
            self.engine_id, self.duration
        )
    }
}

impl StructuredLog for EngineInitialized<'_> {
    fn log(&self) {
        tracing::info!(
            engine_id = self.engine_id,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "engine_initialized",
            span_name = name,
            engine_id = self.engine_id,
        )
    }
}

/// Engine initialization failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct EngineInitializationFailed<'a> {
    pub engine_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for EngineInitializationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Engine '{}' failed to initialize: {}",
            self.engine_id, self.error
        )
    }
}

impl StructuredLog for EngineInitializationFailed<'_> {
    fn log(&self) {
        tracing::error!(
            engine_id = self.engine_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "engine_initialization_failed",
            span_name = name,
            engine_id = self.engine_id,
            error = %self.error,
        )
    }
}

/// Engine shutdown failed. Never propagated to callers.
///
/// # Log Level
/// `warn!` - Potential issue
pub struct EngineShutdownFailed<'a> {
    pub engine_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for EngineShutdownFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Engine '{}' failed to shut down cleanly: {}",
            self.engine_id, self.error
        )
    }
}

impl StructuredLog for EngineShutdownFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            engine_id = self.engine_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "engine_shutdown_failed",
            span_name = name,
            engine_id = self.engine_id,
        )
    }
}

/// An engine's contribution to a request was dropped after its final attempt failed.
///
/// # Log Level
/// `warn!` - Degraded behavior; the request still completes
pub struct EngineInvocationFailed<'a> {
    pub engine_id: &'a str,
    pub attempts: u32,
    pub elapsed: Duration,
    pub error: &'a dyn std::error::Error,
}

impl Display for EngineInvocationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Engine '{}' excluded from result after {} attempt(s) in {:?}: {}",
            self.engine_id, self.attempts, self.elapsed, self.error
        )
    }
}

impl StructuredLog for EngineInvocationFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            engine_id = self.engine_id,
            attempts = self.attempts,
            elapsed_ms = self.elapsed.as_millis() as u64,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "engine_invocation_failed",
            span_name = name,
            engine_id = self.engine_id,
            attempts = self.attempts,
        )
    }
}

/// An engine reported a range outside the text; it was clamped.
///
/// # Log Level
/// `warn!` - Misbehaving engine
pub struct EngineRangeClamped<'a> {
    pub engine_id: &'a str,
    pub issue_id: &'a str,
    pub reported: (usize, usize),
    pub clamped: (usize, usize),
}

impl Display for EngineRangeClamped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Engine '{}' issue '{}' range {}..{} clamped to {}..{}",
            self.engine_id,
            self.issue_id,
            self.reported.0,
            self.reported.1,
            self.clamped.0,
            self.clamped.1
        )
    }
}

impl StructuredLog for EngineRangeClamped<'_> {
    fn log(&self) {
        tracing::warn!(
            engine_id = self.engine_id,
            issue_id = self.issue_id,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "engine_range_clamped",
            span_name = name,
            engine_id = self.engine_id,
        )
    }
}
