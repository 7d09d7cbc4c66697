// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for orchestrator lifecycle, dispatch and configuration events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Orchestrator initialization started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_proofreader::observability::messages::orchestrator::InitializationStarted;
///
/// let msg = InitializationStarted {
///     engine_count: 3,
///     sequenced: 2,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct InitializationStarted {
    pub engine_count: usize,
    /// Engines covered by the configured init sequence.
    pub sequenced: usize,
}

impl Display for InitializationStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Initializing {} engines ({} in configured sequence)",
            self.engine_count, self.sequenced
        )
    }
}

impl StructuredLog for InitializationStarted {
    fn log(&self) {
        tracing::info!(
            engine_count = self.engine_count,
            sequenced = self.sequenced,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "initialization",
            span_name = name,
            engine_count = self.engine_count,
        )
    }
}

/// Orchestrator initialization finished.
///
/// # Log Level
/// `info!` - Important operational event
pub struct InitializationCompleted {
    pub ready: usize,
    pub failed: usize,
    pub duration: Duration,
}

impl Display for InitializationCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Initialization completed in {:?}: {} ready, {} failed",
            self.duration, self.ready, self.failed
        )
    }
}

impl StructuredLog for InitializationCompleted {
    fn log(&self) {
        tracing::info!(
            ready = self.ready,
            failed = self.failed,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "initialization_completed",
            span_name = name,
            ready = self.ready,
            failed = self.failed,
        )
    }
}

/// Parallel dispatch of one request started.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct DispatchStarted {
    pub engine_count: usize,
    pub max_concurrency: usize,
    pub text_len: usize,
}

impl Display for DispatchStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dispatching {} bytes to {} engines, max_concurrency={}",
            self.text_len, self.engine_count, self.max_concurrency
        )
    }
}

impl StructuredLog for DispatchStarted {
    fn log(&self) {
        tracing::debug!(
            engine_count = self.engine_count,
            max_concurrency = self.max_concurrency,
            text_len = self.text_len,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "dispatch",
            span_name = name,
            engine_count = self.engine_count,
            max_concurrency = self.max_concurrency,
        )
    }
}

/// A request finished.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RequestCompleted {
    pub engines_used: usize,
    pub engines_failed: usize,
    pub issue_count: usize,
    pub cache_hit: bool,
    pub duration: Duration,
}

impl Display for RequestCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Request completed in {:?}: {} issues from {} engines ({} failed, cache_hit={})",
            self.duration, self.issue_count, self.engines_used, self.engines_failed, self.cache_hit
        )
    }
}

impl StructuredLog for RequestCompleted {
    fn log(&self) {
        tracing::info!(
            engines_used = self.engines_used,
            engines_failed = self.engines_failed,
            issue_count = self.issue_count,
            cache_hit = self.cache_hit,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "request_completed",
            span_name = name,
            issue_count = self.issue_count,
        )
    }
}

/// The overall request deadline passed before every engine settled.
///
/// # Log Level
/// `warn!` - Degraded behavior
pub struct RequestDeadlineExceeded<'a> {
    pub pending: &'a [String],
    pub timeout: Duration,
}

impl Display for RequestDeadlineExceeded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Request deadline of {:?} exceeded; abandoning engines: {}",
            self.timeout,
            self.pending.join(", ")
        )
    }
}

impl StructuredLog for RequestDeadlineExceeded<'_> {
    fn log(&self) {
        tracing::warn!(
            pending = self.pending.len(),
            timeout_ms = self.timeout.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "request_deadline_exceeded",
            span_name = name,
            pending = self.pending.len(),
        )
    }
}

/// An engine was left out of a request's candidate set.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct EngineExcluded<'a> {
    pub engine_id: &'a str,
    pub reason: &'a str,
}

impl Display for EngineExcluded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Engine '{}' excluded from dispatch: {}", self.engine_id, self.reason)
    }
}

impl StructuredLog for EngineExcluded<'_> {
    fn log(&self) {
        tracing::debug!(engine_id = self.engine_id, reason = self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("engine_excluded", span_name = name, engine_id = self.engine_id)
    }
}

/// Engine registry changed.
///
/// # Log Level
/// `info!` - Important operational event
pub struct EngineRegistered<'a> {
    pub engine_id: &'a str,
    pub initialize_now: bool,
}

impl Display for EngineRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.initialize_now {
            write!(f, "Engine '{}' registered; initializing immediately", self.engine_id)
        } else {
            write!(f, "Engine '{}' registered", self.engine_id)
        }
    }
}

impl StructuredLog for EngineRegistered<'_> {
    fn log(&self) {
        tracing::info!(
            engine_id = self.engine_id,
            initialize_now = self.initialize_now,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("engine_registered", span_name = name, engine_id = self.engine_id)
    }
}

/// Engine removed from the registry.
///
/// # Log Level
/// `info!` - Important operational event
pub struct EngineUnregistered<'a> {
    pub engine_id: &'a str,
}

impl Display for EngineUnregistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Engine '{}' unregistered", self.engine_id)
    }
}

impl StructuredLog for EngineUnregistered<'_> {
    fn log(&self) {
        tracing::info!(engine_id = self.engine_id, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("engine_unregistered", span_name = name, engine_id = self.engine_id)
    }
}

/// A new configuration became active.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ConfigurationReloaded {
    pub enabled_engines: usize,
    pub concurrency: usize,
}

impl Display for ConfigurationReloaded {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Configuration reloaded: {} engines explicitly enabled, concurrency={}",
            self.enabled_engines, self.concurrency
        )
    }
}

impl StructuredLog for ConfigurationReloaded {
    fn log(&self) {
        tracing::info!(
            enabled_engines = self.enabled_engines,
            concurrency = self.concurrency,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("configuration_reloaded", span_name = name)
    }
}
