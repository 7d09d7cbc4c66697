// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human readable line and
//! [`StructuredLog`] to emit it at the right level with structured fields.
//!
//! # Organization
//!
//! * `orchestrator` - initialization, dispatch and configuration events
//! * `engine` - per-engine lifecycle and invocation events
//! * `resilience` - circuit breaker and retry events
//! * `cache` - result cache events

pub mod cache;
pub mod engine;
pub mod orchestrator;
pub mod resilience;

use tracing::Span;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the event.
    fn log(&self);

    /// Build a span carrying the same fields.
    fn span(&self, name: &str) -> Span;
}
