// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging throughout The Proofreader. Message types follow a struct-based pattern
//! with `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep structured fields and human readable text in one place
//! * Provide consistent, structured logging output
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::orchestrator` - initialization, dispatch and configuration events
//! * `messages::engine` - per-engine lifecycle and invocation events
//! * `messages::resilience` - circuit breaker and retry events
//! * `messages::cache` - result cache events
//!
//! # Usage
//!
//! ```rust
//! use the_proofreader::observability::messages::engine::EngineShutdownFailed;
//! use the_proofreader::observability::messages::StructuredLog;
//! use the_proofreader::errors::AnalysisError;
//!
//! let error = AnalysisError::resource("dictionary handle already closed");
//! EngineShutdownFailed {
//!     engine_id: "spelling",
//!     error: &error,
//! }
//! .log();
//! ```

pub mod messages;
