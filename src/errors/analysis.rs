// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Typed error taxonomy shared by engines, the resilience layer and the orchestrator.
//!
//! Errors are plain values: every engine failure is converted into an
//! [`AnalysisError`] at the orchestrator boundary and travels through explicit
//! `Result` channels. The [`ErrorKind`] decides how the resilience layer treats
//! the failure (retry, give up, open the circuit).

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Category of an [`AnalysisError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Engine failed to initialize, or was used before initialization.
    Initialization,
    /// Engine-specific processing failure.
    Engine,
    /// A deadline elapsed before the operation finished.
    Timeout,
    /// The execution unit running the engine failed (panic, cancelled task, closed semaphore).
    Worker,
    /// A required resource is missing. Never recoverable.
    Resource,
    /// Invalid configuration. Never recoverable.
    Configuration,
    Unknown,
}

impl ErrorKind {
    /// Whether errors of this kind are recoverable when the caller doesn't say otherwise.
    pub fn default_recoverable(self) -> bool {
        matches!(self, ErrorKind::Timeout | ErrorKind::Worker)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Initialization => "initialization",
            ErrorKind::Engine => "engine",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Worker => "worker",
            ErrorKind::Resource => "resource",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure raised by (or on behalf of) an analysis engine.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{kind} error{}: {message}", engine_suffix(.engine_id))]
pub struct AnalysisError {
    pub kind: ErrorKind,
    pub message: String,
    pub engine_id: Option<String>,
    pub recoverable: bool,
    pub details: BTreeMap<String, serde_json::Value>,
}

fn engine_suffix(engine_id: &Option<String>) -> String {
    match engine_id {
        Some(id) => format!(" in engine '{}'", id),
        None => String::new(),
    }
}

impl AnalysisError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            engine_id: None,
            recoverable: kind.default_recoverable(),
            details: BTreeMap::new(),
        }
    }

    pub fn initialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Initialization, message)
    }

    /// The error returned when `process` is called before a successful `initialize`.
    pub fn uninitialized(engine_id: &str) -> Self {
        Self::initialization(format!("engine '{}' is not initialized", engine_id))
            .with_engine(engine_id)
            .with_detail("reason", "uninitialized")
    }

    pub fn engine(message: impl Into<String>, recoverable: bool) -> Self {
        Self::new(ErrorKind::Engine, message).with_recoverable(recoverable)
    }

    pub fn timeout(message: impl Into<String>, after: Duration) -> Self {
        Self::new(ErrorKind::Timeout, message).with_detail("timeout_ms", after.as_millis() as u64)
    }

    pub fn worker(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Worker, message)
    }

    pub fn resource(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Resource, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }

    /// Attach the originating engine id, keeping an id that was already set.
    pub fn with_engine(mut self, engine_id: &str) -> Self {
        if self.engine_id.is_none() {
            self.engine_id = Some(engine_id.to_string());
        }
        self
    }

    pub fn with_recoverable(mut self, recoverable: bool) -> Self {
        self.recoverable = recoverable;
        self
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == ErrorKind::Timeout
    }
}
