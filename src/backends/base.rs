// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Shared lifecycle for analysis engines.
//!
//! [`ManagedEngine`] wraps any [`EngineHooks`] implementation and turns it into
//! a full [`AnalysisEngine`]:
//!
//! - `initialize` and `shutdown` are idempotent and serialized against each other
//! - `process` before a successful `initialize` fails with an initialization error
//! - empty or whitespace-only text returns no issues without calling the hook
//! - every call races the hook against a deadline and cancels its token on expiry
//! - processing count, incremental mean latency, health and last error are tracked

use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::consts::DEFAULT_ENGINE_TIMEOUT_MS;
use crate::errors::AnalysisError;
use crate::model::{EngineDescriptor, EngineOptions, EngineOutput, EngineStatus};
use crate::resilience::with_deadline;
use crate::traits::{AnalysisEngine, EngineHooks};

pub const DEFAULT_ENGINE_TIMEOUT: Duration = Duration::from_millis(DEFAULT_ENGINE_TIMEOUT_MS);

#[derive(Debug, Default)]
struct StatusBook {
    initialized: bool,
    healthy: bool,
    last_error: Option<String>,
    processing_count: u64,
    average_processing_time_ms: f64,
}

impl StatusBook {
    fn record(&mut self, elapsed: Duration, outcome: Result<(), &AnalysisError>) {
        self.processing_count += 1;
        let sample = elapsed.as_secs_f64() * 1_000.0;
        self.average_processing_time_ms +=
            (sample - self.average_processing_time_ms) / self.processing_count as f64;

        match outcome {
            Ok(()) => self.healthy = true,
            Err(error) => {
                self.healthy = false;
                self.last_error = Some(error.to_string());
            }
        }
    }
}

pub struct ManagedEngine<H: EngineHooks> {
    hooks: H,
    default_timeout: Duration,
    // Serializes initialize/shutdown so concurrent callers run the hook once.
    lifecycle: tokio::sync::Mutex<()>,
    book: Mutex<StatusBook>,
}

impl<H: EngineHooks> ManagedEngine<H> {
    pub fn new(hooks: H) -> Self {
        Self {
            hooks,
            default_timeout: DEFAULT_ENGINE_TIMEOUT,
            lifecycle: tokio::sync::Mutex::new(()),
            book: Mutex::new(StatusBook::default()),
        }
    }

    /// Deadline used when the caller's options carry no `timeout_ms`.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn is_initialized(&self) -> bool {
        self.book.lock().initialized
    }

    fn deadline_for(&self, options: &EngineOptions) -> Duration {
        options
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(self.default_timeout)
    }
}

#[async_trait]
impl<H: EngineHooks> AnalysisEngine for ManagedEngine<H> {
    fn descriptor(&self) -> &EngineDescriptor {
        self.hooks.descriptor()
    }

    async fn initialize(&self) -> Result<(), AnalysisError> {
        let _guard = self.lifecycle.lock().await;
        if self.is_initialized() {
            return Ok(());
        }

        match self.hooks.initialize_internal().await {
            Ok(()) => {
                let mut book = self.book.lock();
                book.initialized = true;
                book.healthy = true;
                Ok(())
            }
            Err(error) => {
                let error = error.with_engine(self.id());
                let mut book = self.book.lock();
                book.healthy = false;
                book.last_error = Some(error.to_string());
                Err(error)
            }
        }
    }

    async fn process(
        &self,
        text: &str,
        options: &EngineOptions,
        cancel: CancellationToken,
    ) -> Result<EngineOutput, AnalysisError> {
        if !self.is_initialized() {
            return Err(AnalysisError::uninitialized(self.id()));
        }
        if text.trim().is_empty() {
            return Ok(EngineOutput::empty());
        }

        let started = Instant::now();
        let deadline = self.deadline_for(options);
        let label = format!("engine '{}'", self.id());
        let result = with_deadline(
            self.hooks.process_internal(text, options, &cancel),
            deadline,
            &cancel,
            &label,
        )
        .await
        .map_err(|e| e.with_engine(self.id()));

        self.book
            .lock()
            .record(started.elapsed(), result.as_ref().map(|_| ()));
        result
    }

    async fn shutdown(&self) -> Result<(), AnalysisError> {
        let _guard = self.lifecycle.lock().await;
        if !self.is_initialized() {
            return Ok(());
        }

        let result = self.hooks.shutdown_internal().await;
        self.book.lock().initialized = false;
        result.map_err(|e| e.with_engine(self.id()))
    }

    fn status(&self) -> EngineStatus {
        let book = self.book.lock();
        let descriptor = self.hooks.descriptor();
        EngineStatus {
            id: descriptor.id.clone(),
            name: descriptor.name.clone(),
            initialized: book.initialized,
            healthy: book.healthy,
            last_error: book.last_error.clone(),
            processing_count: book.processing_count,
            average_processing_time_ms: book.average_processing_time_ms,
        }
    }
}
