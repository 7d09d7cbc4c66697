// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Test-only engine hooks with scriptable latency, failures and issues.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::backends::base::ManagedEngine;
use crate::errors::AnalysisError;
use crate::model::{
    Capability, EngineDescriptor, EngineIssue, EngineMode, EngineOptions, EngineOutput,
};
use crate::traits::EngineHooks;

pub struct StubHooks {
    descriptor: EngineDescriptor,
    delay: Duration,
    init_delay: Duration,
    issues: Vec<EngineIssue>,
    failure: Mutex<Option<AnalysisError>>,
    init_failure: AtomicBool,
    panics: AtomicBool,
    calls: AtomicUsize,
    completed: AtomicUsize,
    pub init_calls: AtomicUsize,
    pub shutdown_calls: AtomicUsize,
    last_options: Mutex<Option<EngineOptions>>,
    init_log: Option<Arc<Mutex<Vec<String>>>>,
}

impl StubHooks {
    pub fn new(id: &str) -> Self {
        Self {
            descriptor: EngineDescriptor::new(id, format!("Stub {}", id), "0.0.1")
                .with_capabilities([Capability::Grammar]),
            delay: Duration::ZERO,
            init_delay: Duration::ZERO,
            issues: Vec::new(),
            failure: Mutex::new(None),
            init_failure: AtomicBool::new(false),
            panics: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            init_calls: AtomicUsize::new(0),
            shutdown_calls: AtomicUsize::new(0),
            last_options: Mutex::new(None),
            init_log: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_init_delay(mut self, delay: Duration) -> Self {
        self.init_delay = delay;
        self
    }

    pub fn with_issue(mut self, issue: EngineIssue) -> Self {
        self.issues.push(issue);
        self
    }

    pub fn online(mut self) -> Self {
        self.descriptor = self.descriptor.with_mode(EngineMode::Online);
        self
    }

    pub fn failing(self, error: AnalysisError) -> Self {
        self.set_failure(Some(error));
        self
    }

    pub fn failing_init(self) -> Self {
        self.set_init_failure(true);
        self
    }

    /// Append this engine's id to `log` on every initialization attempt.
    pub fn with_init_log(mut self, log: Arc<Mutex<Vec<String>>>) -> Self {
        self.init_log = Some(log);
        self
    }

    /// Panic inside `process_internal` instead of returning.
    pub fn panicking(self) -> Self {
        self.panics.store(true, Ordering::SeqCst);
        self
    }

    pub fn set_failure(&self, error: Option<AnalysisError>) {
        *self.failure.lock() = error;
    }

    pub fn set_init_failure(&self, fail: bool) {
        self.init_failure.store(fail, Ordering::SeqCst);
    }

    /// Number of times `process_internal` was entered.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of `process_internal` calls that ran to the end of their delay.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn last_options(&self) -> Option<EngineOptions> {
        self.last_options.lock().clone()
    }

    pub fn into_engine(self) -> Arc<ManagedEngine<StubHooks>> {
        Arc::new(ManagedEngine::new(self))
    }
}

#[async_trait]
impl EngineHooks for StubHooks {
    fn descriptor(&self) -> &EngineDescriptor {
        &self.descriptor
    }

    async fn initialize_internal(&self) -> Result<(), AnalysisError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(log) = &self.init_log {
            log.lock().push(self.descriptor.id.clone());
        }
        if !self.init_delay.is_zero() {
            tokio::time::sleep(self.init_delay).await;
        }
        if self.init_failure.load(Ordering::SeqCst) {
            return Err(AnalysisError::initialization("simulated initialization failure"));
        }
        Ok(())
    }

    async fn process_internal(
        &self,
        _text: &str,
        options: &EngineOptions,
        _cancel: &CancellationToken,
    ) -> Result<EngineOutput, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_options.lock() = Some(options.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);

        if self.panics.load(Ordering::SeqCst) {
            panic!("stub engine '{}' panicked", self.descriptor.id);
        }
        if let Some(error) = self.failure.lock().clone() {
            return Err(error);
        }
        Ok(EngineOutput::with_issues(self.issues.clone()))
    }

    async fn shutdown_internal(&self) -> Result<(), AnalysisError> {
        self.shutdown_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
