// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Parallel fan-out of one request to its candidate engines.
//!
//! Every engine gets its own task. Each attempt acquires a permit from the
//! active snapshot's semaphore, runs in a task of its own under the engine's
//! deadline and a child of the request's cancellation token, and is retried
//! as the [`ErrorPolicy`] allows. A panicking engine surfaces as a worker
//! error for that attempt only.
//!
//! The dispatcher waits for every engine to settle, bounded by the overall
//! request deadline. Engines still running at that point are aborted and
//! reported as timed out; their tokens are cancelled so no work outlives the
//! request.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::consolidation::EngineResult;
use crate::errors::AnalysisError;
use crate::model::{EngineOptions, EngineOutput};
use crate::observability::messages::engine::EngineInvocationFailed;
use crate::observability::messages::orchestrator::{DispatchStarted, RequestDeadlineExceeded};
use crate::observability::messages::StructuredLog;
use crate::resilience::{retry_with_policy, with_deadline, CircuitBreaker, ErrorPolicy};
use crate::traits::AnalysisEngine;

/// One engine invocation, fully resolved against the active configuration.
pub(crate) struct EngineCall {
    pub engine_id: String,
    pub engine: Arc<dyn AnalysisEngine>,
    pub options: EngineOptions,
    pub timeout: Duration,
    pub max_retries: Option<u32>,
}

#[derive(Debug, Default)]
pub(crate) struct DispatchOutcome {
    /// Successful engines, in dispatch order.
    pub succeeded: Vec<EngineResult>,
    pub failed: Vec<AnalysisError>,
}

pub(crate) struct Dispatcher {
    pub semaphore: Arc<Semaphore>,
    pub max_concurrency: usize,
    pub breaker: Arc<CircuitBreaker>,
    pub policy: ErrorPolicy,
    pub request_timeout: Duration,
}

impl Dispatcher {
    pub async fn dispatch(&self, text: &str, calls: Vec<EngineCall>) -> DispatchOutcome {
        let started = DispatchStarted {
            engine_count: calls.len(),
            max_concurrency: self.max_concurrency,
            text_len: text.len(),
        };
        started.log();
        let span = started.span("dispatch");

        let request_token = CancellationToken::new();
        let _cancel_on_exit = request_token.clone().drop_guard();
        let deadline = Instant::now() + self.request_timeout;
        let text: Arc<str> = Arc::from(text);

        let mut tasks = Vec::with_capacity(calls.len());
        for call in calls {
            let engine_id = call.engine_id.clone();
            let task = tokio::spawn(
                invoke(
                    call,
                    Arc::clone(&text),
                    Arc::clone(&self.semaphore),
                    Arc::clone(&self.breaker),
                    self.policy,
                    request_token.clone(),
                )
                .instrument(span.clone()),
            );
            tasks.push((engine_id, task));
        }

        let mut outcome = DispatchOutcome::default();
        let mut abandoned = Vec::new();
        for (engine_id, mut task) in tasks {
            match tokio::time::timeout_at(deadline, &mut task).await {
                Ok(Ok(Ok(output))) => outcome.succeeded.push(EngineResult::new(engine_id, output)),
                Ok(Ok(Err(error))) => outcome.failed.push(error),
                Ok(Err(join_error)) => {
                    self.breaker.record_failure(&engine_id);
                    outcome.failed.push(
                        AnalysisError::worker(format!("engine task failed: {}", join_error))
                            .with_engine(&engine_id),
                    );
                }
                Err(_) => {
                    task.abort();
                    self.breaker.record_failure(&engine_id);
                    outcome.failed.push(
                        AnalysisError::timeout(
                            format!("request deadline of {:?} exceeded", self.request_timeout),
                            self.request_timeout,
                        )
                        .with_recoverable(false)
                        .with_engine(&engine_id),
                    );
                    abandoned.push(engine_id);
                }
            }
        }

        if !abandoned.is_empty() {
            RequestDeadlineExceeded {
                pending: &abandoned,
                timeout: self.request_timeout,
            }
            .log();
            request_token.cancel();
        }
        outcome
    }
}

/// Run one engine to completion, retrying per policy.
///
/// Every failed attempt counts against the engine's circuit breaker; retrying
/// stops as soon as the breaker opens or the request is cancelled.
async fn invoke(
    call: EngineCall,
    text: Arc<str>,
    semaphore: Arc<Semaphore>,
    breaker: Arc<CircuitBreaker>,
    policy: ErrorPolicy,
    request_token: CancellationToken,
) -> Result<EngineOutput, AnalysisError> {
    let started = Instant::now();
    let label = format!("engine '{}'", call.engine_id);
    let mut failures = 0u32;

    let result = {
        let call = &call;
        let text = &text;
        let semaphore = &semaphore;
        let token = &request_token;
        let label = label.as_str();
        retry_with_policy(
            label,
            &policy,
            call.max_retries,
            move |_attempt| attempt(call, text, semaphore, token, label),
            |_error| {
                failures += 1;
                let opened = breaker.record_failure(&call.engine_id);
                !opened && !request_token.is_cancelled()
            },
        )
        .await
    };

    if let Err(error) = &result {
        EngineInvocationFailed {
            engine_id: &call.engine_id,
            attempts: failures,
            elapsed: started.elapsed(),
            error,
        }
        .log();
    }
    result
}

async fn attempt(
    call: &EngineCall,
    text: &Arc<str>,
    semaphore: &Arc<Semaphore>,
    request_token: &CancellationToken,
    label: &str,
) -> Result<EngineOutput, AnalysisError> {
    let permit = Arc::clone(semaphore).acquire_owned().await.map_err(|e| {
        AnalysisError::worker(format!("dispatch permit unavailable: {}", e)).with_engine(&call.engine_id)
    })?;

    let engine = Arc::clone(&call.engine);
    let text = Arc::clone(text);
    let options = call.options.clone();
    let timeout = call.timeout;
    let token = request_token.child_token();
    let label = label.to_string();

    let unit = tokio::spawn(async move {
        let _permit = permit;
        with_deadline(engine.process(&text, &options, token.clone()), timeout, &token, &label).await
    });

    let result = match unit.await {
        Ok(result) => result,
        Err(join_error) => Err(AnalysisError::worker(format!("engine task failed: {}", join_error))),
    };
    result.map_err(|error| error.with_engine(&call.engine_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::StubHooks;
    use crate::errors::ErrorKind;
    use crate::model::{EngineIssue, IssueCategory, TextRange};

    fn dispatcher(concurrency: usize, request_timeout: Duration) -> Dispatcher {
        Dispatcher {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            max_concurrency: concurrency,
            breaker: Arc::new(CircuitBreaker::default()),
            policy: ErrorPolicy::default(),
            request_timeout,
        }
    }

    async fn call(hooks: StubHooks, timeout: Duration, max_retries: Option<u32>) -> (EngineCall, Arc<crate::backends::base::ManagedEngine<StubHooks>>) {
        let engine = hooks.into_engine();
        engine.initialize().await.unwrap();
        let call = EngineCall {
            engine_id: engine.id().to_string(),
            engine: engine.clone(),
            options: EngineOptions::default(),
            timeout,
            max_retries,
        };
        (call, engine)
    }

    fn issue() -> EngineIssue {
        EngineIssue::new("i", IssueCategory::Grammar, "Agreement", TextRange::new(5, 8))
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_all_and_excludes_timeouts() {
        let (fast, _) = call(
            StubHooks::new("A").with_delay(Duration::from_millis(50)).with_issue(issue()),
            Duration::from_millis(500),
            None,
        )
        .await;
        let (slow, slow_engine) = call(
            StubHooks::new("B").with_delay(Duration::from_millis(600)),
            Duration::from_millis(500),
            Some(0),
        )
        .await;

        let dispatcher = dispatcher(4, Duration::from_secs(30));
        let outcome = dispatcher.dispatch("This are a test.", vec![fast, slow]).await;

        assert_eq!(outcome.succeeded.len(), 1);
        assert_eq!(outcome.succeeded[0].engine_id, "A");
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].kind, ErrorKind::Timeout);
        assert_eq!(outcome.failed[0].engine_id.as_deref(), Some("B"));
        assert_eq!(slow_engine.hooks().completed(), 0);
        assert_eq!(dispatcher.breaker.failure_count("B"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recoverable_failures_are_retried() {
        let (flaky, engine) = call(
            StubHooks::new("flaky").failing(AnalysisError::engine("upstream hiccup", true)),
            Duration::from_secs(1),
            None,
        )
        .await;

        let dispatcher = dispatcher(4, Duration::from_secs(30));
        let outcome = dispatcher.dispatch("text", vec![flaky]).await;

        assert_eq!(outcome.failed.len(), 1);
        // One attempt plus two engine-error retries.
        assert_eq!(engine.hooks().calls(), 3);
        assert_eq!(dispatcher.breaker.failure_count("flaky"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panics_become_worker_errors() {
        let (panicking, engine) = call(StubHooks::new("boom").panicking(), Duration::from_secs(1), Some(1)).await;
        let (healthy, _) = call(StubHooks::new("ok").with_issue(issue()), Duration::from_secs(1), None).await;

        let dispatcher = dispatcher(4, Duration::from_secs(30));
        let outcome = dispatcher.dispatch("text", vec![panicking, healthy]).await;

        assert_eq!(outcome.succeeded.len(), 1);
        assert_eq!(outcome.failed[0].kind, ErrorKind::Worker);
        assert_eq!(outcome.failed[0].engine_id.as_deref(), Some("boom"));
        assert_eq!(engine.hooks().calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_deadline_abandons_stragglers() {
        let (slow, engine) = call(
            StubHooks::new("slow").with_delay(Duration::from_secs(10)),
            Duration::from_secs(20),
            None,
        )
        .await;

        let dispatcher = dispatcher(4, Duration::from_secs(1));
        let started = Instant::now();
        let outcome = dispatcher.dispatch("text", vec![slow]).await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(outcome.failed.len(), 1);
        assert!(outcome.failed[0].is_timeout());

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(engine.hooks().completed(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_is_bounded() {
        let mut calls = Vec::new();
        for id in ["a", "b", "c"] {
            let (c, _) = call(
                StubHooks::new(id).with_delay(Duration::from_millis(100)),
                Duration::from_secs(1),
                None,
            )
            .await;
            calls.push(c);
        }

        let dispatcher = dispatcher(1, Duration::from_secs(30));
        let started = Instant::now();
        let outcome = dispatcher.dispatch("text", calls).await;

        assert_eq!(outcome.succeeded.len(), 3);
        assert!(started.elapsed() >= Duration::from_millis(300));
    }
}
