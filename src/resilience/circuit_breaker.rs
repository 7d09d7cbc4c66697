// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::time::Instant;

use crate::observability::messages::resilience::{CircuitClosed, CircuitOpened};
use crate::observability::messages::StructuredLog;

/// Thresholds for opening and closing a circuit.
///
/// # Example
/// ```yaml
/// circuit_breaker:
///   failure_threshold: 5
///   window_seconds: 60
///   reset_after_seconds: 300
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Failures inside the window that open the circuit.
    pub failure_threshold: usize,
    pub window_seconds: u64,
    /// Quiet period after the last failure before an open circuit closes again.
    pub reset_after_seconds: u64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            window_seconds: 60,
            reset_after_seconds: 300,
        }
    }
}

impl CircuitBreakerConfig {
    fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }

    fn reset_after(&self) -> Duration {
        Duration::from_secs(self.reset_after_seconds)
    }
}

#[derive(Debug)]
struct BreakerState {
    /// Failure instants still inside the window.
    failures: VecDeque<Instant>,
    last_failure: Instant,
    disabled: bool,
}

/// Point-in-time view of one engine's breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerSnapshot {
    pub failure_count: usize,
    pub disabled: bool,
    pub since_last_failure: Duration,
}

struct Inner {
    config: CircuitBreakerConfig,
    states: HashMap<String, BreakerState>,
}

/// Per-engine circuit breaker registry.
///
/// State for an engine is created lazily on its first failure and dropped when
/// the circuit closes or on [`reset`](CircuitBreaker::reset). Closing is checked
/// lazily by [`is_disabled`](CircuitBreaker::is_disabled); there is no
/// background timer. All mutation happens under a single lock so concurrent
/// failures can't lose updates.
pub struct CircuitBreaker {
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                config,
                states: HashMap::new(),
            }),
        }
    }

    pub fn config(&self) -> CircuitBreakerConfig {
        self.inner.lock().config
    }

    /// Replace the thresholds. Existing failure history is kept.
    pub fn update_config(&self, config: CircuitBreakerConfig) {
        self.inner.lock().config = config;
    }

    /// Record one failure. Returns `true` when this failure opened the circuit.
    pub fn record_failure(&self, engine_id: &str) -> bool {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        let config = inner.config;
        let state = inner
            .states
            .entry(engine_id.to_string())
            .or_insert_with(|| BreakerState {
                failures: VecDeque::new(),
                last_failure: now,
                disabled: false,
            });

        state.failures.push_back(now);
        state.last_failure = now;
        while let Some(oldest) = state.failures.front() {
            if now.duration_since(*oldest) > config.window() {
                state.failures.pop_front();
            } else {
                break;
            }
        }

        if !state.disabled && state.failures.len() >= config.failure_threshold {
            state.disabled = true;
            CircuitOpened {
                engine_id,
                failure_count: state.failures.len(),
                window: config.window(),
            }
            .log();
            return true;
        }
        false
    }

    /// Whether dispatch to `engine_id` is currently blocked. Closes the
    /// circuit (and forgets the failure history) once the quiet period since
    /// the last failure has elapsed.
    pub fn is_disabled(&self, engine_id: &str) -> bool {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        let reset_after = inner.config.reset_after();
        let Some(state) = inner.states.get(engine_id) else {
            return false;
        };

        let quiet_for = now.duration_since(state.last_failure);
        if quiet_for < reset_after {
            return state.disabled;
        }

        let was_disabled = state.disabled;
        inner.states.remove(engine_id);
        if was_disabled {
            CircuitClosed {
                engine_id,
                quiet_for,
            }
            .log();
        }
        false
    }

    pub fn reset(&self, engine_id: &str) {
        self.inner.lock().states.remove(engine_id);
    }

    pub fn snapshot(&self, engine_id: &str) -> Option<BreakerSnapshot> {
        let now = Instant::now();
        let inner = self.inner.lock();
        inner.states.get(engine_id).map(|state| BreakerSnapshot {
            failure_count: state.failures.len(),
            disabled: state.disabled,
            since_last_failure: now.duration_since(state.last_failure),
        })
    }

    pub fn failure_count(&self, engine_id: &str) -> usize {
        self.snapshot(engine_id).map_or(0, |s| s.failure_count)
    }

    /// Ids of engines whose circuit is open right now, sorted.
    pub fn open_circuits(&self) -> Vec<String> {
        let ids: Vec<String> = self.inner.lock().states.keys().cloned().collect();
        let mut open: Vec<String> = ids.into_iter().filter(|id| self.is_disabled(id)).collect();
        open.sort();
        open
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}
