// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Failure isolation for engine calls.
//!
//! * [`CircuitBreaker`] - per-engine failure gate, owned by the orchestrator
//!   (never a process-wide singleton, so tests get isolated state)
//! * [`with_retry`] / [`retry_with_policy`] - exponential or linear backoff
//! * [`with_timeout`] / [`with_deadline`] - bound latency; `with_deadline`
//!   also cancels the token so abandoned work stops instead of leaking

pub mod circuit_breaker;
pub mod retry;
pub mod timeout;

pub use circuit_breaker::{BreakerSnapshot, CircuitBreaker, CircuitBreakerConfig};
pub use retry::{retry_with_policy, with_retry, BackoffPolicy, ErrorPolicy, MAX_RETRY_DELAY};
pub use timeout::{with_deadline, with_timeout};
