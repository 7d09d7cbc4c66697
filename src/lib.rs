// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;       // engine lifecycle base + local engines
pub mod cache;          // result cache
pub mod checker;        // host-facing API
pub mod config;         // config loading, validation, runtime builder
pub mod consolidation;  // dedup + priority ordering
pub mod errors;         // error handling
pub mod model;          // shared data types
pub mod observability;
pub mod orchestrator;   // registry, initialization, parallel dispatch
pub mod resilience;     // circuit breaker, retry, timeouts
pub mod traits;         // engine contract
