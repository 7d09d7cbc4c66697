// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use super::{EngineDescriptor, EngineMode};

/// Self-reported runtime status of an engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineStatus {
    pub id: String,
    pub name: String,
    pub initialized: bool,
    pub healthy: bool,
    pub last_error: Option<String>,
    pub processing_count: u64,
    /// Incremental mean over every completed call.
    pub average_processing_time_ms: f64,
}

/// Lifecycle of an engine as seen by the orchestrator.
///
/// ```text
/// registered -> initializing -> ready <-> disabled (breaker open)
///                    |                          |
///                    v                          v
///               registered (failed)          shutdown
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Registered,
    Initializing,
    Ready,
    Disabled,
    Shutdown,
}

/// Everything the host application can learn about one registered engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineInfo {
    pub id: String,
    pub name: String,
    pub version: String,
    pub capabilities: Vec<super::Capability>,
    pub mode: EngineMode,
    pub state: EngineState,
    /// Enabled in the active configuration.
    pub enabled: bool,
    pub failure_count: usize,
    pub status: EngineStatus,
}

impl EngineInfo {
    pub fn new(
        descriptor: &EngineDescriptor,
        state: EngineState,
        enabled: bool,
        failure_count: usize,
        status: EngineStatus,
    ) -> Self {
        Self {
            id: descriptor.id.clone(),
            name: descriptor.name.clone(),
            version: descriptor.version.clone(),
            capabilities: descriptor.capabilities.clone(),
            mode: descriptor.mode,
            state,
            enabled,
            failure_count,
            status,
        }
    }
}

/// Aggregate request statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub average_processing_time_ms: f64,
    /// Share of cache lookups that hit, in `[0, 1]`.
    pub cache_hit_rate: f64,
    pub total_processed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub issues: Vec<String>,
}

/// Snapshot returned by the status endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub initialized: bool,
    pub engines: Vec<EngineInfo>,
    pub performance: PerformanceStats,
    pub health: HealthReport,
}
