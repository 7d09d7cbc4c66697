// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{AnalysisError, ConfigError};

/// How initialization and processing failures affect the overall operation.
///
/// * `Continue` - log the failure and carry on with the remaining engines
/// * `Degrade` - carry on, but report the orchestrator as unhealthy
/// * `Fail` - surface the failure to the caller as a hard error
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStrategy {
    #[default]
    Continue,
    Degrade,
    Fail,
}

/// Orchestrator-level failures. These are the only errors `process` surfaces.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Orchestrator is not initialized")]
    NotInitialized,

    #[error("Engine '{0}' is not registered")]
    EngineNotFound(String),

    #[error("Engine '{0}' is already registered")]
    DuplicateEngine(String),

    #[error("Engine '{engine_id}' failed to initialize: {source}")]
    InitializationFailed {
        engine_id: String,
        #[source]
        source: AnalysisError,
    },

    #[error("No engines available: every requested engine is disabled")]
    NoEnginesAvailable,

    #[error("All {} dispatched engines failed", .failures.len())]
    AllEnginesFailed { failures: Vec<AnalysisError> },

    #[error(transparent)]
    Configuration(#[from] ConfigError),
}
