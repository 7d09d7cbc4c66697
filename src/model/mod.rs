// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Data model shared by engines, the orchestrator and the host application.

mod correction;
mod descriptor;
mod issue;
mod options;
mod result;
mod status;

pub use correction::{apply_correction, Correction};
pub use descriptor::{Capability, EngineDescriptor, EngineMode};
pub use issue::{EngineIssue, Issue, IssueCategory, Severity, Suggestion, TextRange};
pub use options::{CheckOptions, EngineOptions, EngineOutput, Priority};
pub use result::{CheckResult, ResultMetadata, SCHEMA_VERSION};
pub use status::{
    EngineInfo, EngineState, EngineStatus, HealthReport, PerformanceStats, SystemStatus,
};
