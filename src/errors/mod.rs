// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod analysis;
mod config;
mod correction;
mod orchestrator;

pub use analysis::{AnalysisError, ErrorKind};
pub use config::{ConfigError, ValidationError};
pub use correction::CorrectionError;
pub use orchestrator::{FallbackStrategy, OrchestratorError};
