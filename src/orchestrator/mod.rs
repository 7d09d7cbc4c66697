// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Engine orchestration.
//!
//! The [`Orchestrator`] owns the registered engines, initializes them in the
//! configured order, fans each request out to every eligible engine in
//! parallel and consolidates whatever the successful ones report.
//!
//! # Request flow
//!
//! 1. Capture the active configuration snapshot
//! 2. Short-circuit whitespace-only text, then consult the result cache
//! 3. Select candidates: requested (or all) engines that are ready, enabled,
//!    behind a closed circuit, and offline when speed is preferred
//! 4. Dispatch in parallel under the concurrency bound, per-engine deadlines
//!    and the overall request deadline
//! 5. Consolidate successes, apply the fallback strategy, cache clean results
//!
//! # Example
//! ```rust
//! use the_proofreader::backends::local::LocalEngineFactory;
//! use the_proofreader::config::OrchestratorConfig;
//! use the_proofreader::model::CheckOptions;
//! use the_proofreader::orchestrator::Orchestrator;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let orchestrator = Orchestrator::new(OrchestratorConfig::default()).unwrap();
//! let grammar = LocalEngineFactory::create_engine("grammar", "grammar_rules", Duration::from_secs(1)).unwrap();
//! orchestrator.register_engine(grammar).await.unwrap();
//! orchestrator.initialize().await.unwrap();
//!
//! let result = orchestrator.process("This are a test.", &CheckOptions::default()).await.unwrap();
//! assert_eq!(result.metadata.engines_used, vec!["grammar"]);
//! assert_eq!(result.issues[0].suggestions[0].text, "is");
//! # }
//! ```

mod dispatch;
#[allow(clippy::module_inception)]
mod orchestrator;
mod registry;
mod stats;


pub use orchestrator::Orchestrator;
