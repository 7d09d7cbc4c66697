// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use std::time::Duration;

use super::{GrammarRulesEngine, PunctuationEngine, SpellingEngine};
use crate::backends::base::ManagedEngine;
use crate::errors::ValidationError;
use crate::traits::AnalysisEngine;

/// Factory for creating local (in-process) engine instances
pub struct LocalEngineFactory;

impl LocalEngineFactory {
    /// Create an engine from its configured implementation name
    ///
    /// - "grammar_rules" -> GrammarRulesEngine
    /// - "spelling" -> SpellingEngine
    /// - "punctuation" -> PunctuationEngine
    ///
    /// The engine is registered under `engine_id`, not under the implementation name,
    /// so one implementation can back several differently configured engines.
    pub fn create_engine(
        engine_id: &str,
        implementation: &str,
        default_timeout: Duration,
    ) -> Result<Arc<dyn AnalysisEngine>, ValidationError> {
        match implementation {
            "grammar_rules" => Ok(Arc::new(
                ManagedEngine::new(GrammarRulesEngine::new(engine_id))
                    .with_default_timeout(default_timeout),
            )),
            "spelling" => Ok(Arc::new(
                ManagedEngine::new(SpellingEngine::new(engine_id))
                    .with_default_timeout(default_timeout),
            )),
            "punctuation" => Ok(Arc::new(
                ManagedEngine::new(PunctuationEngine::new(engine_id))
                    .with_default_timeout(default_timeout),
            )),
            _ => Err(ValidationError::UnknownImplementation {
                engine_id: engine_id.to_string(),
                implementation: implementation.to_string(),
            }),
        }
    }

    /// List all available local engine implementations
    pub fn list_available_implementations() -> Vec<&'static str> {
        vec!["grammar_rules", "spelling", "punctuation"]
    }

    pub fn is_implementation_available(implementation: &str) -> bool {
        Self::list_available_implementations().contains(&implementation)
    }
}
