// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Host-facing API.
//!
//! [`TextChecker`] wraps an initialized [`Orchestrator`] with the operations a
//! host application needs: check text, apply a chosen suggestion, list
//! engines, reload configuration and report status.
//!
//! ```rust
//! use the_proofreader::checker::TextChecker;
//! use the_proofreader::config::{EngineSettings, OrchestratorConfig};
//! use the_proofreader::model::{CheckOptions, Correction};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut config = OrchestratorConfig::default();
//! config.engines.insert(
//!     "spelling".to_string(),
//!     EngineSettings { implementation: Some("spelling".to_string()), ..EngineSettings::default() },
//! );
//! let checker = TextChecker::from_config(&config).await.unwrap();
//!
//! let result = checker.check("Teh cat", &CheckOptions::default()).await.unwrap();
//! let correction = Correction::from_issue(&result.issues[0], 0).unwrap();
//! assert_eq!(checker.apply_correction(&result.text, &correction).unwrap(), "The cat");
//! # }
//! ```

use std::collections::HashSet;

use crate::backends::local::LocalEngineFactory;
use crate::config::{OrchestratorConfig, RuntimeBuilder};
use crate::errors::{ConfigError, CorrectionError, OrchestratorError};
use crate::model::{self, CheckOptions, CheckResult, Correction, EngineInfo, SystemStatus};
use crate::orchestrator::Orchestrator;

pub struct TextChecker {
    orchestrator: Orchestrator,
}

impl TextChecker {
    /// Wrap an orchestrator as is. Call [`Orchestrator::initialize`] first or
    /// every check fails with `NotInitialized`.
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }

    /// Build the configured local engines and initialize them.
    pub async fn from_config(config: &OrchestratorConfig) -> Result<Self, OrchestratorError> {
        let orchestrator = RuntimeBuilder::from_config(config).await?;
        orchestrator.initialize().await?;
        Ok(Self { orchestrator })
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub async fn check(&self, text: &str, options: &CheckOptions) -> Result<CheckResult, OrchestratorError> {
        self.orchestrator.process(text, options).await
    }

    /// Replace the correction's range in `text`. Neither `text` nor any
    /// result it came from is modified.
    pub fn apply_correction(&self, text: &str, correction: &Correction) -> Result<String, CorrectionError> {
        model::apply_correction(text, correction)
    }

    pub fn get_engines(&self) -> Vec<EngineInfo> {
        self.orchestrator.engines()
    }

    /// Hot-reload `config`. Local engines named by the new configuration that
    /// are not registered yet are created, registered and initialized.
    pub async fn configure(&self, config: OrchestratorConfig) -> Result<(), OrchestratorError> {
        let known: HashSet<String> = self.get_engines().into_iter().map(|e| e.id).collect();
        let mut additions = Vec::new();
        for (engine_id, settings) in &config.engines {
            let Some(implementation) = &settings.implementation else {
                continue;
            };
            if known.contains(engine_id) {
                continue;
            }
            let engine = LocalEngineFactory::create_engine(engine_id, implementation, config.engine_timeout(engine_id))
                .map_err(|e| ConfigError::Validation(vec![e]))?;
            additions.push(engine);
        }

        self.orchestrator.configure(config).await?;
        for engine in additions {
            self.orchestrator.register_engine(engine).await?;
        }
        Ok(())
    }

    pub fn get_status(&self) -> SystemStatus {
        self.orchestrator.status()
    }

    pub async fn shutdown(&self) {
        self.orchestrator.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineSettings;
    use crate::model::{IssueCategory, TextRange};

    fn local(implementation: &str) -> EngineSettings {
        EngineSettings {
            implementation: Some(implementation.to_string()),
            ..EngineSettings::default()
        }
    }

    async fn checker(engines: &[(&str, &str)]) -> TextChecker {
        let mut config = OrchestratorConfig::default();
        for (id, implementation) in engines {
            config.engines.insert(id.to_string(), local(implementation));
        }
        TextChecker::from_config(&config).await.unwrap()
    }

    #[tokio::test]
    async fn test_apply_correction_leaves_result_untouched() {
        let checker = checker(&[("spelling", "spelling"), ("grammar", "grammar_rules")]).await;
        let result = checker.check("Teh cat sat sat", &CheckOptions::default()).await.unwrap();
        let before = result.clone();

        let misspelling = result
            .issues
            .iter()
            .find(|i| i.category == IssueCategory::Spelling)
            .unwrap();
        assert_eq!(misspelling.range, TextRange::new(0, 3));
        let correction = Correction::from_issue(misspelling, 0).unwrap();

        let corrected = checker.apply_correction(&result.text, &correction).unwrap();
        assert_eq!(corrected, "The cat sat sat");
        assert_eq!(result, before);
    }

    #[tokio::test]
    async fn test_apply_correction_rejects_bad_ranges() {
        let checker = checker(&[]).await;
        let correction = Correction::new(TextRange::new(2, 40), "x");
        assert!(matches!(
            checker.apply_correction("Teh cat", &correction),
            Err(CorrectionError::OutOfBounds { .. })
        ));
    }

    #[tokio::test]
    async fn test_configure_adds_and_toggles_engines() {
        let checker = checker(&[("grammar", "grammar_rules")]).await;
        let first = checker.check("This are teh test.", &CheckOptions::default()).await.unwrap();
        assert_eq!(first.metadata.engines_used, vec!["grammar"]);

        let mut config = OrchestratorConfig::default();
        config.engines.insert("grammar".into(), local("grammar_rules"));
        config.engines.insert("spelling".into(), local("spelling"));
        checker.configure(config.clone()).await.unwrap();

        let engines = checker.get_engines();
        assert_eq!(engines.len(), 2);
        assert!(engines.iter().all(|e| e.status.initialized));
        let second = checker.check("This are teh test.", &CheckOptions::default()).await.unwrap();
        assert_eq!(second.metadata.engines_used, vec!["grammar", "spelling"]);

        config.engines.get_mut("grammar").unwrap().enabled = false;
        config.engines.get_mut("spelling").unwrap().dictionary = vec!["teh".into()];
        checker.configure(config).await.unwrap();

        let third = checker.check("This are teh test.", &CheckOptions::default()).await.unwrap();
        assert_eq!(third.metadata.engines_used, vec!["spelling"]);
        assert!(third.issues.is_empty());
        assert!(!checker.get_engines()[0].enabled);
    }

    #[tokio::test]
    async fn test_get_status() {
        let checker = checker(&[("spelling", "spelling")]).await;
        checker.check("Teh cat", &CheckOptions::default()).await.unwrap();

        let status = checker.get_status();
        assert!(status.initialized);
        assert!(status.health.healthy);
        assert_eq!(status.performance.total_processed, 1);
        assert_eq!(status.engines[0].id, "spelling");

        checker.shutdown().await;
        assert!(!checker.get_status().initialized);
        assert!(!checker.get_status().health.healthy);
    }
}
