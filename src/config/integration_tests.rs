// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

#[cfg(test)]
mod integration_tests {
    use std::time::Duration;

    use crate::config::{load_and_validate_config, DedupStrategy, RuntimeBuilder};
    use crate::errors::FallbackStrategy;
    use crate::model::{CheckOptions, IssueCategory};

    /// The shipped YAML demo configuration loads and validates
    #[test]
    fn test_demo_yaml_loading() {
        let config = load_and_validate_config("configs/demo.yaml").unwrap();

        assert_eq!(config.concurrency, 4);
        assert_eq!(config.fallback_strategy, FallbackStrategy::Continue);
        assert_eq!(config.init_sequence, vec!["spelling", "grammar", "punctuation"]);
        assert_eq!(config.cache.ttl(), Some(Duration::from_secs(300)));
        assert_eq!(config.consolidation.dedup_strategy, DedupStrategy::Overlap);
        assert_eq!(config.consolidation.max_suggestions, 3);
        assert_eq!(config.consolidation.priority_rules.len(), 2);

        assert_eq!(config.engines.len(), 3);
        assert_eq!(config.engine_timeout("punctuation"), Duration::from_millis(250));
        assert_eq!(config.engine_max_retries("grammar"), Some(1));
        assert_eq!(config.engine_settings("spelling").unwrap().dictionary, vec!["proofreader", "tokio"]);
    }

    /// The TOML demo configuration loads and validates, with unset sections defaulted
    #[test]
    fn test_demo_toml_loading() {
        let config = load_and_validate_config("configs/demo.toml").unwrap();

        assert_eq!(config.concurrency, 2);
        assert_eq!(config.fallback_strategy, FallbackStrategy::Fail);
        assert!(!config.cache.enabled);
        assert_eq!(config.retry.timeout.max_retries, 1);
        assert_eq!(config.retry.engine.max_retries, 2);
        assert_eq!(config.circuit_breaker.failure_threshold, 5);
        assert!(!config.is_engine_enabled("punctuation"));
        assert_eq!(config.engine_timeout("spelling"), Duration::from_millis(1000));
    }

    /// Building a runtime from the YAML demo and checking text end to end
    #[tokio::test]
    async fn test_demo_yaml_end_to_end() {
        let config = load_and_validate_config("configs/demo.yaml").unwrap();
        let orchestrator = RuntimeBuilder::from_config(&config).await.unwrap();
        orchestrator.initialize().await.unwrap();

        let result = orchestrator
            .process("this are teh proofreader  demo", &CheckOptions::default())
            .await
            .unwrap();

        assert_eq!(result.metadata.engines_used, vec!["grammar", "punctuation", "spelling"]);
        let categories: Vec<IssueCategory> = result.issues.iter().map(|i| i.category).collect();
        assert!(categories.contains(&IssueCategory::Spelling));
        assert!(categories.contains(&IssueCategory::Typography));
        assert!(result.issues.iter().all(|i| i.suggestions.len() <= 3));
    }

    /// Disabled engines are registered but never dispatched
    #[tokio::test]
    async fn test_demo_toml_skips_disabled_engine() {
        let config = load_and_validate_config("configs/demo.toml").unwrap();
        let orchestrator = RuntimeBuilder::from_config(&config).await.unwrap();
        orchestrator.initialize().await.unwrap();

        assert_eq!(orchestrator.engines().len(), 3);
        let result = orchestrator
            .process("Teh  cat", &CheckOptions::default())
            .await
            .unwrap();
        assert_eq!(result.metadata.engines_used, vec!["grammar", "spelling"]);
    }
}
