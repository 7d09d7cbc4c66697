// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration validation.
//!
//! [`validate_config`] runs every check and reports every problem it finds,
//! so a single pass over a broken file surfaces all of its mistakes:
//!
//! 1. **Ranges**: concurrency, timeouts, thresholds, cache and suggestion bounds
//! 2. **Init sequence**: no engine id listed twice
//! 3. **Priority rules**: each names an engine, a category, or both
//! 4. **Implementations**: every `implementation` is a known local engine
//!
//! # Example
//! ```rust
//! use the_proofreader::config::{validate_config, OrchestratorConfig};
//! use the_proofreader::errors::ValidationError;
//!
//! let mut config = OrchestratorConfig::default();
//! config.concurrency = 0;
//!
//! let errors = validate_config(&config).unwrap_err();
//! assert!(matches!(&errors[0], ValidationError::OutOfRange { field, .. } if field == "concurrency"));
//! ```

use std::collections::HashSet;

use crate::backends::local::LocalEngineFactory;
use crate::config::OrchestratorConfig;
use crate::errors::ValidationError;
use crate::resilience::BackoffPolicy;

/// Validates a configuration, returning every problem found.
pub fn validate_config(config: &OrchestratorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_ranges(config, &mut errors);
    validate_init_sequence(config, &mut errors);
    validate_priority_rules(config, &mut errors);
    validate_implementations(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn out_of_range(field: impl Into<String>, expected: &'static str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.into(),
        expected,
    }
}

fn in_unit_interval(value: f32) -> bool {
    value > 0.0 && value <= 1.0
}

fn validate_ranges(config: &OrchestratorConfig, errors: &mut Vec<ValidationError>) {
    if config.concurrency == 0 {
        errors.push(out_of_range("concurrency", ">= 1"));
    }
    if config.default_timeout_ms == 0 {
        errors.push(out_of_range("default_timeout_ms", "> 0"));
    }
    if config.request_timeout_ms == 0 {
        errors.push(out_of_range("request_timeout_ms", "> 0"));
    }

    if config.cache.enabled && config.cache.max_entries == 0 {
        errors.push(out_of_range("cache.max_entries", ">= 1 when the cache is enabled"));
    }
    if config.cache.ttl_seconds == Some(0) {
        errors.push(out_of_range("cache.ttl_seconds", "> 0 or omitted"));
    }

    let breaker = &config.circuit_breaker;
    if breaker.failure_threshold == 0 {
        errors.push(out_of_range("circuit_breaker.failure_threshold", ">= 1"));
    }
    if breaker.window_seconds == 0 {
        errors.push(out_of_range("circuit_breaker.window_seconds", "> 0"));
    }
    if breaker.reset_after_seconds == 0 {
        errors.push(out_of_range("circuit_breaker.reset_after_seconds", "> 0"));
    }

    let policies: [(&str, &BackoffPolicy); 3] = [
        ("retry.timeout", &config.retry.timeout),
        ("retry.engine", &config.retry.engine),
        ("retry.worker", &config.retry.worker),
    ];
    for (name, policy) in policies {
        if policy.multiplier < 1.0 {
            errors.push(out_of_range(format!("{}.multiplier", name), ">= 1.0"));
        }
        if policy.max_delay_ms < policy.base_delay_ms {
            errors.push(out_of_range(format!("{}.max_delay_ms", name), ">= base_delay_ms"));
        }
    }

    let consolidation = &config.consolidation;
    if !in_unit_interval(consolidation.overlap_threshold) {
        errors.push(out_of_range("consolidation.overlap_threshold", "in (0, 1]"));
    }
    if !in_unit_interval(consolidation.similarity_threshold) {
        errors.push(out_of_range("consolidation.similarity_threshold", "in (0, 1]"));
    }
    if consolidation.max_suggestions == 0 {
        errors.push(out_of_range("consolidation.max_suggestions", ">= 1"));
    }

    for (engine_id, settings) in &config.engines {
        if settings.timeout_ms == Some(0) {
            errors.push(out_of_range(format!("engines.{}.timeout_ms", engine_id), "> 0"));
        }
    }
}

fn validate_init_sequence(config: &OrchestratorConfig, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();

    for engine_id in &config.init_sequence {
        if !seen.insert(engine_id.as_str()) && reported.insert(engine_id.as_str()) {
            errors.push(ValidationError::DuplicateInitEntry {
                engine_id: engine_id.clone(),
            });
        }
    }
}

fn validate_priority_rules(config: &OrchestratorConfig, errors: &mut Vec<ValidationError>) {
    for (index, rule) in config.consolidation.priority_rules.iter().enumerate() {
        if rule.engine.is_none() && rule.category.is_none() {
            errors.push(ValidationError::EmptyPriorityRule { index });
        }
    }
}

fn validate_implementations(config: &OrchestratorConfig, errors: &mut Vec<ValidationError>) {
    for (engine_id, settings) in &config.engines {
        if let Some(implementation) = &settings.implementation {
            if !LocalEngineFactory::is_implementation_available(implementation) {
                errors.push(ValidationError::UnknownImplementation {
                    engine_id: engine_id.clone(),
                    implementation: implementation.clone(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineSettings, PriorityRule};

    fn field_names(errors: &[ValidationError]) -> Vec<String> {
        errors
            .iter()
            .filter_map(|e| match e {
                ValidationError::OutOfRange { field, .. } => Some(field.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&OrchestratorConfig::default()).is_ok());
    }

    #[test]
    fn test_out_of_range_values() {
        let mut config = OrchestratorConfig::default();
        config.concurrency = 0;
        config.default_timeout_ms = 0;
        config.circuit_breaker.failure_threshold = 0;
        config.consolidation.overlap_threshold = 1.5;
        config.consolidation.similarity_threshold = 0.0;
        config.consolidation.max_suggestions = 0;
        config.retry.engine.multiplier = 0.5;

        let errors = validate_config(&config).unwrap_err();
        let fields = field_names(&errors);

        assert_eq!(errors.len(), 7);
        assert!(fields.contains(&"concurrency".to_string()));
        assert!(fields.contains(&"circuit_breaker.failure_threshold".to_string()));
        assert!(fields.contains(&"consolidation.overlap_threshold".to_string()));
        assert!(fields.contains(&"retry.engine.multiplier".to_string()));
    }

    #[test]
    fn test_cache_bounds_only_checked_when_enabled() {
        let mut config = OrchestratorConfig::default();
        config.cache.max_entries = 0;
        assert!(validate_config(&config).is_err());

        config.cache.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_duplicate_init_entries_reported_once() {
        let mut config = OrchestratorConfig::default();
        config.init_sequence = vec!["a".into(), "b".into(), "a".into(), "a".into()];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateInitEntry {
                engine_id: "a".to_string()
            }]
        );
    }

    #[test]
    fn test_empty_priority_rule() {
        let mut config = OrchestratorConfig::default();
        config.consolidation.priority_rules = vec![
            PriorityRule {
                engine: Some("grammar".into()),
                category: None,
                priority: 1,
            },
            PriorityRule {
                engine: None,
                category: None,
                priority: 2,
            },
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyPriorityRule { index: 1 }]);
    }

    #[test]
    fn test_unknown_implementation_and_zero_timeout() {
        let mut config = OrchestratorConfig::default();
        config.engines.insert(
            "style".into(),
            EngineSettings {
                implementation: Some("style_checker".into()),
                timeout_ms: Some(0),
                ..EngineSettings::default()
            },
        );

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&ValidationError::UnknownImplementation {
            engine_id: "style".into(),
            implementation: "style_checker".into(),
        }));
        assert_eq!(field_names(&errors), vec!["engines.style.timeout_ms"]);
    }
}
