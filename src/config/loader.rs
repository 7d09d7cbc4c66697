// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::config::consts::{
    DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL_SECONDS, DEFAULT_CONCURRENCY,
    DEFAULT_ENGINE_TIMEOUT_MS, DEFAULT_MAX_SUGGESTIONS, DEFAULT_OVERLAP_THRESHOLD,
    DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_SIMILARITY_THRESHOLD,
};
use crate::config::validation::validate_config;
use crate::errors::{ConfigError, FallbackStrategy};
use crate::model::{CheckOptions, EngineOptions, IssueCategory};
use crate::resilience::{CircuitBreakerConfig, ErrorPolicy};

/// Main configuration structure for the orchestrator.
///
/// Every field has a default, so an empty document is a valid configuration.
/// A configuration is immutable once handed to an orchestrator; replacing it
/// goes through [`Orchestrator::configure`](crate::orchestrator::Orchestrator::configure).
///
/// # Fields
/// * `concurrency` - Maximum number of engine invocations in flight at once
/// * `default_timeout_ms` - Per-engine timeout for engines without their own
/// * `request_timeout_ms` - Bound on a whole `process` call (overridable per call)
/// * `fallback_strategy` - How initialization and processing failures are surfaced
/// * `init_sequence` - Engines to initialize first, in order
/// * `cache` - Result cache bounds
/// * `circuit_breaker` - Failure thresholds for excluding an engine
/// * `retry` - Backoff per error kind
/// * `consolidation` - Deduplication and priority rules
/// * `engines` - Per-engine settings keyed by engine id
///
/// # Example
/// ```yaml
/// concurrency: 4
/// default_timeout_ms: 5000
/// fallback_strategy: continue
/// init_sequence: [spelling, grammar]
/// cache:
///   max_entries: 256
///   ttl_seconds: 300
/// consolidation:
///   dedup_strategy: overlap
///   priority_rules:
///     - { engine: grammar, category: grammar, priority: 5 }
/// engines:
///   grammar:
///     implementation: grammar_rules
///     timeout_ms: 500
///   spelling:
///     implementation: spelling
///     dictionary: [tokio]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub concurrency: usize,
    pub default_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub fallback_strategy: FallbackStrategy,
    pub init_sequence: Vec<String>,
    pub cache: CacheConfig,
    pub circuit_breaker: CircuitBreakerConfig,
    pub retry: ErrorPolicy,
    pub consolidation: ConsolidationConfig,
    pub engines: BTreeMap<String, EngineSettings>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            default_timeout_ms: DEFAULT_ENGINE_TIMEOUT_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            fallback_strategy: FallbackStrategy::default(),
            init_sequence: Vec::new(),
            cache: CacheConfig::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
            retry: ErrorPolicy::default(),
            consolidation: ConsolidationConfig::default(),
            engines: BTreeMap::new(),
        }
    }
}

impl OrchestratorConfig {
    pub fn engine_settings(&self, engine_id: &str) -> Option<&EngineSettings> {
        self.engines.get(engine_id)
    }

    /// Engines without an entry are enabled.
    pub fn is_engine_enabled(&self, engine_id: &str) -> bool {
        self.engine_settings(engine_id)
            .map(|s| s.enabled)
            .unwrap_or(true)
    }

    pub fn engine_timeout(&self, engine_id: &str) -> Duration {
        let ms = self
            .engine_settings(engine_id)
            .and_then(|s| s.timeout_ms)
            .unwrap_or(self.default_timeout_ms);
        Duration::from_millis(ms)
    }

    pub fn engine_max_retries(&self, engine_id: &str) -> Option<u32> {
        self.engine_settings(engine_id).and_then(|s| s.max_retries)
    }

    /// Per-request bound: the caller's `timeout_ms` when set, else the configured default.
    pub fn request_timeout(&self, options: &CheckOptions) -> Duration {
        Duration::from_millis(options.timeout_ms.unwrap_or(self.request_timeout_ms))
    }

    /// Options handed to one engine for one request. Request rules come first,
    /// followed by the engine's configured rules; the engine's dictionary
    /// becomes `custom_words`.
    pub fn engine_options(&self, engine_id: &str, options: &CheckOptions) -> EngineOptions {
        let settings = self.engine_settings(engine_id);
        let mut rules = options.rules.clone();
        for rule in settings.map(|s| s.rules.as_slice()).unwrap_or_default() {
            if !rules.contains(rule) {
                rules.push(rule.clone());
            }
        }

        EngineOptions {
            language: options.language.clone(),
            domain: options.domain.clone(),
            timeout_ms: Some(self.engine_timeout(engine_id).as_millis() as u64),
            rules,
            custom_words: settings.map(|s| s.dictionary.clone()).unwrap_or_default(),
        }
    }
}

/// Result cache bounds.
///
/// # Example
/// ```yaml
/// cache:
///   enabled: true
///   max_entries: 256
///   ttl_seconds: 300   # omit or null for no expiry
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: usize,
    pub ttl_seconds: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            ttl_seconds: Some(DEFAULT_CACHE_TTL_SECONDS),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_seconds.map(Duration::from_secs)
    }
}

/// How near-duplicate issues from different engines are recognized.
///
/// # Variants
/// * `Strict` - identical range and category
/// * `Overlap` - range intersection-over-union at or above `overlap_threshold`
/// * `Semantic` - intersecting ranges whose messages are similar or whose top
///   suggestions match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupStrategy {
    #[default]
    Strict,
    Overlap,
    Semantic,
}

/// Maps an engine and/or category to a numeric priority. Lower wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityRule {
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default)]
    pub category: Option<IssueCategory>,
    pub priority: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    pub dedup_strategy: DedupStrategy,
    pub overlap_threshold: f32,
    pub similarity_threshold: f32,
    pub max_suggestions: usize,
    pub priority_rules: Vec<PriorityRule>,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            dedup_strategy: DedupStrategy::default(),
            overlap_threshold: DEFAULT_OVERLAP_THRESHOLD,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            priority_rules: Vec::new(),
        }
    }
}

/// Settings for a single engine.
///
/// # Fields
/// * `enabled` - Disabled engines stay registered but are never dispatched
/// * `timeout_ms` - Overrides `default_timeout_ms`
/// * `max_retries` - Lowers the per-error-kind retry budget for this engine
/// * `rules` - Rule ids forwarded to the engine
/// * `dictionary` - Extra accepted words forwarded as `custom_words`
/// * `implementation` - Local implementation to build (see `LocalEngineFactory`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub enabled: bool,
    pub timeout_ms: Option<u64>,
    pub max_retries: Option<u32>,
    pub rules: Vec<String>,
    pub dictionary: Vec<String>,
    pub implementation: Option<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: None,
            max_retries: None,
            rules: Vec::new(),
            dictionary: Vec::new(),
            implementation: None,
        }
    }
}

/// Load a config from a YAML (`.yaml`, `.yml`) or TOML (`.toml`) file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<OrchestratorConfig, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let content = fs::read_to_string(path)?;

    match extension.as_str() {
        "yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
        "toml" => Ok(toml::from_str(&content)?),
        _ => Err(ConfigError::UnsupportedFormat(extension)),
    }
}

/// Load and validate a config file.
///
/// Every validation problem is reported, not just the first.
pub fn load_and_validate_config<P: AsRef<Path>>(
    path: P,
) -> Result<OrchestratorConfig, ConfigError> {
    let cfg = load_config(path)?;
    validate_config(&cfg).map_err(ConfigError::Validation)?;
    Ok(cfg)
}
