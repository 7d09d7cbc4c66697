// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::EngineIssue;

/// Latency/quality trade-off requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Skip online engines.
    Speed,
    #[default]
    Balanced,
    Accuracy,
}

/// Per-request options passed to `check`/`process`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckOptions {
    pub language: Option<String>,
    pub domain: Option<String>,
    /// Restrict dispatch to these engine ids. `None` means every registered engine.
    pub engines: Option<Vec<String>>,
    pub priority: Priority,
    /// Overall request timeout override.
    pub timeout_ms: Option<u64>,
    pub rules: Vec<String>,
}

impl CheckOptions {
    pub fn with_engines<I, S>(mut self, engines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.engines = Some(engines.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// Options handed to a single engine invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub language: Option<String>,
    pub domain: Option<String>,
    pub timeout_ms: Option<u64>,
    pub rules: Vec<String>,
    /// Words the engine must accept as correct.
    pub custom_words: Vec<String>,
}

/// What an engine returns from a successful `process` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineOutput {
    pub issues: Vec<EngineIssue>,
    pub metadata: BTreeMap<String, String>,
}

impl EngineOutput {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_issues(issues: Vec<EngineIssue>) -> Self {
        Self {
            issues,
            metadata: BTreeMap::new(),
        }
    }
}
