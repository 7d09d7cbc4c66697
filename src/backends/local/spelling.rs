// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use tokio_util::sync::CancellationToken;

use super::tokens::words;
use super::{ensure_active, match_case};
use crate::errors::AnalysisError;
use crate::model::{
    Capability, EngineDescriptor, EngineIssue, EngineOptions, EngineOutput, IssueCategory,
    Severity, TextRange,
};
use crate::traits::EngineHooks;

pub const MISSPELLING: &str = "misspelling";

const COMMON_MISSPELLINGS: [(&str, &str); 16] = [
    ("teh", "the"),
    ("recieve", "receive"),
    ("seperate", "separate"),
    ("definately", "definitely"),
    ("occured", "occurred"),
    ("untill", "until"),
    ("wich", "which"),
    ("accomodate", "accommodate"),
    ("adress", "address"),
    ("beleive", "believe"),
    ("goverment", "government"),
    ("tommorow", "tomorrow"),
    ("wierd", "weird"),
    ("alot", "a lot"),
    ("neccessary", "necessary"),
    ("existance", "existence"),
];

/// Table-driven spelling checker.
///
/// The correction table is loaded on initialize and dropped on shutdown.
/// Words listed in `EngineOptions::custom_words` are never flagged.
pub struct SpellingEngine {
    descriptor: EngineDescriptor,
    table: RwLock<Option<HashMap<&'static str, &'static str>>>,
}

impl SpellingEngine {
    pub fn new(id: &str) -> Self {
        Self {
            descriptor: EngineDescriptor::new(id, "Spelling", env!("CARGO_PKG_VERSION"))
                .with_capabilities([Capability::Spelling]),
            table: RwLock::new(None),
        }
    }
}

#[async_trait]
impl EngineHooks for SpellingEngine {
    fn descriptor(&self) -> &EngineDescriptor {
        &self.descriptor
    }

    async fn initialize_internal(&self) -> Result<(), AnalysisError> {
        *self.table.write() = Some(COMMON_MISSPELLINGS.into_iter().collect());
        Ok(())
    }

    async fn process_internal(
        &self,
        text: &str,
        options: &EngineOptions,
        cancel: &CancellationToken,
    ) -> Result<EngineOutput, AnalysisError> {
        let guard = self.table.read();
        let table = guard
            .as_ref()
            .ok_or_else(|| AnalysisError::resource("spelling table is not loaded"))?;
        let custom: HashSet<String> = options
            .custom_words
            .iter()
            .map(|w| w.to_lowercase())
            .collect();

        let mut issues = Vec::new();
        for word in words(text) {
            ensure_active(cancel)?;
            let lower = word.text.to_lowercase();
            if custom.contains(&lower) {
                continue;
            }
            let Some(correction) = table.get(lower.as_str()) else {
                continue;
            };
            issues.push(
                EngineIssue::new(
                    format!("{}-{}", MISSPELLING, word.start),
                    IssueCategory::Spelling,
                    format!("Possible misspelling: '{}'", word.text),
                    TextRange::new(word.start, word.end),
                )
                .with_suggestion(match_case(word.text, correction), 0.95)
                .with_confidence(0.95)
                .with_severity(Severity::Error)
                .with_rule(MISSPELLING),
            );
        }

        Ok(EngineOutput::with_issues(issues))
    }

    async fn shutdown_internal(&self) -> Result<(), AnalysisError> {
        *self.table.write() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn loaded() -> SpellingEngine {
        let engine = SpellingEngine::new("spelling");
        engine.initialize_internal().await.unwrap();
        engine
    }

    #[tokio::test]
    async fn test_flags_known_misspellings_preserving_case() {
        let engine = loaded().await;

        let output = engine
            .process_internal(
                "Teh cat will recieve it",
                &EngineOptions::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(output.issues.len(), 2);
        assert_eq!(output.issues[0].range, TextRange::new(0, 3));
        assert_eq!(output.issues[0].suggestions[0].text, "The");
        assert_eq!(output.issues[1].suggestions[0].text, "receive");
    }

    #[tokio::test]
    async fn test_custom_dictionary_suppresses_words() {
        let engine = loaded().await;
        let options = EngineOptions {
            custom_words: vec!["TEH".to_string()],
            ..EngineOptions::default()
        };

        let output = engine
            .process_internal("teh end", &options, &CancellationToken::new())
            .await
            .unwrap();

        assert!(output.issues.is_empty());
    }

    #[tokio::test]
    async fn test_unloaded_table_is_a_resource_error() {
        let engine = SpellingEngine::new("spelling");

        let err = engine
            .process_internal("teh", &EngineOptions::default(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind, crate::errors::ErrorKind::Resource);
        assert!(!err.recoverable);
    }

    #[tokio::test]
    async fn test_shutdown_drops_table() {
        let engine = loaded().await;
        engine.shutdown_internal().await.unwrap();
        assert!(engine.table.read().is_none());
    }
}
