// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{active_rules, ensure_active};
use crate::errors::AnalysisError;
use crate::model::{
    Capability, EngineDescriptor, EngineIssue, EngineOptions, EngineOutput, IssueCategory,
    Severity, TextRange,
};
use crate::traits::EngineHooks;

pub const DOUBLE_SPACE: &str = "double_space";
pub const SPACE_BEFORE_PUNCTUATION: &str = "space_before_punctuation";
const RULES: [&str; 2] = [DOUBLE_SPACE, SPACE_BEFORE_PUNCTUATION];

/// Spacing checks around words and punctuation marks.
pub struct PunctuationEngine {
    descriptor: EngineDescriptor,
}

impl PunctuationEngine {
    pub fn new(id: &str) -> Self {
        Self {
            descriptor: EngineDescriptor::new(id, "Punctuation", env!("CARGO_PKG_VERSION"))
                .with_capabilities([Capability::Punctuation]),
        }
    }
}

/// Runs of ASCII spaces that follow a non-whitespace character, as `[start, end)`.
fn inner_space_runs(text: &str) -> Vec<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut runs = Vec::new();
    let mut idx = 0;

    while idx < bytes.len() {
        if bytes[idx] != b' ' {
            idx += 1;
            continue;
        }
        let start = idx;
        while idx < bytes.len() && bytes[idx] == b' ' {
            idx += 1;
        }
        let preceded_by_text = start > 0 && !bytes[start - 1].is_ascii_whitespace();
        if preceded_by_text {
            runs.push((start, idx));
        }
    }
    runs
}

#[async_trait]
impl EngineHooks for PunctuationEngine {
    fn descriptor(&self) -> &EngineDescriptor {
        &self.descriptor
    }

    async fn process_internal(
        &self,
        text: &str,
        options: &EngineOptions,
        cancel: &CancellationToken,
    ) -> Result<EngineOutput, AnalysisError> {
        let rules = active_rules(options, &RULES);
        let mut issues = Vec::new();

        for (start, end) in inner_space_runs(text) {
            ensure_active(cancel)?;
            let next = text.as_bytes().get(end).copied();

            if matches!(next, Some(b',' | b'.' | b';' | b':' | b'!' | b'?')) {
                if rules.contains(&SPACE_BEFORE_PUNCTUATION) {
                    issues.push(
                        EngineIssue::new(
                            format!("{}-{}", SPACE_BEFORE_PUNCTUATION, start),
                            IssueCategory::Punctuation,
                            "Unexpected space before punctuation",
                            TextRange::new(start, end),
                        )
                        .with_suggestion("", 0.9)
                        .with_confidence(0.9)
                        .with_rule(SPACE_BEFORE_PUNCTUATION),
                    );
                }
            } else if end - start > 1 && next.is_some() && rules.contains(&DOUBLE_SPACE) {
                issues.push(
                    EngineIssue::new(
                        format!("{}-{}", DOUBLE_SPACE, start),
                        IssueCategory::Typography,
                        "Multiple consecutive spaces",
                        TextRange::new(start, end),
                    )
                    .with_suggestion(" ", 0.85)
                    .with_confidence(0.85)
                    .with_severity(Severity::Info)
                    .with_rule(DOUBLE_SPACE),
                );
            }
        }

        Ok(EngineOutput::with_issues(issues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(text: &str) -> Vec<EngineIssue> {
        PunctuationEngine::new("punctuation")
            .process_internal(text, &EngineOptions::default(), &CancellationToken::new())
            .await
            .unwrap()
            .issues
    }

    #[tokio::test]
    async fn test_double_space() {
        let issues = run("Hello  world").await;

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].range, TextRange::new(5, 7));
        assert_eq!(issues[0].rule_id.as_deref(), Some(DOUBLE_SPACE));
        assert_eq!(issues[0].suggestions[0].text, " ");
    }

    #[tokio::test]
    async fn test_space_before_punctuation_wins_over_double_space() {
        let issues = run("Wait  , what ?").await;

        let rules: Vec<&str> = issues.iter().filter_map(|i| i.rule_id.as_deref()).collect();
        assert_eq!(rules, vec![SPACE_BEFORE_PUNCTUATION, SPACE_BEFORE_PUNCTUATION]);
        assert_eq!(issues[0].range, TextRange::new(4, 6));
        assert_eq!(issues[0].category, IssueCategory::Punctuation);
    }

    #[tokio::test]
    async fn test_leading_and_trailing_spaces_are_ignored() {
        assert!(run("   indented text  ").await.is_empty());
        assert!(run("line one\n  line two").await.is_empty());
    }

    #[tokio::test]
    async fn test_rule_selection() {
        let options = EngineOptions {
            rules: vec![DOUBLE_SPACE.to_string()],
            ..EngineOptions::default()
        };
        let issues = PunctuationEngine::new("punctuation")
            .process_internal("a  b ,c", &options, &CancellationToken::new())
            .await
            .unwrap()
            .issues;

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].rule_id.as_deref(), Some(DOUBLE_SPACE));
    }
}
