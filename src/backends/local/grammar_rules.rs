// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::tokens::{words, Word};
use super::{active_rules, capitalize, ensure_active, match_case};
use crate::errors::AnalysisError;
use crate::model::{
    Capability, EngineDescriptor, EngineIssue, EngineOptions, EngineOutput, IssueCategory,
    Severity, TextRange,
};
use crate::traits::EngineHooks;

pub const AGREEMENT: &str = "agreement";
pub const REPEATED_WORD: &str = "repeated_word";
pub const CAPITALIZATION: &str = "capitalization";
const RULES: [&str; 3] = [AGREEMENT, REPEATED_WORD, CAPITALIZATION];

/// Demonstrative + verb pairs that disagree in number, with the fix for the verb.
const SINGULAR_SUBJECTS: [&str; 2] = ["this", "that"];
const PLURAL_SUBJECTS: [&str; 2] = ["these", "those"];
const PLURAL_TO_SINGULAR: [(&str, &str); 4] =
    [("are", "is"), ("were", "was"), ("have", "has"), ("do", "does")];
const SINGULAR_TO_PLURAL: [(&str, &str); 4] =
    [("is", "are"), ("was", "were"), ("has", "have"), ("does", "do")];

/// Rule-based grammar checks: demonstrative/verb agreement, repeated words and
/// sentence capitalization.
pub struct GrammarRulesEngine {
    descriptor: EngineDescriptor,
}

impl GrammarRulesEngine {
    pub fn new(id: &str) -> Self {
        Self {
            descriptor: EngineDescriptor::new(id, "Grammar Rules", env!("CARGO_PKG_VERSION"))
                .with_capabilities([Capability::Grammar, Capability::Style]),
        }
    }

    fn agreement(&self, text: &str, pair: (&Word, &Word)) -> Option<EngineIssue> {
        let (subject, verb) = pair;
        let subject_lower = subject.text.to_lowercase();
        let verb_lower = verb.text.to_lowercase();

        let table = if SINGULAR_SUBJECTS.contains(&subject_lower.as_str()) {
            &PLURAL_TO_SINGULAR
        } else if PLURAL_SUBJECTS.contains(&subject_lower.as_str()) {
            &SINGULAR_TO_PLURAL
        } else {
            return None;
        };
        let (_, fix) = table.iter().find(|(wrong, _)| *wrong == verb_lower)?;

        Some(
            EngineIssue::new(
                format!("{}-{}", AGREEMENT, verb.start),
                IssueCategory::Grammar,
                format!("'{}' does not agree with '{}'", subject.text, verb.text),
                TextRange::new(verb.start, verb.end),
            )
            .with_explanation(format!(
                "Use '{}' after '{}'.",
                fix,
                &text[subject.start..subject.end]
            ))
            .with_suggestion(match_case(verb.text, fix), 0.9)
            .with_confidence(0.9)
            .with_severity(Severity::Error)
            .with_rule(AGREEMENT),
        )
    }

    fn repeated(&self, pair: (&Word, &Word)) -> Option<EngineIssue> {
        let (first, second) = pair;
        if !first.text.eq_ignore_ascii_case(second.text) || first.text.chars().all(char::is_numeric) {
            return None;
        }
        Some(
            EngineIssue::new(
                format!("{}-{}", REPEATED_WORD, first.start),
                IssueCategory::Grammar,
                format!("Repeated word '{}'", second.text),
                TextRange::new(first.start, second.end),
            )
            .with_suggestion(first.text, 0.95)
            .with_confidence(0.95)
            .with_rule(REPEATED_WORD),
        )
    }

    fn capitalization(&self, word: &Word) -> Option<EngineIssue> {
        let first = word.text.chars().next()?;
        if !first.is_lowercase() {
            return None;
        }
        Some(
            EngineIssue::new(
                format!("{}-{}", CAPITALIZATION, word.start),
                IssueCategory::Typography,
                "Sentence should start with a capital letter",
                TextRange::new(word.start, word.end),
            )
            .with_suggestion(capitalize(word.text), 0.8)
            .with_confidence(0.8)
            .with_severity(Severity::Info)
            .with_rule(CAPITALIZATION),
        )
    }
}

/// True when only whitespace separates the two words.
fn adjacent(text: &str, a: &Word, b: &Word) -> bool {
    text[a.end..b.start].chars().all(char::is_whitespace)
}

fn starts_sentence(text: &str, previous: Option<&Word>, word: &Word) -> bool {
    match previous {
        None => true,
        Some(prev) => text[prev.end..word.start]
            .chars()
            .any(|c| matches!(c, '.' | '!' | '?')),
    }
}

#[async_trait]
impl EngineHooks for GrammarRulesEngine {
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
        let tokens = words(text);
        let mut issues = Vec::new();

        for (idx, word) in tokens.iter().enumerate() {
            ensure_active(cancel)?;
            let previous = idx.checked_sub(1).map(|p| &tokens[p]);

            if rules.contains(&CAPITALIZATION) && starts_sentence(text, previous, word) {
                issues.extend(self.capitalization(word));
            }

            let Some(prev) = previous else { continue };
            if !adjacent(text, prev, word) {
                continue;
            }
            if rules.contains(&AGREEMENT) {
                issues.extend(self.agreement(text, (prev, word)));
            }
            if rules.contains(&REPEATED_WORD) {
                issues.extend(self.repeated((prev, word)));
            }
        }

        let mut output = EngineOutput::with_issues(issues);
        output
            .metadata
            .insert("word_count".to_string(), tokens.len().to_string());
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(text: &str, rules: &[&str]) -> Vec<EngineIssue> {
        let engine = GrammarRulesEngine::new("grammar");
        let options = EngineOptions {
            rules: rules.iter().map(|r| r.to_string()).collect(),
            ..EngineOptions::default()
        };
        engine
            .process_internal(text, &options, &CancellationToken::new())
            .await
            .unwrap()
            .issues
    }

    #[tokio::test]
    async fn test_this_are_is_flagged() {
        let issues = run("This are a test.", &[]).await;

        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.rule_id.as_deref(), Some(AGREEMENT));
        assert_eq!(issue.range, TextRange::new(5, 8));
        assert_eq!(issue.suggestions[0].text, "is");
        assert_eq!(issue.severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_plural_subject_agreement() {
        let issues = run("Those was fine.", &[AGREEMENT]).await;
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].suggestions[0].text, "were");
    }

    #[tokio::test]
    async fn test_agreement_requires_adjacent_words() {
        assert!(run("This, are you sure?", &[AGREEMENT]).await.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_word() {
        let issues = run("It was the the best.", &[REPEATED_WORD]).await;

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].range, TextRange::new(7, 14));
        assert_eq!(issues[0].suggestions[0].text, "the");
    }

    #[tokio::test]
    async fn test_capitalization_of_sentence_starts() {
        let issues = run("hello there. this is it! Fine", &[CAPITALIZATION]).await;

        let starts: Vec<usize> = issues.iter().map(|i| i.range.start).collect();
        assert_eq!(starts, vec![0, 13]);
        assert_eq!(issues[0].suggestions[0].text, "Hello");
        assert_eq!(issues[0].category, IssueCategory::Typography);
    }

    #[tokio::test]
    async fn test_clean_text_has_no_issues() {
        assert!(run("These are fine. That is good.", &[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_token_stops_analysis() {
        let engine = GrammarRulesEngine::new("grammar");
        let token = CancellationToken::new();
        token.cancel();

        let err = engine
            .process_internal("This are a test.", &EngineOptions::default(), &token)
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }
}
