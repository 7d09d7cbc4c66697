// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashSet;

use crate::config::{ConsolidationConfig, DedupStrategy};
use crate::model::{EngineIssue, Suggestion};

/// Whether `a` and `b` describe the same problem under the configured strategy.
pub fn is_duplicate(config: &ConsolidationConfig, a: &EngineIssue, b: &EngineIssue) -> bool {
    match config.dedup_strategy {
        DedupStrategy::Strict => a.range == b.range && a.category == b.category,
        DedupStrategy::Overlap => a.range.overlap_ratio(&b.range) >= config.overlap_threshold,
        DedupStrategy::Semantic => {
            a.range.intersects(&b.range)
                && (message_similarity(&a.message, &b.message) >= config.similarity_threshold
                    || same_top_suggestion(&a.suggestions, &b.suggestions))
        }
    }
}

fn tokens(message: &str) -> HashSet<String> {
    message
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Jaccard similarity of the lowercase word sets of two messages.
pub fn message_similarity(a: &str, b: &str) -> f32 {
    let left = tokens(a);
    let right = tokens(b);
    if left.is_empty() && right.is_empty() {
        return 1.0;
    }
    let shared = left.intersection(&right).count();
    let union = left.union(&right).count();
    shared as f32 / union as f32
}

fn top_suggestion(suggestions: &[Suggestion]) -> Option<&Suggestion> {
    suggestions
        .iter()
        .reduce(|best, s| if s.confidence > best.confidence { s } else { best })
}

fn same_top_suggestion(a: &[Suggestion], b: &[Suggestion]) -> bool {
    match (top_suggestion(a), top_suggestion(b)) {
        (Some(x), Some(y)) => x.text.to_lowercase() == y.text.to_lowercase(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IssueCategory, TextRange};

    fn issue(category: IssueCategory, message: &str, start: usize, end: usize) -> EngineIssue {
        EngineIssue::new("x", category, message, TextRange::new(start, end))
    }

    fn config(strategy: DedupStrategy) -> ConsolidationConfig {
        ConsolidationConfig {
            dedup_strategy: strategy,
            ..ConsolidationConfig::default()
        }
    }

    #[test]
    fn test_strict_requires_same_range_and_category() {
        let cfg = config(DedupStrategy::Strict);
        let a = issue(IssueCategory::Spelling, "one", 0, 3);

        assert!(is_duplicate(&cfg, &a, &issue(IssueCategory::Spelling, "two", 0, 3)));
        assert!(!is_duplicate(&cfg, &a, &issue(IssueCategory::Grammar, "one", 0, 3)));
        assert!(!is_duplicate(&cfg, &a, &issue(IssueCategory::Spelling, "one", 0, 4)));
    }

    #[test]
    fn test_overlap_uses_threshold() {
        let cfg = config(DedupStrategy::Overlap);
        let a = issue(IssueCategory::Spelling, "m", 0, 10);

        // IoU 6/10
        assert!(is_duplicate(&cfg, &a, &issue(IssueCategory::Grammar, "m", 4, 10)));
        // IoU 2/12
        assert!(!is_duplicate(&cfg, &a, &issue(IssueCategory::Grammar, "m", 8, 12)));
    }

    #[test]
    fn test_semantic_by_message_or_suggestion() {
        let cfg = config(DedupStrategy::Semantic);
        let a = issue(IssueCategory::Grammar, "Subject and verb disagree", 5, 8)
            .with_suggestion("is", 0.9);

        let similar = issue(IssueCategory::Grammar, "subject and verb disagree here", 5, 8);
        assert!(is_duplicate(&cfg, &a, &similar));

        let same_fix = issue(IssueCategory::Grammar, "Wrong verb form", 0, 8)
            .with_suggestion("IS", 0.5);
        assert!(is_duplicate(&cfg, &a, &same_fix));

        let elsewhere = issue(IssueCategory::Grammar, "Subject and verb disagree", 20, 24);
        assert!(!is_duplicate(&cfg, &a, &elsewhere));
    }

    #[test]
    fn test_message_similarity() {
        assert_eq!(message_similarity("A b c", "c B a"), 1.0);
        assert_eq!(message_similarity("a b", "c d"), 0.0);
        assert!((message_similarity("a b c", "a b d") - 0.5).abs() < f32::EPSILON);
    }
}
