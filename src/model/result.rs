// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Issue;

/// Version of the result layout handed to host applications.
pub const SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub processing_time_ms: u64,
    /// Engines whose output is part of this result. Never includes engines that failed or timed out.
    pub engines_used: Vec<String>,
    pub cache_hit: bool,
    pub timestamp: DateTime<Utc>,
    pub schema_version: String,
}

/// The consolidated answer to one `check` request.
///
/// Results are never mutated after they are returned; helpers such as
/// [`CheckResult::with_issue_ignored`] produce a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub text: String,
    pub language: String,
    pub issues: Vec<Issue>,
    pub metadata: ResultMetadata,
}

impl CheckResult {
    pub fn empty(text: &str, language: &str) -> Self {
        Self {
            text: text.to_string(),
            language: language.to_string(),
            issues: Vec::new(),
            metadata: ResultMetadata {
                processing_time_ms: 0,
                engines_used: Vec::new(),
                cache_hit: false,
                timestamp: Utc::now(),
                schema_version: SCHEMA_VERSION.to_string(),
            },
        }
    }

    /// Copy of this result with the `ignored` flag of one issue set.
    pub fn with_issue_ignored(&self, issue_id: &str, ignored: bool) -> Self {
        let mut next = self.clone();
        for issue in next.issues.iter_mut().filter(|i| i.id == issue_id) {
            issue.ignored = ignored;
        }
        next
    }

    pub fn active_issues(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| !i.ignored)
    }

    pub fn issue(&self, issue_id: &str) -> Option<&Issue> {
        self.issues.iter().find(|i| i.id == issue_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IssueCategory, Severity, TextRange};

    fn issue(id: &str, start: usize) -> Issue {
        Issue {
            id: id.to_string(),
            category: IssueCategory::Spelling,
            message: "Possible misspelling".to_string(),
            explanation: None,
            suggestions: Vec::new(),
            range: TextRange::new(start, start + 3),
            line: 1,
            column: start + 1,
            confidence: 0.9,
            severity: Severity::Warning,
            engine_ids: vec!["spelling".to_string()],
            priority: 10,
            ignored: false,
        }
    }

    #[test]
    fn test_with_issue_ignored_returns_new_result() {
        let mut result = CheckResult::empty("Teh cat adn dog", "en-US");
        result.issues = vec![issue("a", 0), issue("b", 8)];

        let toggled = result.with_issue_ignored("a", true);
        assert!(toggled.issue("a").unwrap().ignored);
        assert!(!result.issue("a").unwrap().ignored);

        let active: Vec<&str> = toggled.active_issues().map(|i| i.id.as_str()).collect();
        assert_eq!(active, vec!["b"]);

        let restored = toggled.with_issue_ignored("a", false);
        assert_eq!(restored.active_issues().count(), 2);
    }

    #[test]
    fn test_unknown_issue_id_changes_nothing() {
        let mut result = CheckResult::empty("Teh cat", "en-US");
        result.issues = vec![issue("a", 0)];
        assert_eq!(result.with_issue_ignored("zzz", true), result);
    }
}
