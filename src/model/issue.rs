// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

/// Category of a detected issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    Spelling,
    Grammar,
    Punctuation,
    Typography,
    Style,
    Clarity,
    Other,
}

impl IssueCategory {
    /// Priority used when no configured rule matches. Lower wins.
    pub fn default_priority(self) -> u32 {
        match self {
            IssueCategory::Spelling => 10,
            IssueCategory::Grammar => 20,
            IssueCategory::Punctuation => 30,
            IssueCategory::Typography => 40,
            IssueCategory::Style => 50,
            IssueCategory::Clarity => 60,
            IssueCategory::Other => 100,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IssueCategory::Spelling => "spelling",
            IssueCategory::Grammar => "grammar",
            IssueCategory::Punctuation => "punctuation",
            IssueCategory::Typography => "typography",
            IssueCategory::Style => "style",
            IssueCategory::Clarity => "clarity",
            IssueCategory::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    #[default]
    Warning,
    Info,
}

impl Severity {
    /// Higher is more severe.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Error => 2,
            Severity::Warning => 1,
            Severity::Info => 0,
        }
    }
}

/// Half-open byte span `[start, end)` into the checked text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the two spans share at least one byte, or when an empty span
    /// sits inside (or on the edge of) the other.
    pub fn intersects(&self, other: &TextRange) -> bool {
        if self.is_empty() || other.is_empty() {
            return self.start.max(other.start) <= self.end.min(other.end);
        }
        self.start < other.end && other.start < self.end
    }

    /// Intersection-over-union of the two spans, in `[0, 1]`.
    pub fn overlap_ratio(&self, other: &TextRange) -> f32 {
        if self == other {
            return 1.0;
        }
        let intersection = self.end.min(other.end).saturating_sub(self.start.max(other.start));
        let union = self.end.max(other.end) - self.start.min(other.start);
        if union == 0 {
            return 0.0;
        }
        intersection as f32 / union as f32
    }

    /// Clamp into `0 <= start <= end <= text.len()` and widen onto UTF-8
    /// character boundaries. Returns the sanitized range and whether it changed.
    pub fn sanitize(&self, text: &str) -> (TextRange, bool) {
        let len = text.len();
        let mut end = self.end.min(len);
        let mut start = self.start.min(end);
        while !text.is_char_boundary(start) {
            start -= 1;
        }
        while !text.is_char_boundary(end) {
            end += 1;
        }
        let sanitized = TextRange { start, end };
        (sanitized, sanitized != *self)
    }
}

/// A ranked replacement proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub confidence: f32,
}

impl Suggestion {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// An issue as reported by a single engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineIssue {
    pub id: String,
    pub category: IssueCategory,
    pub message: String,
    pub explanation: Option<String>,
    pub suggestions: Vec<Suggestion>,
    pub range: TextRange,
    pub confidence: f32,
    pub severity: Severity,
    pub rule_id: Option<String>,
}

impl EngineIssue {
    pub fn new(
        id: impl Into<String>,
        category: IssueCategory,
        message: impl Into<String>,
        range: TextRange,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            message: message.into(),
            explanation: None,
            suggestions: Vec::new(),
            range,
            confidence: 1.0,
            severity: Severity::default(),
            rule_id: None,
        }
    }

    pub fn with_suggestion(mut self, text: impl Into<String>, confidence: f32) -> Self {
        self.suggestions.push(Suggestion::new(text, confidence));
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_rule(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }
}

/// A consolidated issue, possibly merged from several engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub category: IssueCategory,
    pub message: String,
    pub explanation: Option<String>,
    pub suggestions: Vec<Suggestion>,
    pub range: TextRange,
    /// 1-based line of `range.start`.
    pub line: usize,
    /// 1-based column of `range.start`, counted in characters.
    pub column: usize,
    pub confidence: f32,
    pub severity: Severity,
    /// Every engine that reported this issue, surviving engine first.
    pub engine_ids: Vec<String>,
    pub priority: u32,
    pub ignored: bool,
}

impl Issue {
    pub fn primary_engine(&self) -> &str {
        self.engine_ids.first().map(String::as_str).unwrap_or_default()
    }
}
