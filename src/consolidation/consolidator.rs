// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::ConsolidationConfig;
use crate::consolidation::dedup::is_duplicate;
use crate::consolidation::priority::PriorityResolver;
use crate::model::{EngineIssue, EngineOutput, Issue, Suggestion};
use crate::observability::messages::engine::EngineRangeClamped;
use crate::observability::messages::StructuredLog;

/// Output of one engine that completed successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineResult {
    pub engine_id: String,
    pub output: EngineOutput,
}

impl EngineResult {
    pub fn new(engine_id: impl Into<String>, output: EngineOutput) -> Self {
        Self {
            engine_id: engine_id.into(),
            output,
        }
    }
}

/// An engine issue after range sanitation, tagged with its source and priority.
#[derive(Debug, Clone)]
struct Candidate {
    engine_id: String,
    priority: u32,
    issue: EngineIssue,
}

#[derive(Debug, Clone)]
pub struct ResultsConsolidator {
    config: ConsolidationConfig,
}

impl ResultsConsolidator {
    pub fn new(config: ConsolidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConsolidationConfig {
        &self.config
    }

    /// Deduplicate and order the issues of every engine result for `text`.
    pub fn consolidate(&self, text: &str, results: &[EngineResult]) -> Vec<Issue> {
        let resolver = PriorityResolver::new(&self.config.priority_rules);
        let mut candidates = Vec::new();
        for result in results {
            for issue in &result.output.issues {
                candidates.push(Candidate {
                    engine_id: result.engine_id.clone(),
                    priority: resolver.priority_for(&result.engine_id, issue.category),
                    issue: sanitized(text, &result.engine_id, issue),
                });
            }
        }

        candidates.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(a.issue.range.start.cmp(&b.issue.range.start))
                .then_with(|| a.engine_id.cmp(&b.engine_id))
        });

        let mut groups: Vec<Vec<Candidate>> = Vec::new();
        for candidate in candidates {
            let existing = groups
                .iter_mut()
                .find(|group| is_duplicate(&self.config, &group[0].issue, &candidate.issue));
            match existing {
                Some(group) => group.push(candidate),
                None => groups.push(vec![candidate]),
            }
        }

        let mut issues: Vec<Issue> = groups
            .into_iter()
            .map(|group| self.merge(text, group))
            .collect();

        issues.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(a.range.start.cmp(&b.range.start))
                .then_with(|| a.primary_engine().cmp(b.primary_engine()))
        });
        issues
    }

    /// Collapse a group into its first (highest-priority) member.
    fn merge(&self, text: &str, group: Vec<Candidate>) -> Issue {
        let survivor = &group[0];

        let mut engine_ids: Vec<String> = Vec::new();
        for member in &group {
            if !engine_ids.contains(&member.engine_id) {
                engine_ids.push(member.engine_id.clone());
            }
        }

        let confidence = group
            .iter()
            .map(|m| m.issue.confidence)
            .fold(survivor.issue.confidence, f32::max);
        let severity = group
            .iter()
            .map(|m| m.issue.severity)
            .max_by_key(|s| s.rank())
            .unwrap_or(survivor.issue.severity);
        let explanation = survivor
            .issue
            .explanation
            .clone()
            .or_else(|| group.iter().find_map(|m| m.issue.explanation.clone()));

        let range = survivor.issue.range;
        let (line, column) = line_and_column(text, range.start);

        Issue {
            id: issue_id(survivor),
            category: survivor.issue.category,
            message: survivor.issue.message.clone(),
            explanation,
            suggestions: self.merge_suggestions(&group),
            range,
            line,
            column,
            confidence,
            severity,
            engine_ids,
            priority: survivor.priority,
            ignored: false,
        }
    }

    /// Union by text (keeping the best confidence), ordered by confidence then
    /// by the priority of the contributing engine, capped at `max_suggestions`.
    fn merge_suggestions(&self, group: &[Candidate]) -> Vec<Suggestion> {
        let mut merged: Vec<(Suggestion, u32)> = Vec::new();

        for member in group {
            for suggestion in &member.issue.suggestions {
                match merged.iter_mut().find(|(s, _)| s.text == suggestion.text) {
                    Some((existing, priority)) => {
                        if suggestion.confidence > existing.confidence {
                            existing.confidence = suggestion.confidence;
                        }
                        *priority = (*priority).min(member.priority);
                    }
                    None => merged.push((suggestion.clone(), member.priority)),
                }
            }
        }

        merged.sort_by(|(a, pa), (b, pb)| {
            b.confidence
                .total_cmp(&a.confidence)
                .then(pa.cmp(pb))
        });
        merged
            .into_iter()
            .take(self.config.max_suggestions)
            .map(|(s, _)| s)
            .collect()
    }
}

fn sanitized(text: &str, engine_id: &str, issue: &EngineIssue) -> EngineIssue {
    let (range, changed) = issue.range.sanitize(text);
    if changed {
        EngineRangeClamped {
            engine_id,
            issue_id: &issue.id,
            reported: (issue.range.start, issue.range.end),
            clamped: (range.start, range.end),
        }
        .log();
    }
    EngineIssue {
        range,
        ..issue.clone()
    }
}

/// Stable id from category, range and message, so identical requests yield identical ids.
fn issue_id(candidate: &Candidate) -> String {
    let issue = &candidate.issue;
    let mut hasher = blake3::Hasher::new();
    hasher.update(issue.category.as_str().as_bytes());
    hasher.update(&(issue.range.start as u64).to_le_bytes());
    hasher.update(&(issue.range.end as u64).to_le_bytes());
    hasher.update(issue.message.as_bytes());
    let hex = hasher.finalize().to_hex();
    format!("issue-{}", &hex.as_str()[..16])
}

/// 1-based line and character column of byte `offset`.
pub(crate) fn line_and_column(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
