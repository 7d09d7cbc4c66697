// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::PriorityRule;
use crate::model::IssueCategory;

/// Resolves the priority of an issue from the configured rules.
///
/// The most specific matching rule wins: engine and category, then engine
/// only, then category only. Among equally specific rules the first listed
/// wins. With no match the category's default priority applies.
pub struct PriorityResolver<'a> {
    rules: &'a [PriorityRule],
}

impl<'a> PriorityResolver<'a> {
    pub fn new(rules: &'a [PriorityRule]) -> Self {
        Self { rules }
    }

    pub fn priority_for(&self, engine_id: &str, category: IssueCategory) -> u32 {
        let mut best: Option<(u8, u32)> = None;

        for rule in self.rules {
            let Some(specificity) = specificity(rule, engine_id, category) else {
                continue;
            };
            if best.map_or(true, |(current, _)| specificity > current) {
                best = Some((specificity, rule.priority));
            }
        }

        best.map(|(_, priority)| priority)
            .unwrap_or_else(|| category.default_priority())
    }
}

fn specificity(rule: &PriorityRule, engine_id: &str, category: IssueCategory) -> Option<u8> {
    let engine_match = rule.engine.as_deref().map(|e| e == engine_id);
    let category_match = rule.category.map(|c| c == category);

    match (engine_match, category_match) {
        (Some(true), Some(true)) => Some(3),
        (Some(true), None) => Some(2),
        (None, Some(true)) => Some(1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(engine: Option<&str>, category: Option<IssueCategory>, priority: u32) -> PriorityRule {
        PriorityRule {
            engine: engine.map(String::from),
            category,
            priority,
        }
    }

    #[test]
    fn test_default_priority_without_rules() {
        let resolver = PriorityResolver::new(&[]);
        assert_eq!(resolver.priority_for("any", IssueCategory::Spelling), 10);
        assert_eq!(resolver.priority_for("any", IssueCategory::Style), 50);
    }

    #[test]
    fn test_specificity_order() {
        let rules = vec![
            rule(None, Some(IssueCategory::Grammar), 30),
            rule(Some("grammar"), None, 20),
            rule(Some("grammar"), Some(IssueCategory::Grammar), 5),
        ];
        let resolver = PriorityResolver::new(&rules);

        assert_eq!(resolver.priority_for("grammar", IssueCategory::Grammar), 5);
        assert_eq!(resolver.priority_for("grammar", IssueCategory::Typography), 20);
        assert_eq!(resolver.priority_for("other", IssueCategory::Grammar), 30);
        assert_eq!(resolver.priority_for("other", IssueCategory::Typography), 40);
    }

    #[test]
    fn test_first_rule_wins_among_equals() {
        let rules = vec![
            rule(Some("spelling"), None, 7),
            rule(Some("spelling"), None, 1),
        ];
        let resolver = PriorityResolver::new(&rules);
        assert_eq!(resolver.priority_for("spelling", IssueCategory::Spelling), 7);
    }

    #[test]
    fn test_partial_mismatch_does_not_match() {
        let rules = vec![rule(Some("grammar"), Some(IssueCategory::Spelling), 1)];
        let resolver = PriorityResolver::new(&rules);
        assert_eq!(resolver.priority_for("grammar", IssueCategory::Grammar), 20);
    }
}
