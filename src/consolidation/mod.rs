// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Merging per-engine issues into one ordered list.
//!
//! [`ResultsConsolidator::consolidate`] takes the raw output of every engine
//! that succeeded for a request and:
//!
//! 1. clamps each range into the text and onto character boundaries
//! 2. assigns each issue a priority from the configured [`PriorityRule`](crate::config::PriorityRule)s
//! 3. groups duplicates using the configured [`DedupStrategy`](crate::config::DedupStrategy)
//! 4. merges each group into the highest-priority issue
//! 5. orders the survivors by priority, then offset, then engine id
//!
//! # Example
//! ```rust
//! use the_proofreader::config::ConsolidationConfig;
//! use the_proofreader::consolidation::{EngineResult, ResultsConsolidator};
//! use the_proofreader::model::{EngineIssue, EngineOutput, IssueCategory, TextRange};
//!
//! let issue = EngineIssue::new("e1", IssueCategory::Spelling, "Possible misspelling", TextRange::new(0, 3))
//!     .with_suggestion("The", 0.9);
//! let results = vec![
//!     EngineResult::new("spelling", EngineOutput::with_issues(vec![issue.clone()])),
//!     EngineResult::new("grammar", EngineOutput::with_issues(vec![issue])),
//! ];
//!
//! let issues = ResultsConsolidator::new(ConsolidationConfig::default()).consolidate("Teh cat", &results);
//! assert_eq!(issues.len(), 1);
//! assert_eq!(issues[0].engine_ids, vec!["grammar", "spelling"]);
//! ```

mod consolidator;
pub mod dedup;
pub mod priority;


pub use consolidator::{EngineResult, ResultsConsolidator};
pub use priority::PriorityResolver;
