// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in, in-process analysis engines.
//!
//! Each engine implements [`EngineHooks`](crate::traits::EngineHooks) and is
//! wrapped in [`ManagedEngine`](crate::backends::base::ManagedEngine) by
//! [`LocalEngineFactory`]. They are intentionally small rule sets, enough to
//! exercise the orchestrator end to end.

pub mod factory;
pub mod grammar_rules;
pub mod punctuation;
pub mod spelling;
mod tokens;

pub use factory::LocalEngineFactory;
pub use grammar_rules::GrammarRulesEngine;
pub use punctuation::PunctuationEngine;
pub use spelling::SpellingEngine;

use tokio_util::sync::CancellationToken;

use crate::errors::AnalysisError;
use crate::model::EngineOptions;

/// Rule ids from `options.rules` that this engine knows. When none match,
/// every rule in `known` runs.
pub(crate) fn active_rules<'a>(options: &EngineOptions, known: &[&'a str]) -> Vec<&'a str> {
    let selected: Vec<&'a str> = known
        .iter()
        .copied()
        .filter(|rule| options.rules.iter().any(|r| r == rule))
        .collect();
    if selected.is_empty() {
        known.to_vec()
    } else {
        selected
    }
}

/// Cooperative cancellation check for CPU-bound loops.
pub(crate) fn ensure_active(cancel: &CancellationToken) -> Result<(), AnalysisError> {
    if cancel.is_cancelled() {
        return Err(AnalysisError::timeout("analysis cancelled", std::time::Duration::ZERO)
            .with_recoverable(false)
            .with_detail("reason", "cancelled"));
    }
    Ok(())
}

/// Re-case `replacement` to follow `original`: `TEH` -> `THE`, `Teh` -> `The`.
pub(crate) fn match_case(original: &str, replacement: &str) -> String {
    let letters: Vec<char> = original.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return replacement.to_uppercase();
    }
    match original.chars().next() {
        Some(first) if first.is_uppercase() => capitalize(replacement),
        _ => replacement.to_string(),
    }
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
