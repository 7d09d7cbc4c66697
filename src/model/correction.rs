// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use super::{Issue, TextRange};
use crate::errors::CorrectionError;

/// A chosen replacement for a span of the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub range: TextRange,
    pub replacement: String,
}

impl Correction {
    pub fn new(range: TextRange, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    /// Build a correction from one of an issue's suggestions.
    pub fn from_issue(issue: &Issue, suggestion_index: usize) -> Result<Self, CorrectionError> {
        let suggestion = issue.suggestions.get(suggestion_index).ok_or_else(|| {
            CorrectionError::NoSuchSuggestion {
                issue_id: issue.id.clone(),
                index: suggestion_index,
            }
        })?;
        Ok(Self::new(issue.range, suggestion.text.clone()))
    }
}

/// Return `text` with the correction applied. The input is never modified.
pub fn apply_correction(text: &str, correction: &Correction) -> Result<String, CorrectionError> {
    let TextRange { start, end } = correction.range;
    if start > end {
        return Err(CorrectionError::InvertedRange { start, end });
    }
    if end > text.len() {
        return Err(CorrectionError::OutOfBounds {
            start,
            end,
            len: text.len(),
        });
    }
    for offset in [start, end] {
        if !text.is_char_boundary(offset) {
            return Err(CorrectionError::NotCharBoundary { offset });
        }
    }

    let mut corrected =
        String::with_capacity(text.len() - (end - start) + correction.replacement.len());
    corrected.push_str(&text[..start]);
    corrected.push_str(&correction.replacement);
    corrected.push_str(&text[end..]);
    Ok(corrected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_correction_replaces_range() {
        let fixed = apply_correction("Teh cat", &Correction::new(TextRange::new(0, 3), "The")).unwrap();
        assert_eq!(fixed, "The cat");
    }

    #[test]
    fn test_apply_correction_can_insert_and_delete() {
        let inserted = apply_correction("cat", &Correction::new(TextRange::new(0, 0), "a ")).unwrap();
        assert_eq!(inserted, "a cat");
        let deleted = apply_correction("the the cat", &Correction::new(TextRange::new(3, 7), "")).unwrap();
        assert_eq!(deleted, "the cat");
    }

    #[test]
    fn test_apply_correction_rejects_bad_ranges() {
        assert_eq!(
            apply_correction("abc", &Correction::new(TextRange::new(2, 1), "x")),
            Err(CorrectionError::InvertedRange { start: 2, end: 1 })
        );
        assert_eq!(
            apply_correction("abc", &Correction::new(TextRange::new(1, 9), "x")),
            Err(CorrectionError::OutOfBounds { start: 1, end: 9, len: 3 })
        );
        assert_eq!(
            apply_correction("héllo", &Correction::new(TextRange::new(2, 3), "e")),
            Err(CorrectionError::NotCharBoundary { offset: 2 })
        );
    }
}
