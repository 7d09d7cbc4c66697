// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors returned by `apply_correction`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorrectionError {
    #[error("Correction range {start}..{end} is inverted")]
    InvertedRange { start: usize, end: usize },

    #[error("Correction range {start}..{end} exceeds text length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("Correction offset {offset} is not on a UTF-8 character boundary")]
    NotCharBoundary { offset: usize },

    #[error("Issue '{issue_id}' has no suggestion at index {index}")]
    NoSuchSuggestion { issue_id: String, index: usize },
}
