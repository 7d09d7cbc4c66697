// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use thiserror::Error;

/// Problems found while validating an orchestrator configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A numeric setting is outside its allowed range
    OutOfRange {
        /// Dotted path of the offending setting
        field: String,
        /// Human readable description of the allowed range
        expected: &'static str,
    },
    /// An engine id appears more than once in the initialization sequence
    DuplicateInitEntry {
        /// The duplicated engine id
        engine_id: String,
    },
    /// A priority rule matches neither an engine nor a category
    EmptyPriorityRule {
        /// Position of the rule in the configured list
        index: usize,
    },
    /// An engine entry names a local implementation that does not exist
    UnknownImplementation {
        engine_id: String,
        implementation: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::OutOfRange { field, expected } => {
                write!(f, "Setting '{}' is out of range: expected {}", field, expected)
            }
            ValidationError::DuplicateInitEntry { engine_id } => {
                write!(
                    f,
                    "Engine '{}' appears more than once in init_sequence",
                    engine_id
                )
            }
            ValidationError::EmptyPriorityRule { index } => {
                write!(
                    f,
                    "Priority rule #{} must name an engine, a category, or both",
                    index
                )
            }
            ValidationError::UnknownImplementation {
                engine_id,
                implementation,
            } => {
                write!(
                    f,
                    "Engine '{}' uses unknown local implementation '{}'",
                    engine_id, implementation
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported configuration file extension: '{0}' (expected .yaml, .yml or .toml)")]
    UnsupportedFormat(String),

    #[error("Configuration validation failed:\n{}", join_lines(.0))]
    Validation(Vec<ValidationError>),
}

fn join_lines(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
