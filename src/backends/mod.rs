// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Analysis engine backends for The Proofreader.
//!
//! # Available Backends
//!
//! ## Base
//! [`base::ManagedEngine`] turns a small [`EngineHooks`](crate::traits::EngineHooks)
//! implementation into a full [`AnalysisEngine`](crate::traits::AnalysisEngine)
//! with lifecycle tracking, per-call deadlines and status bookkeeping.
//!
//! ## Local Backend
//! In-process rule engines:
//! - **grammar_rules**: demonstrative/verb agreement, repeated words, sentence capitalization
//! - **spelling**: misspelling table with per-engine custom dictionary
//! - **punctuation**: doubled spaces, space before punctuation
//!
//! ## Stub Backend (Test-Only)
//! Scriptable engines with configurable latency, failures and issues. Not
//! available in production builds.
//!
//! # Examples
//!
//! ```rust
//! use the_proofreader::backends::local::LocalEngineFactory;
//! use the_proofreader::traits::AnalysisEngine;
//! use std::time::Duration;
//!
//! let engine = LocalEngineFactory::create_engine("spelling", "spelling", Duration::from_secs(1))?;
//! assert_eq!(engine.id(), "spelling");
//! # Ok::<(), the_proofreader::errors::ValidationError>(())
//! ```

pub mod base;
pub mod local;
#[cfg(test)]
pub mod stub;
