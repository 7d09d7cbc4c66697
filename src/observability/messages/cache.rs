// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for result cache events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Result of a cache lookup.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct CacheLookup<'a> {
    pub key: &'a str,
    pub hit: bool,
    pub size: usize,
}

impl Display for CacheLookup<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let outcome = if self.hit { "hit" } else { "miss" };
        write!(f, "Cache {} for key {} ({} entries)", outcome, self.key, self.size)
    }
}

impl StructuredLog for CacheLookup<'_> {
    fn log(&self) {
        tracing::debug!(key = self.key, hit = self.hit, size = self.size, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("cache_lookup", span_name = name, key = self.key, hit = self.hit)
    }
}

/// An entry outlived its TTL and was dropped on access.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct CacheEntryExpired<'a> {
    pub key: &'a str,
}

impl Display for CacheEntryExpired<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Cache entry {} expired", self.key)
    }
}

impl StructuredLog for CacheEntryExpired<'_> {
    fn log(&self) {
        tracing::debug!(key = self.key, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("cache_entry_expired", span_name = name, key = self.key)
    }
}
