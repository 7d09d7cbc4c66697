// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::time::Duration;
use tokio::time::Instant;

use super::Fingerprint;
use crate::config::CacheConfig;
use crate::model::CheckResult;
use crate::observability::messages::cache::{CacheEntryExpired, CacheLookup};
use crate::observability::messages::StructuredLog;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    /// `hits / (hits + misses)`, or 0 before the first lookup.
    pub efficiency: f64,
}

struct Entry {
    result: CheckResult,
    inserted: Instant,
}

struct Inner {
    entries: LruCache<Fingerprint, Entry>,
    ttl: Option<Duration>,
    hits: u64,
    misses: u64,
}

/// Bounded result cache.
///
/// Lookups use `peek`, so recency is never refreshed by reads and the entry
/// evicted at capacity is the oldest insertion. Expired entries are removed
/// when a lookup touches them; there is no background sweeper. All state sits
/// behind one lock so concurrent `get`/`set` keep size and order consistent.
pub struct CacheManager {
    inner: Mutex<Inner>,
}

fn capacity(max_entries: usize) -> NonZeroUsize {
    NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN)
}

impl CacheManager {
    pub fn new(max_entries: usize, ttl: Option<Duration>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(capacity(max_entries)),
                ttl,
                hits: 0,
                misses: 0,
            }),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_entries, config.ttl())
    }

    /// The cached result for `key`, marked as a cache hit.
    pub fn get(&self, key: &Fingerprint) -> Option<CheckResult> {
        let mut inner = self.inner.lock();
        let ttl = inner.ttl;

        let expired = match inner.entries.peek(key) {
            Some(entry) => ttl.is_some_and(|ttl| entry.inserted.elapsed() >= ttl),
            None => false,
        };
        if expired {
            inner.entries.pop(key);
            CacheEntryExpired { key: key.as_str() }.log();
        }

        let found = inner.entries.peek(key).map(|entry| {
            let mut result = entry.result.clone();
            result.metadata.cache_hit = true;
            result
        });

        if found.is_some() {
            inner.hits += 1;
        } else {
            inner.misses += 1;
        }
        CacheLookup {
            key: key.as_str(),
            hit: found.is_some(),
            size: inner.entries.len(),
        }
        .log();

        found
    }

    pub fn set(&self, key: Fingerprint, result: CheckResult) {
        let mut result = result;
        result.metadata.cache_hit = false;
        self.inner.lock().entries.push(
            key,
            Entry {
                result,
                inserted: Instant::now(),
            },
        );
    }

    /// Drop one entry. Returns whether it was present.
    pub fn invalidate(&self, key: &Fingerprint) -> bool {
        self.inner.lock().entries.pop(key).is_some()
    }

    /// Drop every entry. Hit and miss counters are kept.
    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    /// Apply new bounds, evicting the oldest entries if the cache shrinks.
    pub fn reconfigure(&self, max_entries: usize, ttl: Option<Duration>) {
        let mut inner = self.inner.lock();
        inner.entries.resize(capacity(max_entries));
        inner.ttl = ttl;
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let lookups = inner.hits + inner.misses;
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            size: inner.entries.len(),
            efficiency: if lookups == 0 {
                0.0
            } else {
                inner.hits as f64 / lookups as f64
            },
        }
    }
}
