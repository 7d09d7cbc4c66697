// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Maximum number of engine invocations in flight at once
pub const DEFAULT_CONCURRENCY: usize = 4;
/// Per-engine timeout when an engine entry does not set its own
pub const DEFAULT_ENGINE_TIMEOUT_MS: u64 = 5_000;
/// Upper bound for a whole `process` call
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 256;
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;
/// Suggestions kept on a merged issue
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;
/// Intersection-over-union at which two ranges count as the same issue
pub const DEFAULT_OVERLAP_THRESHOLD: f32 = 0.5;
/// Token Jaccard similarity at which two messages count as the same issue
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.6;
/// Language reported on results when the request does not name one
pub const DEFAULT_LANGUAGE: &str = "en-US";
