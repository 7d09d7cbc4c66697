// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Memoization of consolidated results.
//!
//! [`Fingerprint`] derives a deterministic key from request text and the
//! options that affect the result; [`CacheManager`] maps fingerprints to
//! results with an entry bound and an optional TTL that is enforced lazily
//! on lookup.

mod fingerprint;
mod manager;

pub use fingerprint::Fingerprint;
pub use manager::{CacheManager, CacheStats};
