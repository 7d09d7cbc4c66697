// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use crate::config::consts::DEFAULT_LANGUAGE;
use crate::model::{CheckOptions, Priority};

/// Cache key for a `(text, options)` pair.
///
/// Options are normalized first: engine and rule lists are sorted and
/// deduplicated, so requests that differ only in list order share a key. The
/// language is hashed as the result will carry it, with a missing language
/// resolved to [`DEFAULT_LANGUAGE`]. `timeout_ms` is excluded because it never changes
/// the content of a result that is allowed into the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(text: &str, options: &CheckOptions) -> Self {
        let mut hasher = blake3::Hasher::new();
        field(&mut hasher, text);
        field(&mut hasher, options.language.as_deref().unwrap_or(DEFAULT_LANGUAGE));
        field(&mut hasher, options.domain.as_deref().unwrap_or_default());
        field(
            &mut hasher,
            match options.priority {
                Priority::Speed => "speed",
                Priority::Balanced => "balanced",
                Priority::Accuracy => "accuracy",
            },
        );

        match &options.engines {
            Some(engines) => {
                field(&mut hasher, "engines");
                list(&mut hasher, engines);
            }
            None => field(&mut hasher, "all-engines"),
        }
        list(&mut hasher, &options.rules);

        Self(hasher.finalize().to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Length-prefixed so adjacent fields can't run together.
fn field(hasher: &mut blake3::Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn list(hasher: &mut blake3::Hasher, values: &[String]) {
    let mut sorted: Vec<&str> = values.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.dedup();
    hasher.update(&(sorted.len() as u64).to_le_bytes());
    for value in sorted {
        field(hasher, value);
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_request_same_key() {
        let options = CheckOptions::default().with_language("en-US");
        assert_eq!(
            Fingerprint::new("Teh cat", &options),
            Fingerprint::new("Teh cat", &options)
        );
        assert_eq!(Fingerprint::new("x", &options).as_str().len(), 64);
    }

    #[test]
    fn test_text_and_options_change_key() {
        let base = CheckOptions::default();
        let key = Fingerprint::new("Teh cat", &base);

        assert_ne!(key, Fingerprint::new("The cat", &base));
        assert_ne!(key, Fingerprint::new("Teh cat", &base.clone().with_priority(Priority::Speed)));
        assert_ne!(key, Fingerprint::new("Teh cat", &base.clone().with_engines(["grammar"])));
        assert_ne!(
            Fingerprint::new("Teh cat", &base.clone().with_engines(Vec::<String>::new())),
            key
        );
    }

    #[test]
    fn test_normalization() {
        let a = CheckOptions::default()
            .with_engines(["spelling", "grammar"])
            .with_language("en-US");
        let b = CheckOptions::default()
            .with_engines(["grammar", "spelling", "grammar"])
            .with_language("en-US")
            .with_timeout_ms(5);

        assert_eq!(Fingerprint::new("t", &a), Fingerprint::new("t", &b));
    }

    #[test]
    fn test_language_is_keyed_as_resolved() {
        let implicit = CheckOptions::default();
        let explicit = CheckOptions::default().with_language(DEFAULT_LANGUAGE);
        assert_eq!(Fingerprint::new("t", &implicit), Fingerprint::new("t", &explicit));

        let shouted = CheckOptions::default().with_language("EN-us");
        assert_ne!(Fingerprint::new("t", &shouted), Fingerprint::new("t", &explicit));
    }

    #[test]
    fn test_fields_do_not_run_together() {
        let a = CheckOptions {
            domain: Some("b".into()),
            ..CheckOptions::default()
        };
        assert_ne!(Fingerprint::new("ab", &CheckOptions::default()), Fingerprint::new("a", &a));
    }
}
