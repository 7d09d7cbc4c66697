// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// A word with its byte span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Word<'a> {
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\''
}

/// Split `text` into words: maximal runs of alphanumerics and apostrophes.
pub(crate) fn words(text: &str) -> Vec<Word<'_>> {
    let mut words = Vec::new();
    let mut start = None;

    for (idx, c) in text.char_indices() {
        match (is_word_char(c), start) {
            (true, None) => start = Some(idx),
            (false, Some(s)) => {
                words.push(Word { start: s, end: idx, text: &text[s..idx] });
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        words.push(Word { start: s, end: text.len(), text: &text[s..] });
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_with_offsets() {
        let found = words("Don't  stop, café!");
        let texts: Vec<&str> = found.iter().map(|w| w.text).collect();
        assert_eq!(texts, vec!["Don't", "stop", "café"]);
        assert_eq!((found[1].start, found[1].end), (7, 11));
        assert_eq!(found[2].end, "Don't  stop, café".len());
    }

    #[test]
    fn test_words_empty() {
        assert!(words("  ...  ").is_empty());
    }
}
