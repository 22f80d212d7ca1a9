//! A small word finder, tested with golden fixtures under `tests/`.
//!
//! Regenerate the fixtures with `UPDATE_GOLDENS=1 cargo test -p golden-fixture-demos`.

use golden_fixture::FailureKind;
use std::borrow::Cow;
use thiserror::Error;

/// Words of `text`: runs of alphanumeric characters (and inner apostrophes),
/// lowercased, in order of appearance.
pub fn find_words(text: &str) -> Vec<String> {
    let words: Vec<String> = text
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    tracing::info!(target: "golden_fixture_demos", "found {} words", words.len());
    words
}

#[derive(Debug, Error)]
pub enum WordError {
    #[error("no words in input")]
    NoWords,
    #[error("tie between '{0}' and '{1}'")]
    Tie(String, String),
}

impl FailureKind for WordError {
    fn failure_kind(&self) -> Cow<'static, str> {
        Cow::Borrowed(match self {
            WordError::NoWords => "NoWords",
            WordError::Tie(..) => "Tie",
        })
    }
}

/// The single longest word of `text`.
pub fn longest_word(text: &str) -> Result<String, WordError> {
    let mut best: Option<String> = None;
    let mut tied: Option<String> = None;
    for word in find_words(text) {
        let len = word.chars().count();
        match &best {
            Some(current) if len < current.chars().count() => {}
            Some(current) if len == current.chars().count() => {
                if *current != word {
                    tied = Some(word);
                }
            }
            _ => {
                best = Some(word);
                tied = None;
            }
        }
    }

    match (best, tied) {
        (None, _) => Err(WordError::NoWords),
        (Some(best), Some(other)) => Err(WordError::Tie(best, other)),
        (Some(best), None) => Ok(best),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_words_splits_on_punctuation() {
        assert_eq!(find_words("Hello, world!"), vec!["hello", "world"]);
        assert_eq!(find_words("don't 'quote'"), vec!["don't", "quote"]);
        assert!(find_words("  ...  ").is_empty());
    }

    #[test]
    fn test_longest_word() {
        assert_eq!(longest_word("a bb ccc").unwrap(), "ccc");
        assert!(matches!(longest_word(""), Err(WordError::NoWords)));
        assert!(matches!(longest_word("ab cd"), Err(WordError::Tie(..))));
        assert_eq!(longest_word("ab ab").unwrap(), "ab");
    }
}
