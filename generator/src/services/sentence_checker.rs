//! Dictionary check for input without any recognizable word

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use crate::error::{GenerationError, GenerationResult};

const EMBEDDED_WORDS: &str = include_str!("../../resources/words.txt");

/// English dictionary lookup
#[derive(Debug, Clone)]
pub struct SentenceChecker {
    words: HashSet<String>,
}

impl SentenceChecker {
    /// Checker backed by the word list compiled into the binary
    pub fn embedded() -> Self {
        Self::from_word_list(EMBEDDED_WORDS)
    }

    /// Checker backed by a newline-separated word list
    pub fn from_word_list(list: &str) -> Self {
        let words = list
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();
        Self { words }
    }

    /// Load a word list file, one word per line
    pub async fn from_file(path: &Path) -> GenerationResult<Self> {
        let list = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GenerationError::ConfigError {
                message: format!("failed to read word list {}: {e}", path.display()),
            })?;

        let checker = Self::from_word_list(&list);
        info!(path = %path.display(), words = checker.len(), "Loaded word list");
        Ok(checker)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// True when no word of `text` is in the dictionary
    pub fn is_meaningless(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        !lowered
            .split(|c: char| !c.is_alphabetic())
            .filter(|word| !word.is_empty())
            .any(|word| self.words.contains(word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gibberish_is_meaningless() {
        let checker = SentenceChecker::embedded();
        assert!(checker.is_meaningless("asdkj qwoeiru"));
        assert!(checker.is_meaningless(""));
        assert!(checker.is_meaningless("1234 !!!"));
    }

    #[test]
    fn test_one_known_word_is_enough() {
        let checker = SentenceChecker::embedded();
        assert!(!checker.is_meaningless("Salon U is an award-winning salon"));
        assert!(!checker.is_meaningless("xqzt HAIR zzkq"));
        assert!(!checker.is_meaningless("Welcome!"));
    }

    #[tokio::test]
    async fn test_word_list_file_replaces_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        tokio::fs::write(&path, "Bonjour\nsalut\n").await.unwrap();

        let checker = SentenceChecker::from_file(&path).await.unwrap();

        assert_eq!(checker.len(), 2);
        assert!(!checker.is_meaningless("bonjour tout"));
        assert!(checker.is_meaningless("hello there"));
    }

    #[tokio::test]
    async fn test_missing_word_list_is_config_error() {
        let result = SentenceChecker::from_file(Path::new("/nonexistent/words.txt")).await;
        assert!(matches!(result, Err(GenerationError::ConfigError { .. })));
    }
}
