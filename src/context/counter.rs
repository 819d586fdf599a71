//! Token counting backends
//!
//! The budget only needs a deterministic count per text, so counting sits
//! behind the [`Tokenizer`] trait:
//!
//! - [`HeuristicTokenizer`]: 1 token ≈ 4 characters, never fails
//! - [`HfTokenizer`]: exact counts from a HuggingFace `tokenizer.json`
//!
//! # Complexity
//! O(n) where n = text length

use crate::errors::{ConversationError, Result};
use std::path::Path;

/// Deterministic text → cost-unit counter
pub trait Tokenizer: Send + Sync {
    /// Count cost units in `text`
    fn count(&self, text: &str) -> Result<usize>;
}

/// Token counter with heuristic-based estimation
#[derive(Debug, Clone, Default)]
pub struct HeuristicTokenizer;

impl HeuristicTokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Estimate token count for text
    ///
    /// # Formula
    ///
    /// ```text
    /// estimate_tokens(text) = ⌈len(text) / 4⌉
    /// ```
    ///
    /// # Examples
    ///
    /// ```
    /// # use convobuddy::context::counter::HeuristicTokenizer;
    /// let counter = HeuristicTokenizer::new();
    /// assert_eq!(counter.estimate(&"a".repeat(100)), 25);
    /// ```
    pub fn estimate(&self, text: &str) -> usize {
        let char_count = text.chars().count();

        // Ceiling division to avoid underestimation
        (char_count + 3) / 4
    }
}

impl Tokenizer for HeuristicTokenizer {
    fn count(&self, text: &str) -> Result<usize> {
        Ok(self.estimate(text))
    }
}

/// Tokenizer backed by a HuggingFace `tokenizer.json`
pub struct HfTokenizer {
    inner: tokenizers::Tokenizer,
}

impl HfTokenizer {
    /// Load tokenizer definition from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let inner = tokenizers::Tokenizer::from_file(path).map_err(|e| {
            ConversationError::ConfigError(format!(
                "Failed to load tokenizer from {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self { inner })
    }
}

impl Tokenizer for HfTokenizer {
    fn count(&self, text: &str) -> Result<usize> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| ConversationError::TokenCountError(e.to_string()))?;

        Ok(encoding.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_estimation() {
        let counter = HeuristicTokenizer::new();

        // 100 characters ≈ 25 tokens
        let text = "a".repeat(100);
        assert_eq!(counter.count(&text).unwrap(), 25);
    }

    #[test]
    fn test_empty_string() {
        let counter = HeuristicTokenizer::new();
        assert_eq!(counter.count("").unwrap(), 0);
    }

    #[test]
    fn test_single_character() {
        let counter = HeuristicTokenizer::new();
        // 1 char = 1 token (ceiling division)
        assert_eq!(counter.count("a").unwrap(), 1);
    }

    #[test]
    fn test_unicode_characters() {
        let counter = HeuristicTokenizer::new();

        // Counts chars, not bytes
        let text = "日本語";
        assert_eq!(counter.count(text).unwrap(), 1);
    }

    #[test]
    fn test_deterministic() {
        let counter = HeuristicTokenizer::new();
        let text = "Please remember this random word: ZEBRA";

        assert_eq!(counter.count(text).unwrap(), counter.count(text).unwrap());
    }

    #[test]
    fn test_linear_scaling() {
        let counter = HeuristicTokenizer::new();

        let base_tokens = counter.estimate(&"test ".repeat(10));
        let double_tokens = counter.estimate(&"test ".repeat(20));

        let ratio = double_tokens as f64 / base_tokens as f64;
        assert!((1.9..=2.1).contains(&ratio), "Expected ~2x ratio, got {}", ratio);
    }

    #[test]
    fn test_hf_tokenizer_missing_file() {
        let result = HfTokenizer::from_file("/definitely/not/here/tokenizer.json");
        assert!(matches!(result, Err(ConversationError::ConfigError(_))));
    }
}
