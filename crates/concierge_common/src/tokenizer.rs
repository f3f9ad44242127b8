//! Tokenizer - text normalization for matching
//!
//! Lowercases text and splits on any run of non-word characters.
//! Word characters are alphanumerics and `_`.

use std::collections::HashSet;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Tokenize text into lowercase tokens (deterministic, never fails)
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !is_word_char(c))
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Distinct tokens of a text
pub fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

/// Tokens rejoined with single spaces, used for phrase lookups
/// ("T-Shirts!" -> "t shirts").
pub fn normalize_phrase(text: &str) -> String {
    tokenize(text).join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        assert_eq!(tokenize("Hello, World!"), vec!["hello", "world"]);
    }

    #[test]
    fn test_tokenize_empty_and_punctuation_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  ?!... ").is_empty());
    }

    #[test]
    fn test_tokenize_keeps_underscores_and_digits() {
        assert_eq!(
            tokenize("order_id 42-b"),
            vec!["order_id", "42", "b"]
        );
    }

    #[test]
    fn test_normalize_phrase() {
        assert_eq!(normalize_phrase("  T-Shirts!! "), "t shirts");
        assert_eq!(normalize_phrase("Business   Cards"), "business cards");
    }

    #[test]
    fn test_token_set_dedups() {
        let set = token_set("a b a B");
        assert_eq!(set.len(), 2);
    }
}
