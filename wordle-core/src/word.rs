use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const WORD_LENGTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{input:?} is not a 5-letter word")]
pub struct InvalidWord {
    pub input: String,
}

/// A normalized puzzle token: exactly five ASCII letters, uppercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word(String);

impl Word {
    /// Trim, uppercase and validate raw user input
    pub fn parse(input: &str) -> Result<Self, InvalidWord> {
        let normalized = input.trim().to_ascii_uppercase();

        if normalized.len() != WORD_LENGTH || !normalized.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(InvalidWord {
                input: input.to_string(),
            });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Word {
    type Error = InvalidWord;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Word::parse(&value)
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.0
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Deduplicated, ordered set of playable words parsed from a plain-text list
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: Vec<Word>,
}

impl WordList {
    /// Parse a word list, one word per line. Blank lines and `#` comments are
    /// skipped; entries that are not five letters are dropped.
    pub fn from_word_list(word_list: &str) -> Self {
        let mut seen = HashSet::new();
        let words = word_list
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| Word::parse(line).ok())
            .filter(|word| seen.insert(word.clone()))
            .collect();

        Self { words }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &Word) -> bool {
        self.words.contains(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let word = Word::parse("  crane ").unwrap();
        assert_eq!(word.as_str(), "CRANE");

        let word = Word::parse("CrAnE").unwrap();
        assert_eq!(word.as_str(), "CRANE");
    }

    #[test]
    fn test_parse_rejects_bad_lengths() {
        assert!(Word::parse("").is_err());
        assert!(Word::parse("four").is_err());
        assert!(Word::parse("sixsix").is_err());
    }

    #[test]
    fn test_parse_rejects_non_letters() {
        assert!(Word::parse("h3ll0").is_err());
        assert!(Word::parse("ab-cd").is_err());
        assert!(Word::parse("ab cd").is_err());
        // Non-ASCII letters are not part of the puzzle alphabet
        assert!(Word::parse("crème").is_err());
    }

    #[test]
    fn test_invalid_word_keeps_original_input() {
        let err = Word::parse(" no ").unwrap_err();
        assert_eq!(err.input, " no ");
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let word: Word = serde_json::from_str("\"llama\"").unwrap();
        assert_eq!(word.as_str(), "LLAMA");
        assert_eq!(serde_json::to_string(&word).unwrap(), "\"LLAMA\"");

        let bad: Result<Word, _> = serde_json::from_str("\"toolong\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_word_list_parsing() {
        let word_list = "# pool\napple\n\nCRANE\n  spaced  \nbanana\nab\nllama\nApple\nh3ll0\n";
        let list = WordList::from_word_list(word_list);

        assert_eq!(list.len(), 3);
        assert_eq!(
            list.words().iter().map(Word::as_str).collect::<Vec<_>>(),
            vec!["APPLE", "CRANE", "LLAMA"]
        );
        assert!(list.contains(&Word::parse("crane").unwrap()));
        assert!(!list.contains(&Word::parse("space").unwrap()));
    }

    #[test]
    fn test_empty_word_list() {
        let list = WordList::from_word_list("");
        assert!(list.is_empty());
    }
}
