use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use wordle_types::{UserId, WordId};

use crate::word::Word;

/// A word from the shared pool, as handed out by storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolWord {
    pub id: WordId,
    pub word: Word,
}

/// Append-only guess history for one (user, word, day)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRecord {
    pub id: i64,
    pub user_id: UserId,
    pub word_id: WordId,
    pub day: NaiveDate,
    pub guesses: Vec<Word>,
    pub solved: bool,
}

impl GuessRecord {
    pub fn attempts(&self) -> usize {
        self.guesses.len()
    }

    pub fn is_finished(&self, max_attempts: usize) -> bool {
        self.solved || self.attempts() >= max_attempts
    }

    pub fn attempts_remaining(&self, max_attempts: usize) -> usize {
        max_attempts.saturating_sub(self.attempts())
    }

    /// The record as it looks after one more guess
    pub fn with_guess(&self, guess: Word, solved: bool) -> Self {
        let mut next = self.clone();
        next.guesses.push(guess);
        next.solved = self.solved || solved;
        next
    }

    pub fn guess_strings(&self) -> Vec<String> {
        self.guesses.iter().map(|g| g.as_str().to_string()).collect()
    }
}
