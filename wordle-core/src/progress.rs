use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use wordle_types::{UserId, WordId};

/// A user's counters for one calendar day.
///
/// The counters only mean something while `last_play_date` is today. Every
/// request runs [`DailyProgress::reconcile`] before reading them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub user_id: UserId,
    pub last_play_date: Option<NaiveDate>,
    pub correct_guesses_today: u32,
    pub words_played_today: u32,
    pub current_puzzle: Option<WordId>,
}

impl DailyProgress {
    /// A user that has never played
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            last_play_date: None,
            correct_guesses_today: 0,
            words_played_today: 0,
            current_puzzle: None,
        }
    }

    /// True when the counters belong to `today` or to a later day. A request
    /// still carrying yesterday's date must not roll the user back.
    pub fn is_current(&self, today: NaiveDate) -> bool {
        self.last_play_date.is_some_and(|day| day >= today)
    }

    /// The day these counters are kept for, once reconciled
    pub fn play_day(&self, today: NaiveDate) -> NaiveDate {
        self.last_play_date.map_or(today, |day| day.max(today))
    }

    /// Day rollover. Only moves forward, and reconciling twice for the same
    /// day is a no-op.
    pub fn reconcile(self, today: NaiveDate) -> Self {
        if self.is_current(today) {
            return self;
        }

        Self {
            user_id: self.user_id,
            last_play_date: Some(today),
            correct_guesses_today: 0,
            words_played_today: 0,
            current_puzzle: None,
        }
    }

    pub fn is_limit_reached(&self, daily_limit: u32) -> bool {
        self.words_played_today >= daily_limit
    }

    pub fn bind(self, word_id: WordId) -> Self {
        Self {
            current_puzzle: Some(word_id),
            ..self
        }
    }

    /// A puzzle ended, solved or out of attempts
    pub fn record_completion(self, solved: bool) -> Self {
        Self {
            words_played_today: self.words_played_today + 1,
            correct_guesses_today: self.correct_guesses_today + u32::from(solved),
            current_puzzle: None,
            ..self
        }
    }
}
