use async_trait::async_trait;
use chrono::NaiveDate;
use wordle_types::{DailyTally, GameError, UserId, WordId};

use crate::progress::DailyProgress;
use crate::record::{GuessRecord, PoolWord};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A guarded update touched no rows: someone else changed the row first
    #[error("concurrent update conflict")]
    Conflict,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for GameError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => GameError::ConcurrentUpdateConflict,
            StoreError::Backend(e) => GameError::Storage {
                message: e.to_string(),
            },
        }
    }
}

/// One guess, ready to be committed atomically.
///
/// `record` is the post-append state; storage must only apply it while the
/// stored record still has `expected_attempts` guesses.
#[derive(Debug, Clone)]
pub struct GuessCommit {
    pub record: GuessRecord,
    pub expected_attempts: usize,
    pub is_correct: bool,
    pub finished: bool,
}

/// Durable state behind the engine
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn load_progress(&self, user_id: UserId) -> StoreResult<Option<DailyProgress>>;

    /// Persist a rolled-over progress row. Only applies when the stored
    /// `last_play_date` is unset or earlier than `progress.last_play_date`.
    async fn roll_over(&self, progress: &DailyProgress) -> StoreResult<()>;

    async fn find_word(&self, word_id: WordId) -> StoreResult<Option<PoolWord>>;

    async fn attempted_word_ids(&self, user_id: UserId, day: NaiveDate) -> StoreResult<Vec<WordId>>;

    async fn candidate_words(&self, exclude: &[WordId]) -> StoreResult<Vec<PoolWord>>;

    /// Set `current_puzzle` (only while unset) and get-or-create the
    /// (user, word, day) record in one unit. `Conflict` when another request
    /// bound a puzzle first.
    async fn bind_puzzle(
        &self,
        user_id: UserId,
        word_id: WordId,
        day: NaiveDate,
    ) -> StoreResult<GuessRecord>;

    /// Get-or-create the (user, word, day) record
    async fn ensure_record(
        &self,
        user_id: UserId,
        word_id: WordId,
        day: NaiveDate,
    ) -> StoreResult<GuessRecord>;

    async fn find_record(
        &self,
        user_id: UserId,
        word_id: WordId,
        day: NaiveDate,
    ) -> StoreResult<Option<GuessRecord>>;

    /// Append the guess, bump the daily tally and, when `finished`, record the
    /// completion on the user row. All or nothing.
    async fn commit_guess(&self, commit: &GuessCommit) -> StoreResult<()>;

    async fn daily_tally(&self, user_id: UserId, day: NaiveDate) -> StoreResult<Option<DailyTally>>;
}
