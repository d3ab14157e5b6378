use chrono::NaiveDate;
use tracing::debug;
use wordle_types::{GameError, RestoredState, UserId};

use super::PuzzleEngine;
use crate::grader::Grader;
use crate::session::{SessionBinding, SessionCache, SessionStore};

impl PuzzleEngine {
    /// Rebuild the board for a returning client from the ledger alone.
    /// Every guess is re-graded from scratch against the secret.
    pub async fn restore_state(
        &self,
        user_id: UserId,
        session: &dyn SessionStore,
        today: NaiveDate,
    ) -> Result<RestoredState, GameError> {
        let (progress, today) = self.current_progress(user_id, today).await?;
        let cache = SessionCache::new(session);

        if let Some(SessionBinding::LimitReached { .. }) = cache.load(today) {
            return Ok(RestoredState::DailyLimitReached);
        }

        if progress.is_limit_reached(self.config.daily_limit) {
            cache.mark_limit_reached(today);
            return Ok(RestoredState::DailyLimitReached);
        }

        let word_id = progress
            .current_puzzle
            .ok_or(GameError::GameNotInitialized)?;
        let record = self
            .store
            .find_record(user_id, word_id, today)
            .await?
            .ok_or(GameError::GameNotInitialized)?;

        let secret = self.secret_for(word_id, &cache, today).await?;
        let results_history = Grader::replay(&secret, &record.guesses);

        debug!(
            "Restored {} guesses on word {} for user {}",
            record.attempts(),
            word_id,
            user_id
        );

        Ok(RestoredState::Active {
            guesses: record.guess_strings(),
            results_history,
            is_solved: record.solved,
            current_row: record.attempts() as u32,
        })
    }
}
