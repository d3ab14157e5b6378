use chrono::NaiveDate;
use tracing::{debug, info, warn};
use wordle_types::{GameError, GuessResponse, UserId};

use super::{MAX_CONFLICT_RETRIES, PuzzleEngine};
use crate::events::PuzzleEvent;
use crate::grader::Grader;
use crate::session::{SessionCache, SessionStore};
use crate::store::GuessCommit;
use crate::word::Word;

impl PuzzleEngine {
    /// Grade one guess against the bound puzzle and append it to the ledger.
    ///
    /// Checks run in a fixed order: a puzzle must be bound, the daily limit
    /// must not be reached, and the guess must be a 5-letter word. Any failure
    /// leaves storage untouched.
    pub async fn submit_guess(
        &self,
        user_id: UserId,
        session: &dyn SessionStore,
        guess_text: &str,
        today: NaiveDate,
    ) -> Result<GuessResponse, GameError> {
        let mut retries = 0;
        loop {
            match self.try_submit_guess(user_id, session, guess_text, today).await {
                Err(GameError::ConcurrentUpdateConflict) if retries < MAX_CONFLICT_RETRIES => {
                    retries += 1;
                    warn!(
                        "Guess from user {} raced another request, retrying ({}/{})",
                        user_id, retries, MAX_CONFLICT_RETRIES
                    );
                }
                result => return result,
            }
        }
    }

    async fn try_submit_guess(
        &self,
        user_id: UserId,
        session: &dyn SessionStore,
        guess_text: &str,
        today: NaiveDate,
    ) -> Result<GuessResponse, GameError> {
        let (progress, today) = self.current_progress(user_id, today).await?;
        let cache = SessionCache::new(session);

        if progress.current_puzzle.is_none() && cache.load(today).is_none() {
            return Err(GameError::GameNotInitialized);
        }

        if progress.is_limit_reached(self.config.daily_limit) {
            return Err(GameError::DailyLimitReached {
                limit: self.config.daily_limit,
            });
        }

        let guess = Word::parse(guess_text)
            .map_err(|e| GameError::InvalidGuessFormat { guess: e.input })?;

        let Some(word_id) = progress.current_puzzle else {
            // Session still points at a puzzle that storage already closed
            debug!("Session of user {} outlived its puzzle", user_id);
            cache.clear();
            return Err(GameError::GameNotInitialized);
        };

        let record = self
            .store
            .find_record(user_id, word_id, today)
            .await?
            .ok_or(GameError::GameNotInitialized)?;

        if record.is_finished(self.config.max_attempts) {
            warn!(
                "User {} still bound to finished word {} ({} guesses)",
                user_id,
                word_id,
                record.attempts()
            );
            return Err(GameError::GameNotInitialized);
        }

        let secret = self.secret_for(word_id, &cache, today).await?;
        let results = Grader::grade(&secret, &guess);
        let is_correct = Grader::is_solved(&results);

        let updated = record.with_guess(guess, is_correct);
        let finished = updated.is_finished(self.config.max_attempts);
        let commit = GuessCommit {
            expected_attempts: record.attempts(),
            record: updated,
            is_correct,
            finished,
        };
        self.store.commit_guess(&commit).await?;

        let attempt = commit.record.attempts() as u32;
        debug!(
            "User {} guess {} on word {}: correct={}",
            user_id, attempt, word_id, is_correct
        );
        self.events.publish(PuzzleEvent::GuessRecorded {
            user_id,
            word_id,
            attempt,
            is_correct,
        });

        if finished {
            cache.clear();
            info!(
                "User {} finished word {} after {} guesses (solved: {})",
                user_id, word_id, attempt, commit.record.solved
            );
            self.events.publish(PuzzleEvent::PuzzleCompleted {
                user_id,
                word_id,
                solved: commit.record.solved,
                attempts: attempt,
            });
        }

        Ok(GuessResponse {
            results,
            is_correct,
            guesses: commit.record.guess_strings(),
            game_over: finished,
            attempts_remaining: commit.record.attempts_remaining(self.config.max_attempts) as u32,
        })
    }
}
