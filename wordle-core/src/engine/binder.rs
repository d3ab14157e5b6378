use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use wordle_types::{GameEntry, GameError, GameStatus, UserId, WordId};

use super::{MAX_CONFLICT_RETRIES, PuzzleEngine};
use crate::events::PuzzleEvent;
use crate::progress::DailyProgress;
use crate::record::PoolWord;
use crate::selector::PuzzleSelector;
use crate::session::{SessionCache, SessionStore};

/// Where a user stands after resolution
#[derive(Debug, Clone, PartialEq)]
pub enum BindingState {
    /// Nothing left to hand out today
    PoolExhausted,
    PuzzleActive(PoolWord),
    LimitReached,
}

impl PuzzleEngine {
    /// Entry operation: make sure the user has a puzzle for today, or report
    /// why not.
    pub async fn enter_game(
        &self,
        user_id: UserId,
        session: &dyn SessionStore,
        today: NaiveDate,
    ) -> Result<GameEntry, GameError> {
        let (state, progress) = self.resolve_active_puzzle(user_id, session, today).await?;

        let status = match state {
            BindingState::PuzzleActive(_) => GameStatus::Active,
            BindingState::LimitReached => GameStatus::DailyLimitReached,
            BindingState::PoolExhausted => GameStatus::PoolExhausted,
        };

        Ok(GameEntry {
            status,
            max_attempts: self.config.max_attempts as u32,
            daily_limit: self.config.daily_limit,
            words_played_today: progress.words_played_today,
        })
    }

    /// Resolve what is active for this user right now. Idempotent: repeated
    /// calls without a guess in between return the same puzzle and never
    /// create a second record.
    pub async fn resolve_active_puzzle(
        &self,
        user_id: UserId,
        session: &dyn SessionStore,
        today: NaiveDate,
    ) -> Result<(BindingState, DailyProgress), GameError> {
        let mut retries = 0;
        loop {
            match self.try_resolve(user_id, session, today).await {
                Err(GameError::ConcurrentUpdateConflict) if retries < MAX_CONFLICT_RETRIES => {
                    retries += 1;
                    warn!(
                        "Puzzle binding for user {} raced another request, retrying ({}/{})",
                        user_id, retries, MAX_CONFLICT_RETRIES
                    );
                }
                result => return result,
            }
        }
    }

    async fn try_resolve(
        &self,
        user_id: UserId,
        session: &dyn SessionStore,
        today: NaiveDate,
    ) -> Result<(BindingState, DailyProgress), GameError> {
        let (progress, today) = self.current_progress(user_id, today).await?;
        let cache = SessionCache::new(session);

        if progress.is_limit_reached(self.config.daily_limit) {
            cache.mark_limit_reached(today);
            info!(
                "User {} reached the daily limit of {} words",
                user_id, self.config.daily_limit
            );
            self.events
                .publish(PuzzleEvent::DailyLimitReached { user_id, day: today });
            return Ok((BindingState::LimitReached, progress));
        }

        // The durable binding wins over whatever the session remembers
        if let Some(word_id) = progress.current_puzzle {
            let was_cached = cache.cached_secret(word_id, today).is_some();
            let secret = self.secret_for(word_id, &cache, today).await?;
            self.store.ensure_record(user_id, word_id, today).await?;

            if was_cached {
                debug!("User {} already bound to word {}", user_id, word_id);
            } else {
                info!("Re-bound session of user {} to word {}", user_id, word_id);
                self.events.publish(PuzzleEvent::PuzzleRebound {
                    user_id,
                    word_id,
                    day: today,
                });
            }

            let active = PoolWord {
                id: word_id,
                word: secret,
            };
            return Ok((BindingState::PuzzleActive(active), progress));
        }

        let attempted: HashSet<WordId> = self
            .store
            .attempted_word_ids(user_id, today)
            .await?
            .into_iter()
            .collect();
        let exclude: Vec<WordId> = attempted.iter().copied().collect();
        let candidates = self.store.candidate_words(&exclude).await?;

        let chosen = PuzzleSelector::select(&candidates, &attempted, &mut rand::thread_rng());
        let Some(chosen) = chosen else {
            cache.clear();
            info!(
                "No unplayed words left for user {} on {} ({} attempted)",
                user_id,
                today,
                attempted.len()
            );
            self.events
                .publish(PuzzleEvent::PoolExhausted { user_id, day: today });
            return Ok((BindingState::PoolExhausted, progress));
        };

        self.store.bind_puzzle(user_id, chosen.id, today).await?;
        cache.bind_puzzle(chosen.id, &chosen.word, today);

        info!("Assigned word {} to user {} for {}", chosen.id, user_id, today);
        self.events.publish(PuzzleEvent::PuzzleAssigned {
            user_id,
            word_id: chosen.id,
            day: today,
        });

        let progress = progress.bind(chosen.id);
        Ok((BindingState::PuzzleActive(chosen), progress))
    }
}
