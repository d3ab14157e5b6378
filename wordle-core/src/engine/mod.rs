pub mod binder;
pub mod ledger;
pub mod restore;

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};
use wordle_types::{DailyTally, GameError, UserId, WordId};

use crate::config::GameConfig;
use crate::events::{PuzzleEvent, PuzzleEventBus, PuzzleEventHandler};
use crate::progress::DailyProgress;
use crate::session::SessionCache;
use crate::store::GameStore;
use crate::word::Word;

pub use binder::BindingState;

/// Lost-update races are retried this many times before surfacing
/// `ConcurrentUpdateConflict`
pub const MAX_CONFLICT_RETRIES: usize = 3;

/// Puzzle lifecycle for every user: binding, guessing and restoring
pub struct PuzzleEngine {
    store: Arc<dyn GameStore>,
    config: GameConfig,
    events: PuzzleEventBus,
}

impl PuzzleEngine {
    pub fn new(store: Arc<dyn GameStore>, config: GameConfig) -> Self {
        Self {
            store,
            config,
            events: PuzzleEventBus::new(),
        }
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn PuzzleEventHandler>) -> Self {
        self.events.add_handler(handler);
        self
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// Read-only (user, day) aggregate; zero when nothing was played
    pub async fn daily_tally(&self, user_id: UserId, today: NaiveDate) -> Result<DailyTally, GameError> {
        let tally = self.store.daily_tally(user_id, today).await?;
        Ok(tally.unwrap_or_else(|| DailyTally::empty(user_id, today)))
    }

    /// Load the user's progress and apply the day rollover. Runs once at the
    /// top of every operation, before any counter is read.
    ///
    /// Also returns the day the request is served on. A request dated before
    /// the user's stored day is served on the stored day.
    async fn current_progress(
        &self,
        user_id: UserId,
        today: NaiveDate,
    ) -> Result<(DailyProgress, NaiveDate), GameError> {
        let stored = self
            .store
            .load_progress(user_id)
            .await?
            .ok_or(GameError::UnknownUser { user_id })?;

        if stored.is_current(today) {
            let day = stored.play_day(today);
            if day != today {
                debug!(
                    "Request for user {} dated {} arrived after rollover to {}",
                    user_id, today, day
                );
            }
            return Ok((stored, day));
        }

        let progress = stored.reconcile(today);
        self.store.roll_over(&progress).await?;

        info!("Rolled over daily progress for user {} to {}", user_id, today);
        self.events.publish(PuzzleEvent::DayRolledOver { user_id, day: today });

        Ok((progress, today))
    }

    /// Secret text for the durably bound word. The session copy is used only
    /// when it names the same word for the same day; otherwise it is rebuilt.
    async fn secret_for(
        &self,
        word_id: WordId,
        cache: &SessionCache<'_>,
        today: NaiveDate,
    ) -> Result<Word, GameError> {
        if let Some(secret) = cache.cached_secret(word_id, today) {
            debug!("Session cache hit for word {}", word_id);
            return Ok(secret);
        }

        let pool_word = self
            .store
            .find_word(word_id)
            .await?
            .ok_or(GameError::GameNotInitialized)?;

        cache.bind_puzzle(word_id, &pool_word.word, today);
        Ok(pool_word.word)
    }
}
