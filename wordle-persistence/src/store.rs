use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};
use tracing::debug;
use uuid::Uuid;

use crate::repositories::{LedgerRepository, UserRepository, WordRepository};
use wordle_core::{
    DailyProgress, GameStore, GuessCommit, GuessRecord, PoolWord, StoreError, StoreResult,
};
use wordle_types::{DailyTally, WordId};

/// `GameStore` over sea-orm. Multi-row changes run in one transaction and
/// every shared counter moves through a guarded single-statement update.
pub struct SeaOrmGameStore {
    db: DatabaseConnection,
    users: UserRepository,
    words: WordRepository,
    ledger: LedgerRepository,
}

impl SeaOrmGameStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            words: WordRepository::new(db.clone()),
            ledger: LedgerRepository::new(db.clone()),
            db,
        }
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    pub fn words(&self) -> &WordRepository {
        &self.words
    }

    pub fn ledger(&self) -> &LedgerRepository {
        &self.ledger
    }
}

fn backend(err: DbErr) -> StoreError {
    StoreError::Backend(err.into())
}

#[async_trait]
impl GameStore for SeaOrmGameStore {
    async fn load_progress(&self, user_id: Uuid) -> StoreResult<Option<DailyProgress>> {
        Ok(self.users.load_progress(user_id).await?)
    }

    async fn roll_over(&self, progress: &DailyProgress) -> StoreResult<()> {
        if !self.users.roll_over(progress).await? {
            debug!("Rollover for user {} already applied", progress.user_id);
        }
        Ok(())
    }

    async fn find_word(&self, word_id: WordId) -> StoreResult<Option<PoolWord>> {
        Ok(self.words.find_by_id(word_id).await?)
    }

    async fn attempted_word_ids(&self, user_id: Uuid, day: NaiveDate) -> StoreResult<Vec<WordId>> {
        Ok(self.ledger.attempted_word_ids(user_id, day).await?)
    }

    async fn candidate_words(&self, exclude: &[WordId]) -> StoreResult<Vec<PoolWord>> {
        Ok(self.words.candidates_excluding(exclude).await?)
    }

    async fn bind_puzzle(
        &self,
        user_id: Uuid,
        word_id: WordId,
        day: NaiveDate,
    ) -> StoreResult<GuessRecord> {
        let txn = self.db.begin().await.map_err(backend)?;

        if !UserRepository::bind_puzzle_in(&txn, user_id, word_id).await? {
            txn.rollback().await.map_err(backend)?;
            return Err(StoreError::Conflict);
        }

        let record = LedgerRepository::ensure_record_in(&txn, user_id, word_id, day).await?;
        txn.commit().await.map_err(backend)?;

        Ok(record)
    }

    async fn ensure_record(
        &self,
        user_id: Uuid,
        word_id: WordId,
        day: NaiveDate,
    ) -> StoreResult<GuessRecord> {
        Ok(self.ledger.ensure_record(user_id, word_id, day).await?)
    }

    async fn find_record(
        &self,
        user_id: Uuid,
        word_id: WordId,
        day: NaiveDate,
    ) -> StoreResult<Option<GuessRecord>> {
        Ok(self.ledger.find_record(user_id, word_id, day).await?)
    }

    async fn commit_guess(&self, commit: &GuessCommit) -> StoreResult<()> {
        let record = &commit.record;
        let txn = self.db.begin().await.map_err(backend)?;

        if !LedgerRepository::append_guess_in(&txn, record, commit.expected_attempts).await? {
            txn.rollback().await.map_err(backend)?;
            return Err(StoreError::Conflict);
        }

        LedgerRepository::bump_tally_in(&txn, record.user_id, record.day, commit.is_correct)
            .await?;

        if commit.finished
            && !UserRepository::record_completion_in(
                &txn,
                record.user_id,
                record.word_id,
                record.solved,
            )
            .await?
        {
            txn.rollback().await.map_err(backend)?;
            return Err(StoreError::Conflict);
        }

        txn.commit().await.map_err(backend)?;
        Ok(())
    }

    async fn daily_tally(&self, user_id: Uuid, day: NaiveDate) -> StoreResult<Option<DailyTally>> {
        Ok(self.ledger.daily_tally(user_id, day).await?)
    }
}
