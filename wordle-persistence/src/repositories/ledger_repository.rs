use anyhow::Result;
use chrono::NaiveDate;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::entities::{daily_tallies, guess_records, prelude::*};
use wordle_core::{GuessRecord, Word};
use wordle_types::{DailyTally, WordId};

/// Guess records and the per-day tallies derived from them
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_record(model: guess_records::Model) -> Result<GuessRecord> {
        let raw: Vec<String> = serde_json::from_value(model.guesses)?;
        let guesses = raw
            .iter()
            .map(|guess| Word::parse(guess))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GuessRecord {
            id: model.id,
            user_id: model.user_id,
            word_id: model.word_id,
            day: model.day,
            guesses,
            solved: model.solved,
        })
    }

    fn model_to_tally(model: daily_tallies::Model) -> DailyTally {
        DailyTally {
            user_id: model.user_id,
            day: model.day,
            words_tried: model.words_tried.max(0) as u32,
            words_solved: model.words_solved.max(0) as u32,
        }
    }

    pub async fn find_record(
        &self,
        user_id: Uuid,
        word_id: WordId,
        day: NaiveDate,
    ) -> Result<Option<GuessRecord>> {
        Self::find_record_in(&self.db, user_id, word_id, day).await
    }

    pub async fn find_record_in<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        word_id: WordId,
        day: NaiveDate,
    ) -> Result<Option<GuessRecord>> {
        GuessRecords::find()
            .filter(guess_records::Column::UserId.eq(user_id))
            .filter(guess_records::Column::WordId.eq(word_id))
            .filter(guess_records::Column::Day.eq(day))
            .one(conn)
            .await?
            .map(Self::model_to_record)
            .transpose()
    }

    pub async fn ensure_record(
        &self,
        user_id: Uuid,
        word_id: WordId,
        day: NaiveDate,
    ) -> Result<GuessRecord> {
        Self::ensure_record_in(&self.db, user_id, word_id, day).await
    }

    /// Get-or-create against the (user, word, day) unique index
    pub async fn ensure_record_in<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        word_id: WordId,
        day: NaiveDate,
    ) -> Result<GuessRecord> {
        let record_model = guess_records::ActiveModel {
            user_id: sea_orm::ActiveValue::Set(user_id),
            word_id: sea_orm::ActiveValue::Set(word_id),
            day: sea_orm::ActiveValue::Set(day),
            guesses: sea_orm::ActiveValue::Set(serde_json::json!([])),
            attempts: sea_orm::ActiveValue::Set(0),
            solved: sea_orm::ActiveValue::Set(false),
            created_at: sea_orm::ActiveValue::Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        GuessRecords::insert(record_model)
            .on_conflict(
                OnConflict::columns([
                    guess_records::Column::UserId,
                    guess_records::Column::WordId,
                    guess_records::Column::Day,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;

        Self::find_record_in(conn, user_id, word_id, day)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve guess record"))
    }

    /// Word ids with a record for this user on this day, finished or not
    pub async fn attempted_word_ids(&self, user_id: Uuid, day: NaiveDate) -> Result<Vec<WordId>> {
        let ids = GuessRecords::find()
            .select_only()
            .column(guess_records::Column::WordId)
            .filter(guess_records::Column::UserId.eq(user_id))
            .filter(guess_records::Column::Day.eq(day))
            .into_tuple::<WordId>()
            .all(&self.db)
            .await?;

        Ok(ids)
    }

    /// Store `record` (post-append) only while the row still holds
    /// `expected_attempts` guesses. Returns whether it applied.
    pub async fn append_guess_in<C: ConnectionTrait>(
        conn: &C,
        record: &GuessRecord,
        expected_attempts: usize,
    ) -> Result<bool> {
        let guesses = serde_json::to_value(record.guess_strings())?;

        let result = GuessRecords::update_many()
            .col_expr(guess_records::Column::Guesses, Expr::value(guesses))
            .col_expr(
                guess_records::Column::Attempts,
                Expr::value(record.attempts() as i32),
            )
            .col_expr(guess_records::Column::Solved, Expr::value(record.solved))
            .filter(guess_records::Column::Id.eq(record.id))
            .filter(guess_records::Column::Attempts.eq(expected_attempts as i32))
            .exec(conn)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Count one guess against the (user, day) tally, creating it on first use
    pub async fn bump_tally_in<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        day: NaiveDate,
        solved: bool,
    ) -> Result<()> {
        let tally_model = daily_tallies::ActiveModel {
            user_id: sea_orm::ActiveValue::Set(user_id),
            day: sea_orm::ActiveValue::Set(day),
            words_tried: sea_orm::ActiveValue::Set(0),
            words_solved: sea_orm::ActiveValue::Set(0),
            ..Default::default()
        };

        DailyTallies::insert(tally_model)
            .on_conflict(
                OnConflict::columns([daily_tallies::Column::UserId, daily_tallies::Column::Day])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;

        DailyTallies::update_many()
            .col_expr(
                daily_tallies::Column::WordsTried,
                Expr::col(daily_tallies::Column::WordsTried).add(1),
            )
            .col_expr(
                daily_tallies::Column::WordsSolved,
                Expr::col(daily_tallies::Column::WordsSolved).add(i32::from(solved)),
            )
            .filter(daily_tallies::Column::UserId.eq(user_id))
            .filter(daily_tallies::Column::Day.eq(day))
            .exec(conn)
            .await?;

        Ok(())
    }

    pub async fn daily_tally(&self, user_id: Uuid, day: NaiveDate) -> Result<Option<DailyTally>> {
        let tally_model = DailyTallies::find()
            .filter(daily_tallies::Column::UserId.eq(user_id))
            .filter(daily_tallies::Column::Day.eq(day))
            .one(&self.db)
            .await?;

        Ok(tally_model.map(Self::model_to_tally))
    }

    /// Every record of a user, newest day first
    pub async fn history(&self, user_id: Uuid) -> Result<Vec<GuessRecord>> {
        GuessRecords::find()
            .filter(guess_records::Column::UserId.eq(user_id))
            .order_by_desc(guess_records::Column::Day)
            .order_by_asc(guess_records::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Self::model_to_record)
            .collect()
    }
}
