use anyhow::Result;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::{prelude::*, users};
use wordle_core::DailyProgress;
use wordle_types::{User, WordId};

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_user(model: users::Model) -> User {
        User {
            id: model.id,
            username: model.username,
            created_at: model.created_at.to_rfc3339(),
        }
    }

    fn model_to_progress(model: users::Model) -> DailyProgress {
        DailyProgress {
            user_id: model.id,
            last_play_date: model.last_play_date,
            correct_guesses_today: model.correct_guesses_today.max(0) as u32,
            words_played_today: model.words_played_today.max(0) as u32,
            current_puzzle: model.current_puzzle_id,
        }
    }

    /// Get-or-create. An existing row keeps its username and counters.
    pub async fn ensure_user(&self, id: Uuid, username: &str) -> Result<User> {
        let now = chrono::Utc::now().into();

        let user_model = users::ActiveModel {
            id: sea_orm::ActiveValue::Set(id),
            username: sea_orm::ActiveValue::Set(username.to_string()),
            correct_guesses_today: sea_orm::ActiveValue::Set(0),
            words_played_today: sea_orm::ActiveValue::Set(0),
            last_play_date: sea_orm::ActiveValue::Set(None),
            current_puzzle_id: sea_orm::ActiveValue::Set(None),
            created_at: sea_orm::ActiveValue::Set(now),
            updated_at: sea_orm::ActiveValue::Set(now),
        };

        Users::insert(user_model)
            .on_conflict(OnConflict::column(users::Column::Id).do_nothing().to_owned())
            .exec_without_returning(&self.db)
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve user {}", id))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user_model = Users::find_by_id(id).one(&self.db).await?;
        Ok(user_model.map(Self::model_to_user))
    }

    pub async fn load_progress(&self, id: Uuid) -> Result<Option<DailyProgress>> {
        let user_model = Users::find_by_id(id).one(&self.db).await?;
        Ok(user_model.map(Self::model_to_progress))
    }

    /// Write a reconciled progress row when it moves the user to a later day.
    /// Returns whether the row changed.
    pub async fn roll_over(&self, progress: &DailyProgress) -> Result<bool> {
        let mut not_yet_applied = Condition::any().add(users::Column::LastPlayDate.is_null());
        if let Some(day) = progress.last_play_date {
            not_yet_applied = not_yet_applied.add(users::Column::LastPlayDate.lt(day));
        }

        let result = Users::update_many()
            .col_expr(
                users::Column::LastPlayDate,
                Expr::value(progress.last_play_date),
            )
            .col_expr(
                users::Column::CorrectGuessesToday,
                Expr::value(progress.correct_guesses_today as i32),
            )
            .col_expr(
                users::Column::WordsPlayedToday,
                Expr::value(progress.words_played_today as i32),
            )
            .col_expr(
                users::Column::CurrentPuzzleId,
                Expr::value(progress.current_puzzle),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(now()))
            .filter(users::Column::Id.eq(progress.user_id))
            .filter(not_yet_applied)
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Bind `word_id` only while no puzzle is bound. Returns whether it won.
    pub async fn bind_puzzle_in<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        word_id: WordId,
    ) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(users::Column::CurrentPuzzleId, Expr::value(Some(word_id)))
            .col_expr(users::Column::UpdatedAt, Expr::value(now()))
            .filter(users::Column::Id.eq(user_id))
            .filter(users::Column::CurrentPuzzleId.is_null())
            .exec(conn)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Count a finished puzzle and unbind it, only while `word_id` is still
    /// the bound puzzle. Returns whether it applied.
    pub async fn record_completion_in<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        word_id: WordId,
        solved: bool,
    ) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(
                users::Column::WordsPlayedToday,
                Expr::col(users::Column::WordsPlayedToday).add(1),
            )
            .col_expr(
                users::Column::CorrectGuessesToday,
                Expr::col(users::Column::CorrectGuessesToday).add(i32::from(solved)),
            )
            .col_expr(users::Column::CurrentPuzzleId, Expr::value(Option::<i32>::None))
            .col_expr(users::Column::UpdatedAt, Expr::value(now()))
            .filter(users::Column::Id.eq(user_id))
            .filter(users::Column::CurrentPuzzleId.eq(word_id))
            .exec(conn)
            .await?;

        Ok(result.rows_affected == 1)
    }
}

fn now() -> sea_orm::prelude::DateTimeWithTimeZone {
    chrono::Utc::now().into()
}
