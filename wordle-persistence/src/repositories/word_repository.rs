use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use tracing::debug;

use crate::entities::{prelude::*, words};
use wordle_core::{PoolWord, Word, WordList};
use wordle_types::WordId;

const SEED_CHUNK: usize = 500;

pub struct WordRepository {
    db: DatabaseConnection,
}

impl WordRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_pool_word(model: words::Model) -> Result<PoolWord> {
        Ok(PoolWord {
            id: model.id,
            word: Word::parse(&model.word)?,
        })
    }

    /// Insert every word not already in the pool. Returns how many were new.
    pub async fn seed(&self, list: &WordList) -> Result<u64> {
        let mut inserted = 0;

        for chunk in list.words().chunks(SEED_CHUNK) {
            let models = chunk.iter().map(|word| words::ActiveModel {
                word: sea_orm::ActiveValue::Set(word.as_str().to_string()),
                ..Default::default()
            });

            inserted += Words::insert_many(models)
                .on_conflict(
                    OnConflict::column(words::Column::Word)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await?;
        }

        debug!("Seeded {} new words out of {}", inserted, list.len());
        Ok(inserted)
    }

    pub async fn find_by_id(&self, id: WordId) -> Result<Option<PoolWord>> {
        Words::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Self::model_to_pool_word)
            .transpose()
    }

    pub async fn candidates_excluding(&self, exclude: &[WordId]) -> Result<Vec<PoolWord>> {
        let mut query = Words::find();
        if !exclude.is_empty() {
            query = query.filter(words::Column::Id.is_not_in(exclude.iter().copied()));
        }

        query
            .order_by_asc(words::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Self::model_to_pool_word)
            .collect()
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Words::find().count(&self.db).await?)
    }
}
