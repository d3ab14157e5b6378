use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_words_table::Words;
use super::m20240101_000002_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GuessRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GuessRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GuessRecords::UserId).uuid().not_null())
                    .col(ColumnDef::new(GuessRecords::WordId).integer().not_null())
                    .col(ColumnDef::new(GuessRecords::Day).date().not_null())
                    .col(ColumnDef::new(GuessRecords::Guesses).json().not_null())
                    .col(
                        ColumnDef::new(GuessRecords::Attempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GuessRecords::Solved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GuessRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guess_records_user")
                            .from(GuessRecords::Table, GuessRecords::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guess_records_word")
                            .from(GuessRecords::Table, GuessRecords::WordId)
                            .to(Words::Table, Words::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One record per (user, word, day)
        manager
            .create_index(
                Index::create()
                    .name("idx_guess_records_user_word_day")
                    .table(GuessRecords::Table)
                    .col(GuessRecords::UserId)
                    .col(GuessRecords::WordId)
                    .col(GuessRecords::Day)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Same-day exclusion lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_guess_records_user_day")
                    .table(GuessRecords::Table)
                    .col(GuessRecords::UserId)
                    .col(GuessRecords::Day)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GuessRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GuessRecords {
    Table,
    Id,
    UserId,
    WordId,
    Day,
    Guesses,
    Attempts,
    Solved,
    CreatedAt,
}
