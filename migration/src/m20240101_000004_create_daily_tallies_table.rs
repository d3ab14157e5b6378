use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DailyTallies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DailyTallies::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DailyTallies::UserId).uuid().not_null())
                    .col(ColumnDef::new(DailyTallies::Day).date().not_null())
                    .col(
                        ColumnDef::new(DailyTallies::WordsTried)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailyTallies::WordsSolved)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_daily_tallies_user")
                            .from(DailyTallies::Table, DailyTallies::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_daily_tallies_user_day")
                    .table(DailyTallies::Table)
                    .col(DailyTallies::UserId)
                    .col(DailyTallies::Day)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DailyTallies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DailyTallies {
    Table,
    Id,
    UserId,
    Day,
    WordsTried,
    WordsSolved,
}
