use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub username: String,
    pub correct_guesses_today: i32,
    pub words_played_today: i32,
    pub last_play_date: Option<Date>,
    pub current_puzzle_id: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::words::Entity",
        from = "Column::CurrentPuzzleId",
        to = "super::words::Column::Id",
        on_delete = "SetNull"
    )]
    CurrentPuzzle,
    #[sea_orm(has_many = "super::guess_records::Entity")]
    GuessRecords,
    #[sea_orm(has_many = "super::daily_tallies::Entity")]
    DailyTallies,
}

impl Related<super::guess_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GuessRecords.def()
    }
}

impl Related<super::daily_tallies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyTallies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
