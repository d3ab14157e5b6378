use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "words")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub word: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::guess_records::Entity")]
    GuessRecords,
}

impl Related<super::guess_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GuessRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
