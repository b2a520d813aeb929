use sea_orm::entity::prelude::*;

/// Primary key of the only game settings row.
pub const SINGLETON_ID: i32 = 1;

/// The simulated game clock. A single row with id [`SINGLETON_ID`].
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "game_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub current_month: i32,
    pub current_year: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
