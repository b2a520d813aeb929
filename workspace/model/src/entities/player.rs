use sea_orm::entity::prelude::*;

/// A person playing the game. A player holds at most one roster per league.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "players")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Display name, used to name new rosters.
    pub name: String,
    #[sea_orm(unique)]
    pub username: String,
    /// Argon2 hash in PHC string format (salt embedded).
    pub password_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::roster::Entity")]
    Roster,
    /// Leagues this player owns.
    #[sea_orm(has_many = "super::league::Entity")]
    League,
}

impl Related<super::roster::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Roster.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
