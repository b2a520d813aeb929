use sea_orm::entity::prelude::*;

use super::{player, roster};

/// A competitive group of players, each with at most one roster.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "leagues")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Number of distinct players holding a roster in this league.
    /// Recomputed from the rosters table whenever membership changes.
    #[sea_orm(default_value = "0")]
    pub player_count: i32,
    /// The owning player. Null once the owner deleted their account.
    pub owner_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "player::Entity",
        from = "Column::OwnerId",
        to = "player::Column::Id",
        on_delete = "SetNull"
    )]
    Owner,
    #[sea_orm(has_many = "roster::Entity")]
    Roster,
}

impl Related<player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<roster::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Roster.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
