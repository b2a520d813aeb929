use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{artist, league, player};

/// A player's team of artists within one league.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rosters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Money left to buy artists with.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub budget: Decimal,
    /// Points accumulated by monthly advances.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub points: Decimal,
    pub player_id: i32,
    pub league_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "player::Entity",
        from = "Column::PlayerId",
        to = "player::Column::Id",
        on_delete = "Cascade"
    )]
    Player,
    #[sea_orm(
        belongs_to = "league::Entity",
        from = "Column::LeagueId",
        to = "league::Column::Id",
        on_delete = "Cascade"
    )]
    League,
    #[sea_orm(has_many = "super::roster_member::Entity")]
    RosterMember,
}

impl Related<player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Player.def()
    }
}

impl Related<league::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::League.def()
    }
}

impl Related<super::roster_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RosterMember.def()
    }
}

impl Related<artist::Entity> for Entity {
    fn to() -> RelationDef {
        super::roster_member::Relation::Artist.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::roster_member::Relation::Roster.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
