use sea_orm::entity::prelude::*;

/// A music artist that can be drafted onto rosters.
/// Prices and popularity live in [`super::artist_stats`], one row per game month.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "artists")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::artist_stats::Entity")]
    ArtistStats,
    #[sea_orm(has_many = "super::roster_member::Entity")]
    RosterMember,
}

impl Related<super::artist_stats::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArtistStats.def()
    }
}

impl Related<super::roster_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RosterMember.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
