use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::artist;

/// Monthly snapshot of an artist's statistics. Unique per (artist, month, year).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "artist_stats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub artist_id: i32,
    pub month: i32,
    pub year: i32,
    /// Cost of adding the artist to a roster during this month.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub price: Decimal,
    pub listeners: i64,
    pub followers: i64,
    /// Popularity score, drives points on advance.
    pub popularity: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "artist::Entity",
        from = "Column::ArtistId",
        to = "artist::Column::Id",
        on_delete = "Cascade"
    )]
    Artist,
}

impl Related<artist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Artist.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
