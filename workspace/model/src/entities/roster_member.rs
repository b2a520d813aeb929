use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{artist, roster};

/// Join table between rosters and artists. The composite key rules out duplicates.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "roster_members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub roster_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub artist_id: i32,
    /// Price charged to the roster budget when the artist was added.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub purchase_price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "roster::Entity",
        from = "Column::RosterId",
        to = "roster::Column::Id",
        on_delete = "Cascade"
    )]
    Roster,
    #[sea_orm(
        belongs_to = "artist::Entity",
        from = "Column::ArtistId",
        to = "artist::Column::Id",
        on_delete = "Cascade"
    )]
    Artist,
}

impl Related<roster::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Roster.def()
    }
}

impl Related<artist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Artist.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
