use crate::entity_iden::EntityIden;
use model::entities::prelude::*;
use model::entities::{artist, artist_stats, game_settings, roster, roster_member};
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create artists table
        manager
            .create_table(
                Table::create()
                    .table(Artist::table())
                    .if_not_exists()
                    .col(pk_auto(Artist::column(artist::Column::Id)))
                    .col(string(Artist::column(artist::Column::Name)))
                    .to_owned(),
            )
            .await?;

        // Create artist_stats table, one row per artist and game month
        manager
            .create_table(
                Table::create()
                    .table(ArtistStats::table())
                    .if_not_exists()
                    .col(pk_auto(ArtistStats::column(artist_stats::Column::Id)))
                    .col(integer(ArtistStats::column(artist_stats::Column::ArtistId)))
                    .col(integer(ArtistStats::column(artist_stats::Column::Month)))
                    .col(integer(ArtistStats::column(artist_stats::Column::Year)))
                    .col(
                        decimal(ArtistStats::column(artist_stats::Column::Price))
                            .decimal_len(16, 4),
                    )
                    .col(big_integer(ArtistStats::column(artist_stats::Column::Listeners)))
                    .col(big_integer(ArtistStats::column(artist_stats::Column::Followers)))
                    .col(integer(ArtistStats::column(artist_stats::Column::Popularity)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artist_stats_artist")
                            .from(
                                ArtistStats::table(),
                                ArtistStats::column(artist_stats::Column::ArtistId),
                            )
                            .to(Artist::table(), Artist::column(artist::Column::Id))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_artist_stats_artist_period")
                    .table(ArtistStats::table())
                    .col(ArtistStats::column(artist_stats::Column::ArtistId))
                    .col(ArtistStats::column(artist_stats::Column::Year))
                    .col(ArtistStats::column(artist_stats::Column::Month))
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create roster_members table (join table)
        manager
            .create_table(
                Table::create()
                    .table(RosterMember::table())
                    .if_not_exists()
                    .col(integer(RosterMember::column(roster_member::Column::RosterId)))
                    .col(integer(RosterMember::column(roster_member::Column::ArtistId)))
                    .col(
                        decimal(RosterMember::column(roster_member::Column::PurchasePrice))
                            .decimal_len(16, 4),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_roster_members")
                            .col(RosterMember::column(roster_member::Column::RosterId))
                            .col(RosterMember::column(roster_member::Column::ArtistId)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roster_members_roster")
                            .from(
                                RosterMember::table(),
                                RosterMember::column(roster_member::Column::RosterId),
                            )
                            .to(Roster::table(), Roster::column(roster::Column::Id))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roster_members_artist")
                            .from(
                                RosterMember::table(),
                                RosterMember::column(roster_member::Column::ArtistId),
                            )
                            .to(Artist::table(), Artist::column(artist::Column::Id))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create game_settings table. The single row is created lazily by the game clock.
        manager
            .create_table(
                Table::create()
                    .table(GameSettings::table())
                    .if_not_exists()
                    .col(
                        integer(GameSettings::column(game_settings::Column::Id)).primary_key(),
                    )
                    .col(integer(GameSettings::column(game_settings::Column::CurrentMonth)))
                    .col(integer(GameSettings::column(game_settings::Column::CurrentYear)))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameSettings::table()).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(RosterMember::table()).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ArtistStats::table()).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Artist::table()).to_owned())
            .await?;

        Ok(())
    }
}
