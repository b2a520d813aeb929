use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create players table
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(pk_auto(Players::Id))
                    .col(string(Players::Name))
                    .col(string(Players::Username).unique_key())
                    .col(string(Players::PasswordHash))
                    .to_owned(),
            )
            .await?;

        // Create leagues table
        manager
            .create_table(
                Table::create()
                    .table(Leagues::Table)
                    .if_not_exists()
                    .col(pk_auto(Leagues::Id))
                    .col(string(Leagues::Name))
                    .col(integer(Leagues::PlayerCount).default(0))
                    .col(integer_null(Leagues::OwnerId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_league_owner")
                            .from(Leagues::Table, Leagues::OwnerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create rosters table
        manager
            .create_table(
                Table::create()
                    .table(Rosters::Table)
                    .if_not_exists()
                    .col(pk_auto(Rosters::Id))
                    .col(string(Rosters::Name))
                    .col(decimal(Rosters::Budget).decimal_len(16, 4))
                    .col(decimal(Rosters::Points).decimal_len(16, 4))
                    .col(integer(Rosters::PlayerId))
                    .col(integer(Rosters::LeagueId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roster_player")
                            .from(Rosters::Table, Rosters::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roster_league")
                            .from(Rosters::Table, Rosters::LeagueId)
                            .to(Leagues::Table, Leagues::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One roster per player per league
        manager
            .create_index(
                Index::create()
                    .name("idx_rosters_player_league")
                    .table(Rosters::Table)
                    .col(Rosters::PlayerId)
                    .col(Rosters::LeagueId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(Rosters::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Leagues::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Players {
    Table,
    Id,
    Name,
    Username,
    PasswordHash,
}

#[derive(DeriveIden)]
enum Leagues {
    Table,
    Id,
    Name,
    PlayerCount,
    OwnerId,
}

#[derive(DeriveIden)]
enum Rosters {
    Table,
    Id,
    Name,
    Budget,
    Points,
    PlayerId,
    LeagueId,
}
