//! Fixtures shared by the tests of this crate.

use common::GamePeriod;
use migration::{Migrator, MigratorTrait};
use model::entities::{artist, artist_stats, game_settings, league, player, roster, roster_member};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, Set,
};

/// Routes log output of the crate under test through the test harness, which
/// shows it for failing tests. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_test_writer()
        .try_init();
}

pub async fn setup_db() -> Result<DatabaseConnection, DbErr> {
    init_tracing();

    // Connect to the SQLite database
    let db = Database::connect("sqlite::memory:").await?;

    // Enable foreign keys
    db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

    Migrator::up(&db, None).await.expect("Migrations failed.");
    Ok(db)
}

pub fn period(month: u32, year: i32) -> GamePeriod {
    GamePeriod::new(month, year).expect("valid test period")
}

pub async fn new_player(db: &DatabaseConnection, name: &str) -> player::Model {
    player::ActiveModel {
        name: Set(name.to_string()),
        username: Set(name.to_lowercase()),
        password_hash: Set("unused".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert player")
}

pub async fn new_artist(db: &DatabaseConnection, name: &str) -> artist::Model {
    artist::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert artist")
}

/// Records stats for `artist_id` in `at`. Listener and follower counts are fixed.
pub async fn new_stats(
    db: &DatabaseConnection,
    artist_id: i32,
    at: GamePeriod,
    price: i64,
    popularity: i32,
) -> artist_stats::Model {
    artist_stats::ActiveModel {
        artist_id: Set(artist_id),
        month: Set(at.month as i32),
        year: Set(at.year),
        price: Set(Decimal::from(price)),
        listeners: Set(1_000_000),
        followers: Set(250_000),
        popularity: Set(popularity),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert stats")
}

pub async fn set_clock(db: &DatabaseConnection, at: GamePeriod) {
    game_settings::ActiveModel {
        id: Set(game_settings::SINGLETON_ID),
        current_month: Set(at.month as i32),
        current_year: Set(at.year),
    }
    .insert(db)
    .await
    .expect("insert clock");
}

pub async fn get_roster(db: &DatabaseConnection, roster_id: i32) -> Option<roster::Model> {
    roster::Entity::find_by_id(roster_id).one(db).await.expect("load roster")
}

pub async fn get_league(db: &DatabaseConnection, league_id: i32) -> Option<league::Model> {
    league::Entity::find_by_id(league_id).one(db).await.expect("load league")
}

pub async fn member_count(db: &DatabaseConnection, roster_id: i32) -> u64 {
    roster_member::Entity::find()
        .filter(roster_member::Column::RosterId.eq(roster_id))
        .count(db)
        .await
        .expect("count members")
}

/// Sets a roster's budget directly, bypassing the ledger.
pub async fn set_budget(db: &DatabaseConnection, roster_id: i32, budget: i64) {
    roster::ActiveModel {
        id: Set(roster_id),
        budget: Set(Decimal::from(budget)),
        ..Default::default()
    }
    .update(db)
    .await
    .expect("update budget");
}

pub async fn new_league(db: &DatabaseConnection, name: &str, owner: &player::Model) -> league::Model {
    league::ActiveModel {
        name: Set(name.to_string()),
        player_count: Set(0),
        owner_id: Set(Some(owner.id)),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert league")
}

/// Inserts a roster with a budget of 2000 and no points. Does not touch `player_count`.
pub async fn new_roster(db: &DatabaseConnection, owner: &player::Model, league: &league::Model) -> roster::Model {
    roster::ActiveModel {
        name: Set(format!("{}'s Roster", owner.name)),
        budget: Set(Decimal::from(2000)),
        points: Set(Decimal::ZERO),
        player_id: Set(owner.id),
        league_id: Set(league.id),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert roster")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_setup_db_can_run_repeatedly() {
        // The second call finds the subscriber already installed
        let first = setup_db().await.unwrap();
        let second = setup_db().await.unwrap();

        new_player(&first, "Alice").await;
        assert_eq!(player::Entity::find().count(&first).await.unwrap(), 1);
        assert_eq!(player::Entity::find().count(&second).await.unwrap(), 0);
    }
}
