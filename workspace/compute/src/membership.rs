//! League membership manager.
//!
//! A player takes part in a league by holding exactly one roster in it. The
//! `player_count` column of a league is recomputed from the rosters table in the
//! same transaction as every membership change, so it always equals the number
//! of distinct players with a roster in the league.

use model::entities::{league, player, roster, roster_member};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

use crate::error::{LeagueError, Result};
use crate::transaction::commit_or_rollback;
use crate::GameRules;

/// What happened to the league when a player left it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// The player left, ownership did not change.
    Left,
    /// The owner left and the player holding the earliest remaining roster took over.
    OwnershipTransferred { new_owner_id: i32 },
    /// The last player left and the league was deleted.
    LeagueDeleted,
}

/// Creates a league owned by `owner_id` together with the owner's roster.
#[instrument(skip(db, rules))]
pub async fn create_league(
    db: &DatabaseConnection,
    rules: &GameRules,
    name: &str,
    owner_id: i32,
) -> Result<league::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LeagueError::invalid("League name must not be empty"));
    }

    let txn = db.begin().await?;
    let result = create_league_in(&txn, rules, name, owner_id).await;
    commit_or_rollback(txn, result).await
}

async fn create_league_in(
    txn: &DatabaseTransaction,
    rules: &GameRules,
    name: &str,
    owner_id: i32,
) -> Result<league::Model> {
    let owner = find_player(txn, owner_id).await?;

    let league = league::ActiveModel {
        name: Set(name.to_string()),
        player_count: Set(0),
        owner_id: Set(Some(owner.id)),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    insert_roster(txn, rules.starting_budget, &owner, league.id).await?;
    let player_count = refresh_player_count(txn, league.id).await?;

    info!("Player {} created league {} '{}'", owner.id, league.id, league.name);
    Ok(league::Model {
        player_count,
        ..league
    })
}

/// Gives `player_id` a fresh roster in `league_id`.
///
/// # Errors
///
/// * [`LeagueError::NotFound`] when the league or the player does not exist
/// * [`LeagueError::Conflict`] when the player already has a roster in the league
#[instrument(skip(db, rules))]
pub async fn join_league(
    db: &DatabaseConnection,
    rules: &GameRules,
    league_id: i32,
    player_id: i32,
) -> Result<roster::Model> {
    let txn = db.begin().await?;
    let result = join_league_in(&txn, rules, league_id, player_id).await;
    commit_or_rollback(txn, result).await
}

async fn join_league_in(
    txn: &DatabaseTransaction,
    rules: &GameRules,
    league_id: i32,
    player_id: i32,
) -> Result<roster::Model> {
    let league = lock_league(txn, league_id).await?;
    let player = find_player(txn, player_id).await?;

    if find_roster(txn, league.id, player.id).await?.is_some() {
        warn!("Player {} already has a roster in league {}", player_id, league_id);
        return Err(LeagueError::conflict(format!(
            "Player {} already has a roster in league {}",
            player_id, league_id
        )));
    }

    let roster = insert_roster(txn, rules.starting_budget, &player, league.id).await?;
    let player_count = refresh_player_count(txn, league.id).await?;

    info!(
        "Player {} joined league {} with roster {} ({} players)",
        player_id, league_id, roster.id, player_count
    );
    Ok(roster)
}

/// Removes `player_id`'s roster from `league_id`.
///
/// When the owner leaves, ownership passes to the player holding the earliest
/// remaining roster. When nobody is left, the league is deleted.
#[instrument(skip(db))]
pub async fn leave_league(
    db: &DatabaseConnection,
    league_id: i32,
    player_id: i32,
) -> Result<LeaveOutcome> {
    let txn = db.begin().await?;
    let result = leave_league_in(&txn, league_id, player_id).await;
    commit_or_rollback(txn, result).await
}

async fn leave_league_in(
    txn: &DatabaseTransaction,
    league_id: i32,
    player_id: i32,
) -> Result<LeaveOutcome> {
    let league = lock_league(txn, league_id).await?;
    let roster = find_roster(txn, league_id, player_id).await?.ok_or_else(|| {
        LeagueError::not_found(format!(
            "Player {} has no roster in league {}",
            player_id, league_id
        ))
    })?;

    delete_roster_rows(txn, roster).await?;

    let player_count = refresh_player_count(txn, league_id).await?;
    if player_count == 0 {
        league.delete(txn).await?;
        info!("League {} deleted after its last player left", league_id);
        return Ok(LeaveOutcome::LeagueDeleted);
    }

    if league.owner_id != Some(player_id) {
        info!("Player {} left league {}", player_id, league_id);
        return Ok(LeaveOutcome::Left);
    }

    let successor = roster::Entity::find()
        .filter(roster::Column::LeagueId.eq(league_id))
        .order_by_asc(roster::Column::Id)
        .one(txn)
        .await?
        .ok_or_else(|| LeagueError::not_found(format!("League {} has no rosters", league_id)))?;

    let mut active: league::ActiveModel = league.into();
    active.owner_id = Set(Some(successor.player_id));
    active.update(txn).await?;

    info!(
        "Owner {} left league {}, ownership passed to player {}",
        player_id, league_id, successor.player_id
    );
    Ok(LeaveOutcome::OwnershipTransferred {
        new_owner_id: successor.player_id,
    })
}

/// Deletes a roster. Same as its player leaving the roster's league.
#[instrument(skip(db))]
pub async fn delete_roster(db: &DatabaseConnection, roster_id: i32) -> Result<LeaveOutcome> {
    let txn = db.begin().await?;
    let result = async {
        let roster = roster::Entity::find_by_id(roster_id)
            .one(&txn)
            .await?
            .ok_or_else(|| LeagueError::not_found(format!("Roster {} not found", roster_id)))?;
        leave_league_in(&txn, roster.league_id, roster.player_id).await
    }
    .await;
    commit_or_rollback(txn, result).await
}

/// Deletes a player with all of their rosters.
///
/// Leagues the player owned keep going without an owner. Leagues left without
/// any roster are deleted.
#[instrument(skip(db))]
pub async fn delete_player(db: &DatabaseConnection, player_id: i32) -> Result<()> {
    let txn = db.begin().await?;
    let result = delete_player_in(&txn, player_id).await;
    commit_or_rollback(txn, result).await
}

async fn delete_player_in(txn: &DatabaseTransaction, player_id: i32) -> Result<()> {
    let player = find_player(txn, player_id).await?;

    let rosters = roster::Entity::find()
        .filter(roster::Column::PlayerId.eq(player_id))
        .all(txn)
        .await?;
    let roster_ids: Vec<i32> = rosters.iter().map(|r| r.id).collect();
    let league_ids: BTreeSet<i32> = rosters.iter().map(|r| r.league_id).collect();
    debug!("Player {} holds rosters {:?}", player_id, roster_ids);

    roster_member::Entity::delete_many()
        .filter(roster_member::Column::RosterId.is_in(roster_ids))
        .exec(txn)
        .await?;
    roster::Entity::delete_many()
        .filter(roster::Column::PlayerId.eq(player_id))
        .exec(txn)
        .await?;
    league::Entity::update_many()
        .col_expr(league::Column::OwnerId, Expr::value(Option::<i32>::None))
        .filter(league::Column::OwnerId.eq(player_id))
        .exec(txn)
        .await?;

    for league_id in league_ids {
        if refresh_player_count(txn, league_id).await? == 0 {
            league::Entity::delete_by_id(league_id).exec(txn).await?;
            info!("League {} deleted, no players left", league_id);
        }
    }

    player.delete(txn).await?;
    info!("Player {} deleted", player_id);
    Ok(())
}

/// Recounts the distinct players holding a roster in `league_id` and stores the result.
pub(crate) async fn refresh_player_count(txn: &DatabaseTransaction, league_id: i32) -> Result<i32> {
    let count = roster::Entity::find()
        .select_only()
        .column(roster::Column::PlayerId)
        .distinct()
        .filter(roster::Column::LeagueId.eq(league_id))
        .count(txn)
        .await?;
    let count = i32::try_from(count)
        .map_err(|_| LeagueError::invalid(format!("League {} has too many players", league_id)))?;

    league::Entity::update_many()
        .col_expr(league::Column::PlayerCount, Expr::value(count))
        .filter(league::Column::Id.eq(league_id))
        .exec(txn)
        .await?;
    debug!("League {} now has {} players", league_id, count);
    Ok(count)
}

async fn insert_roster(
    txn: &DatabaseTransaction,
    starting_budget: Decimal,
    player: &player::Model,
    league_id: i32,
) -> Result<roster::Model> {
    Ok(roster::ActiveModel {
        name: Set(format!("{}'s Roster", player.name)),
        budget: Set(starting_budget),
        points: Set(Decimal::ZERO),
        player_id: Set(player.id),
        league_id: Set(league_id),
        ..Default::default()
    }
    .insert(txn)
    .await?)
}

async fn delete_roster_rows(txn: &DatabaseTransaction, roster: roster::Model) -> Result<()> {
    let removed = roster_member::Entity::delete_many()
        .filter(roster_member::Column::RosterId.eq(roster.id))
        .exec(txn)
        .await?;
    debug!("Deleting roster {} with {} artists", roster.id, removed.rows_affected);
    roster.delete(txn).await?;
    Ok(())
}

async fn find_roster(
    txn: &DatabaseTransaction,
    league_id: i32,
    player_id: i32,
) -> Result<Option<roster::Model>> {
    Ok(roster::Entity::find()
        .filter(roster::Column::LeagueId.eq(league_id))
        .filter(roster::Column::PlayerId.eq(player_id))
        .lock_exclusive()
        .one(txn)
        .await?)
}

async fn find_player(txn: &DatabaseTransaction, player_id: i32) -> Result<player::Model> {
    player::Entity::find_by_id(player_id)
        .one(txn)
        .await?
        .ok_or_else(|| LeagueError::not_found(format!("Player {} not found", player_id)))
}

async fn lock_league(txn: &DatabaseTransaction, league_id: i32) -> Result<league::Model> {
    league::Entity::find_by_id(league_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or_else(|| LeagueError::not_found(format!("League {} not found", league_id)))
}
