//! Player accounts: registration, login and password changes.

use model::entities::player;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{info, instrument, warn};

use crate::error::{LeagueError, Result};
use crate::password::{hash_password, verify_password};
use crate::transaction::commit_or_rollback;

const BAD_CREDENTIALS: &str = "Invalid username or password";

/// Registers a new player. Usernames are unique.
#[instrument(skip(db, password))]
pub async fn register_player(
    db: &DatabaseConnection,
    name: &str,
    username: &str,
    password: &str,
) -> Result<player::Model> {
    let name = name.trim();
    let username = username.trim();
    if name.is_empty() || username.is_empty() {
        return Err(LeagueError::invalid("Name and username are required"));
    }
    if password.is_empty() {
        return Err(LeagueError::invalid("Password must not be empty"));
    }
    let password_hash = hash_password(password)?;

    let txn = db.begin().await?;
    let result = register_player_in(&txn, name, username, password_hash).await;
    commit_or_rollback(txn, result).await
}

async fn register_player_in(
    txn: &DatabaseTransaction,
    name: &str,
    username: &str,
    password_hash: String,
) -> Result<player::Model> {
    if find_by_username(txn, username).await?.is_some() {
        warn!("Username '{}' is already taken", username);
        return Err(LeagueError::conflict(format!(
            "Username '{}' is already taken",
            username
        )));
    }

    let player = player::ActiveModel {
        name: Set(name.to_string()),
        username: Set(username.to_string()),
        password_hash: Set(password_hash),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    info!("Registered player {} as '{}'", player.id, player.username);
    Ok(player)
}

/// Returns the player whose credentials match.
///
/// Unknown usernames and wrong passwords fail with the same [`LeagueError::NotFound`].
#[instrument(skip(db, password))]
pub async fn authenticate(db: &DatabaseConnection, username: &str, password: &str) -> Result<player::Model> {
    let Some(player) = find_by_username(db, username.trim()).await? else {
        warn!("Login attempt for unknown username");
        return Err(LeagueError::not_found(BAD_CREDENTIALS));
    };

    if !verify_password(password, &player.password_hash)? {
        warn!("Wrong password for player {}", player.id);
        return Err(LeagueError::not_found(BAD_CREDENTIALS));
    }

    info!("Player {} logged in", player.id);
    Ok(player)
}

/// Replaces a player's password.
#[instrument(skip(db, new_password))]
pub async fn change_password(db: &DatabaseConnection, player_id: i32, new_password: &str) -> Result<()> {
    if new_password.is_empty() {
        return Err(LeagueError::invalid("Password must not be empty"));
    }

    let player = player::Entity::find_by_id(player_id)
        .one(db)
        .await?
        .ok_or_else(|| LeagueError::not_found(format!("Player {} not found", player_id)))?;

    let mut active: player::ActiveModel = player.into();
    active.password_hash = Set(hash_password(new_password)?);
    active.update(db).await?;

    info!("Player {} changed their password", player_id);
    Ok(())
}

/// All players ordered by name.
pub async fn list_players(db: &DatabaseConnection) -> Result<Vec<player::Model>> {
    Ok(player::Entity::find()
        .order_by_asc(player::Column::Name)
        .order_by_asc(player::Column::Id)
        .all(db)
        .await?)
}

async fn find_by_username<C: sea_orm::ConnectionTrait>(conn: &C, username: &str) -> Result<Option<player::Model>> {
    Ok(player::Entity::find()
        .filter(player::Column::Username.eq(username))
        .one(conn)
        .await?)
}
