//! The game clock: a singleton `game_settings` row holding the current period.
//!
//! The row is created lazily with the configured initial period the first time
//! it is read. Only the monthly advance writes to it.

use common::GamePeriod;
use model::entities::game_settings::{self, SINGLETON_ID};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, QuerySelect, Set};
use tracing::{debug, info, instrument};

use crate::error::Result;

/// Reads the current game period, creating the clock row if it does not exist yet.
#[instrument(skip(conn))]
pub async fn current_period<C: ConnectionTrait>(conn: &C, initial: GamePeriod) -> Result<GamePeriod> {
    if let Some(row) = game_settings::Entity::find_by_id(SINGLETON_ID).one(conn).await? {
        return to_period(&row);
    }

    ensure_clock(conn, initial).await?;
    let row = game_settings::Entity::find_by_id(SINGLETON_ID)
        .one(conn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("game settings".to_string()))?;
    to_period(&row)
}

/// Reads the current period with the clock row locked for update.
/// Must run inside the transaction that later calls [`store_period`].
pub(crate) async fn lock_period<C: ConnectionTrait>(conn: &C, initial: GamePeriod) -> Result<GamePeriod> {
    ensure_clock(conn, initial).await?;
    let row = game_settings::Entity::find_by_id(SINGLETON_ID)
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("game settings".to_string()))?;
    to_period(&row)
}

/// Writes `period` into the clock row.
pub(crate) async fn store_period<C: ConnectionTrait>(conn: &C, period: GamePeriod) -> Result<()> {
    game_settings::ActiveModel {
        id: Set(SINGLETON_ID),
        current_month: Set(period.month as i32),
        current_year: Set(period.year),
    }
    .update(conn)
    .await?;
    info!("Game clock set to {}", period);
    Ok(())
}

/// Inserts the clock row unless another request already did.
async fn ensure_clock<C: ConnectionTrait>(conn: &C, initial: GamePeriod) -> Result<()> {
    let row = game_settings::ActiveModel {
        id: Set(SINGLETON_ID),
        current_month: Set(initial.month as i32),
        current_year: Set(initial.year),
    };
    let inserted = game_settings::Entity::insert(row)
        .on_conflict(
            OnConflict::column(game_settings::Column::Id)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    if inserted > 0 {
        debug!("Initialized game clock at {}", initial);
    }
    Ok(())
}

fn to_period(row: &game_settings::Model) -> Result<GamePeriod> {
    u32::try_from(row.current_month)
        .ok()
        .and_then(|month| GamePeriod::new(month, row.current_year))
        .ok_or_else(|| {
            DbErr::Custom(format!(
                "Stored game period {}/{} is invalid",
                row.current_month, row.current_year
            ))
            .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{period, setup_db};
    use sea_orm::{ConnectionTrait, TransactionTrait};

    #[tokio::test]
    async fn test_clock_created_lazily_with_initial_period() {
        let db = setup_db().await.unwrap();
        assert!(game_settings::Entity::find_by_id(SINGLETON_ID).one(&db).await.unwrap().is_none());

        let current = current_period(&db, period(3, 2024)).await.unwrap();
        assert_eq!(current, period(3, 2024));

        // A second read with a different default keeps the stored value
        let again = current_period(&db, period(7, 2030)).await.unwrap();
        assert_eq!(again, period(3, 2024));
    }

    #[tokio::test]
    async fn test_store_and_lock_period() {
        let db = setup_db().await.unwrap();
        let txn = db.begin().await.unwrap();
        let locked = lock_period(&txn, period(1, 2024)).await.unwrap();
        assert_eq!(locked, period(1, 2024));
        store_period(&txn, period(2, 2024)).await.unwrap();
        txn.commit().await.unwrap();

        assert_eq!(current_period(&db, period(1, 2024)).await.unwrap(), period(2, 2024));
    }

    #[tokio::test]
    async fn test_corrupt_clock_row_is_reported() {
        let db = setup_db().await.unwrap();
        db.execute_unprepared(
            "INSERT INTO game_settings (id, current_month, current_year) VALUES (1, 13, 2024)",
        )
        .await
        .unwrap();

        let err = current_period(&db, period(1, 2024)).await.unwrap_err();
        assert!(!err.is_domain());
    }
}
