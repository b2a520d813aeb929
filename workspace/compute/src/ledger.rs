//! Roster budget ledger.
//!
//! Adding an artist charges the artist's price for the current game period to the
//! roster budget; removing one refunds it. The budget can never go negative and
//! an artist appears at most once per roster.

use common::BudgetChangeDto;
use model::entities::{artist, artist_stats, roster, roster_member};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

use crate::clock;
use crate::error::{LeagueError, Result};
use crate::transaction::commit_or_rollback;
use crate::GameRules;

/// Amount credited back to a roster when an artist is removed from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefundPolicy {
    /// Price from the artist's most recent stats row. Falls back to the purchase
    /// price when the artist has no stats at all.
    #[default]
    LatestKnownPrice,
    /// The price that was paid when the artist was added.
    PurchasePrice,
}

impl FromStr for RefundPolicy {
    type Err = LeagueError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest_known_price" | "latest" => Ok(Self::LatestKnownPrice),
            "purchase_price" | "purchase" => Ok(Self::PurchasePrice),
            other => Err(LeagueError::invalid(format!("Unknown refund policy '{}'", other))),
        }
    }
}

impl fmt::Display for RefundPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LatestKnownPrice => write!(f, "latest_known_price"),
            Self::PurchasePrice => write!(f, "purchase_price"),
        }
    }
}

/// Budget movement caused by adding or removing one artist.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetChange {
    pub roster_id: i32,
    pub artist_id: i32,
    /// Price paid on add, refund on removal
    pub amount: Decimal,
    /// Roster budget after the change
    pub budget: Decimal,
}

impl From<BudgetChange> for BudgetChangeDto {
    fn from(change: BudgetChange) -> Self {
        Self {
            roster_id: change.roster_id,
            artist_id: change.artist_id,
            amount: change.amount,
            budget: change.budget,
        }
    }
}

/// Adds an artist to a roster, charging its current-period price.
///
/// # Errors
///
/// * [`LeagueError::NotFound`] when the roster or the artist does not exist, or the
///   artist has no stats for the current period
/// * [`LeagueError::Conflict`] when the artist is already on the roster
/// * [`LeagueError::InsufficientBudget`] when the roster cannot afford the artist
#[instrument(skip(db, rules))]
pub async fn add_artist(
    db: &DatabaseConnection,
    rules: &GameRules,
    roster_id: i32,
    artist_id: i32,
) -> Result<BudgetChange> {
    let txn = db.begin().await?;
    let result = add_artist_in(&txn, rules, roster_id, artist_id).await;
    commit_or_rollback(txn, result).await
}

async fn add_artist_in(
    txn: &DatabaseTransaction,
    rules: &GameRules,
    roster_id: i32,
    artist_id: i32,
) -> Result<BudgetChange> {
    let roster = lock_roster(txn, roster_id).await?;

    if artist::Entity::find_by_id(artist_id).one(txn).await?.is_none() {
        return Err(LeagueError::not_found(format!("Artist {} not found", artist_id)));
    }

    let period = clock::current_period(txn, rules.initial_period).await?;
    let stats = artist_stats::Entity::find()
        .filter(artist_stats::Column::ArtistId.eq(artist_id))
        .filter(artist_stats::Column::Month.eq(period.month as i32))
        .filter(artist_stats::Column::Year.eq(period.year))
        .one(txn)
        .await?
        .ok_or_else(|| {
            LeagueError::not_found(format!("Artist {} has no stats for {}", artist_id, period))
        })?;

    if roster_member::Entity::find_by_id((roster_id, artist_id))
        .one(txn)
        .await?
        .is_some()
    {
        warn!("Artist {} is already on roster {}", artist_id, roster_id);
        return Err(LeagueError::conflict(format!(
            "Artist {} is already on roster {}",
            artist_id, roster_id
        )));
    }

    let price = stats.price;
    if roster.budget < price {
        warn!(
            "Roster {} cannot afford artist {}: budget {}, price {}",
            roster_id, artist_id, roster.budget, price
        );
        return Err(LeagueError::InsufficientBudget {
            budget: roster.budget,
            price,
        });
    }

    roster_member::ActiveModel {
        roster_id: Set(roster_id),
        artist_id: Set(artist_id),
        purchase_price: Set(price),
    }
    .insert(txn)
    .await?;

    let budget = roster.budget - price;
    let mut active: roster::ActiveModel = roster.into();
    active.budget = Set(budget);
    active.update(txn).await?;

    info!(
        "Added artist {} to roster {} for {} ({}), budget now {}",
        artist_id, roster_id, price, period, budget
    );
    Ok(BudgetChange {
        roster_id,
        artist_id,
        amount: price,
        budget,
    })
}

/// Removes an artist from a roster and refunds the roster according to `rules.refund_policy`.
///
/// # Errors
///
/// * [`LeagueError::NotFound`] when the roster does not exist or the artist is not on it
#[instrument(skip(db, rules))]
pub async fn remove_artist(
    db: &DatabaseConnection,
    rules: &GameRules,
    roster_id: i32,
    artist_id: i32,
) -> Result<BudgetChange> {
    let txn = db.begin().await?;
    let result = remove_artist_in(&txn, rules.refund_policy, roster_id, artist_id).await;
    commit_or_rollback(txn, result).await
}

async fn remove_artist_in(
    txn: &DatabaseTransaction,
    policy: RefundPolicy,
    roster_id: i32,
    artist_id: i32,
) -> Result<BudgetChange> {
    let roster = lock_roster(txn, roster_id).await?;

    let member = roster_member::Entity::find_by_id((roster_id, artist_id))
        .one(txn)
        .await?
        .ok_or_else(|| {
            LeagueError::not_found(format!("Artist {} is not on roster {}", artist_id, roster_id))
        })?;

    let refund = match policy {
        RefundPolicy::PurchasePrice => member.purchase_price,
        RefundPolicy::LatestKnownPrice => artist_stats::Entity::find()
            .filter(artist_stats::Column::ArtistId.eq(artist_id))
            .order_by_desc(artist_stats::Column::Year)
            .order_by_desc(artist_stats::Column::Month)
            .one(txn)
            .await?
            .map(|stats| stats.price)
            .unwrap_or(member.purchase_price),
    };
    debug!("Refunding {} under {} policy", refund, policy);

    member.delete(txn).await?;

    let budget = roster.budget + refund;
    let mut active: roster::ActiveModel = roster.into();
    active.budget = Set(budget);
    active.update(txn).await?;

    info!(
        "Removed artist {} from roster {}, refunded {}, budget now {}",
        artist_id, roster_id, refund, budget
    );
    Ok(BudgetChange {
        roster_id,
        artist_id,
        amount: refund,
        budget,
    })
}

async fn lock_roster(txn: &DatabaseTransaction, roster_id: i32) -> Result<roster::Model> {
    roster::Entity::find_by_id(roster_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or_else(|| LeagueError::not_found(format!("Roster {} not found", roster_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    struct Fixture {
        db: DatabaseConnection,
        roster_id: i32,
        artist_id: i32,
    }

    /// One roster with a budget of 2000 and one artist priced 500 in January 2024.
    async fn fixture() -> Fixture {
        let db = setup_db().await.unwrap();
        let player = new_player(&db, "Alice").await;
        let league = new_league(&db, "Synthwave", &player).await;
        let roster = new_roster(&db, &player, &league).await;
        let artist = new_artist(&db, "The Echoes").await;
        new_stats(&db, artist.id, period(1, 2024), 500, 70).await;
        set_clock(&db, period(1, 2024)).await;
        Fixture {
            db,
            roster_id: roster.id,
            artist_id: artist.id,
        }
    }

    #[tokio::test]
    async fn test_add_artist_charges_current_price() {
        let f = fixture().await;
        let rules = GameRules::default();

        let change = add_artist(&f.db, &rules, f.roster_id, f.artist_id).await.unwrap();
        assert_eq!(change.amount, Decimal::from(500));
        assert_eq!(change.budget, Decimal::from(1500));

        let roster = get_roster(&f.db, f.roster_id).await.unwrap();
        assert_eq!(roster.budget, Decimal::from(1500));
        assert_eq!(member_count(&f.db, f.roster_id).await, 1);

        let member = roster_member::Entity::find_by_id((f.roster_id, f.artist_id))
            .one(&f.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(member.purchase_price, Decimal::from(500));
    }

    #[tokio::test]
    async fn test_add_artist_twice_is_conflict() {
        let f = fixture().await;
        let rules = GameRules::default();

        add_artist(&f.db, &rules, f.roster_id, f.artist_id).await.unwrap();
        let err = add_artist(&f.db, &rules, f.roster_id, f.artist_id).await.unwrap_err();
        assert!(matches!(err, LeagueError::Conflict(_)));

        let roster = get_roster(&f.db, f.roster_id).await.unwrap();
        assert_eq!(roster.budget, Decimal::from(1500));
        assert_eq!(member_count(&f.db, f.roster_id).await, 1);
    }

    #[tokio::test]
    async fn test_add_artist_insufficient_budget() {
        let f = fixture().await;
        set_budget(&f.db, f.roster_id, 499).await;

        let err = add_artist(&f.db, &GameRules::default(), f.roster_id, f.artist_id)
            .await
            .unwrap_err();
        match err {
            LeagueError::InsufficientBudget { budget, price } => {
                assert_eq!(budget, Decimal::from(499));
                assert_eq!(price, Decimal::from(500));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(member_count(&f.db, f.roster_id).await, 0);
        let roster = get_roster(&f.db, f.roster_id).await.unwrap();
        assert_eq!(roster.budget, Decimal::from(499));
    }

    #[tokio::test]
    async fn test_add_artist_spending_whole_budget() {
        let f = fixture().await;
        set_budget(&f.db, f.roster_id, 500).await;

        let change = add_artist(&f.db, &GameRules::default(), f.roster_id, f.artist_id)
            .await
            .unwrap();
        assert_eq!(change.budget, Decimal::ZERO);
        assert!(get_roster(&f.db, f.roster_id).await.unwrap().budget >= Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_add_artist_missing_records() {
        let f = fixture().await;
        let rules = GameRules::default();

        let err = add_artist(&f.db, &rules, 999, f.artist_id).await.unwrap_err();
        assert!(matches!(err, LeagueError::NotFound(_)));

        let err = add_artist(&f.db, &rules, f.roster_id, 999).await.unwrap_err();
        assert!(matches!(err, LeagueError::NotFound(_)));

        // Artist exists but was not priced for the current period
        let unpriced = new_artist(&f.db, "Unsigned").await;
        new_stats(&f.db, unpriced.id, period(2, 2024), 100, 10).await;
        let err = add_artist(&f.db, &rules, f.roster_id, unpriced.id).await.unwrap_err();
        assert!(matches!(err, LeagueError::NotFound(_)));

        assert_eq!(member_count(&f.db, f.roster_id).await, 0);
    }

    #[tokio::test]
    async fn test_remove_artist_refunds_latest_price() {
        let f = fixture().await;
        let rules = GameRules::default();
        add_artist(&f.db, &rules, f.roster_id, f.artist_id).await.unwrap();

        // The artist got more expensive since it was bought
        new_stats(&f.db, f.artist_id, period(2, 2024), 700, 80).await;

        let change = remove_artist(&f.db, &rules, f.roster_id, f.artist_id).await.unwrap();
        assert_eq!(change.amount, Decimal::from(700));
        assert_eq!(change.budget, Decimal::from(2200));
        assert_eq!(member_count(&f.db, f.roster_id).await, 0);
    }

    #[tokio::test]
    async fn test_remove_artist_refunds_purchase_price() {
        let f = fixture().await;
        let rules = GameRules {
            refund_policy: RefundPolicy::PurchasePrice,
            ..GameRules::default()
        };
        add_artist(&f.db, &rules, f.roster_id, f.artist_id).await.unwrap();
        new_stats(&f.db, f.artist_id, period(2, 2024), 700, 80).await;

        let change = remove_artist(&f.db, &rules, f.roster_id, f.artist_id).await.unwrap();
        assert_eq!(change.amount, Decimal::from(500));
        assert_eq!(change.budget, Decimal::from(2000));
    }

    #[tokio::test]
    async fn test_remove_artist_without_membership() {
        let f = fixture().await;

        let err = remove_artist(&f.db, &GameRules::default(), f.roster_id, f.artist_id)
            .await
            .unwrap_err();
        assert!(matches!(err, LeagueError::NotFound(_)));

        let roster = get_roster(&f.db, f.roster_id).await.unwrap();
        assert_eq!(roster.budget, Decimal::from(2000));
        assert_eq!(member_count(&f.db, f.roster_id).await, 0);
    }

    #[test]
    fn test_refund_policy_parsing() {
        assert_eq!("purchase_price".parse::<RefundPolicy>().unwrap(), RefundPolicy::PurchasePrice);
        assert_eq!(
            " Latest_Known_Price ".parse::<RefundPolicy>().unwrap(),
            RefundPolicy::LatestKnownPrice
        );
        assert!("half".parse::<RefundPolicy>().is_err());
        assert_eq!(RefundPolicy::PurchasePrice.to_string(), "purchase_price");
    }
}
