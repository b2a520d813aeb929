//! Monthly advancement engine.
//!
//! Advancing the game closes the current period: every roster earns points from
//! the popularity of its artists and budget from their prices, both taken from
//! the stats recorded for the closing period. Then the clock moves to the next
//! month. All of it happens in one transaction.

use common::{AdvanceDto, GamePeriod};
use model::entities::{artist_stats, roster, roster_member};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, instrument, trace};

use crate::clock;
use crate::error::Result;
use crate::transaction::commit_or_rollback;
use crate::GameRules;

/// Rates converting an artist's monthly stats into roster gains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scoring {
    /// Points earned per point of artist popularity
    pub points_per_popularity: Decimal,
    /// Budget earned per unit of artist price
    pub budget_per_price: Decimal,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            points_per_popularity: Decimal::new(1, 1),
            budget_per_price: Decimal::new(5, 2),
        }
    }
}

/// Points and budget a roster earns for one period.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RosterGain {
    pub points: Decimal,
    pub budget: Decimal,
}

/// Result of a successful advance.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvanceOutcome {
    /// The period that was closed
    pub previous: GamePeriod,
    /// The new current period
    pub period: GamePeriod,
    /// Number of rosters that earned points and budget
    pub rosters_updated: usize,
}

impl From<AdvanceOutcome> for AdvanceDto {
    fn from(outcome: AdvanceOutcome) -> Self {
        Self {
            month: outcome.period.month,
            year: outcome.period.year,
            month_name: outcome.period.month_name().to_string(),
            rosters_updated: outcome.rosters_updated,
        }
    }
}

/// Sums the gains of every roster that holds at least one artist with stats in `stats`.
///
/// `stats` must all belong to the same period. Rosters whose artists have no
/// stats are absent from the result.
pub fn score_period(
    stats: &[artist_stats::Model],
    members: &[roster_member::Model],
    scoring: &Scoring,
) -> BTreeMap<i32, RosterGain> {
    let by_artist: HashMap<i32, &artist_stats::Model> =
        stats.iter().map(|s| (s.artist_id, s)).collect();

    let mut gains: BTreeMap<i32, RosterGain> = BTreeMap::new();
    for member in members {
        let Some(stats) = by_artist.get(&member.artist_id) else {
            continue;
        };
        let gain = gains.entry(member.roster_id).or_default();
        gain.points += Decimal::from(stats.popularity) * scoring.points_per_popularity;
        gain.budget += stats.price * scoring.budget_per_price;
    }
    gains
}

/// Closes the current period and moves the game clock to the next month.
///
/// If any step fails the transaction is rolled back and neither the clock nor
/// any roster changes.
#[instrument(skip(db, rules))]
pub async fn advance(db: &DatabaseConnection, rules: &GameRules) -> Result<AdvanceOutcome> {
    let txn = db.begin().await?;
    let result = advance_in(&txn, rules).await;
    commit_or_rollback(txn, result).await
}

async fn advance_in(txn: &DatabaseTransaction, rules: &GameRules) -> Result<AdvanceOutcome> {
    let previous = clock::lock_period(txn, rules.initial_period).await?;
    let period = previous.next();
    trace!("Advancing from {} to {}", previous, period);

    let stats = artist_stats::Entity::find()
        .filter(artist_stats::Column::Month.eq(previous.month as i32))
        .filter(artist_stats::Column::Year.eq(previous.year))
        .all(txn)
        .await?;
    let artist_ids: Vec<i32> = stats.iter().map(|s| s.artist_id).collect();
    let members = roster_member::Entity::find()
        .filter(roster_member::Column::ArtistId.is_in(artist_ids))
        .all(txn)
        .await?;
    debug!(
        "{} artists have stats for {}, held by {} roster slots",
        stats.len(),
        previous,
        members.len()
    );

    let gains = score_period(&stats, &members, &rules.scoring);
    let rosters = roster::Entity::find()
        .filter(roster::Column::Id.is_in(gains.keys().copied()))
        .lock_exclusive()
        .all(txn)
        .await?;

    let mut rosters_updated = 0;
    for roster in rosters {
        let Some(gain) = gains.get(&roster.id) else {
            continue;
        };
        let points = roster.points + gain.points;
        let budget = roster.budget + gain.budget;
        debug!(
            "Roster {} earns {} points and {} budget",
            roster.id, gain.points, gain.budget
        );

        let mut active: roster::ActiveModel = roster.into();
        active.points = Set(points);
        active.budget = Set(budget);
        active.update(txn).await?;
        rosters_updated += 1;
    }

    clock::store_period(txn, period).await?;

    info!(
        "Advanced game from {} to {}, {} rosters updated",
        previous, period, rosters_updated
    );
    Ok(AdvanceOutcome {
        previous,
        period,
        rosters_updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use sea_orm::ConnectionTrait;

    fn stats(artist_id: i32, price: i64, popularity: i32) -> artist_stats::Model {
        artist_stats::Model {
            id: artist_id,
            artist_id,
            month: 1,
            year: 2024,
            price: Decimal::from(price),
            listeners: 0,
            followers: 0,
            popularity,
        }
    }

    fn member(roster_id: i32, artist_id: i32) -> roster_member::Model {
        roster_member::Model {
            roster_id,
            artist_id,
            purchase_price: Decimal::ZERO,
        }
    }

    #[test]
    fn test_score_period_sums_per_roster() {
        let gains = score_period(
            &[stats(1, 500, 70), stats(2, 300, 50)],
            &[member(10, 1), member(10, 2), member(20, 2), member(30, 3)],
            &Scoring::default(),
        );

        assert_eq!(gains.len(), 2);
        assert_eq!(gains[&10].points, Decimal::from(12));
        assert_eq!(gains[&10].budget, Decimal::from(40));
        assert_eq!(gains[&20].points, Decimal::from(5));
        assert_eq!(gains[&20].budget, Decimal::from(15));
        // Artist 3 has no stats, so roster 30 earns nothing
        assert!(!gains.contains_key(&30));
    }

    #[test]
    fn test_score_period_custom_rates() {
        let scoring = Scoring {
            points_per_popularity: Decimal::ONE,
            budget_per_price: Decimal::ZERO,
        };
        let gains = score_period(&[stats(1, 500, 70)], &[member(1, 1)], &scoring);
        assert_eq!(gains[&1].points, Decimal::from(70));
        assert_eq!(gains[&1].budget, Decimal::ZERO);
    }

    /// Two rosters: one holding two artists priced for `at`, one holding an
    /// artist without stats for `at`.
    async fn scenario(at: GamePeriod) -> (DatabaseConnection, i32, i32) {
        let db = setup_db().await.unwrap();
        let alice = new_player(&db, "Alice").await;
        let bob = new_player(&db, "Bob").await;
        let league = new_league(&db, "Synthwave", &alice).await;
        let scored = new_roster(&db, &alice, &league).await;
        let idle = new_roster(&db, &bob, &league).await;

        let echoes = new_artist(&db, "The Echoes").await;
        let drift = new_artist(&db, "Drift").await;
        let silent = new_artist(&db, "Silent").await;
        new_stats(&db, echoes.id, at, 500, 70).await;
        new_stats(&db, drift.id, at, 300, 50).await;
        new_stats(&db, silent.id, at.next(), 100, 90).await;

        for (roster_id, artist_id) in [(scored.id, echoes.id), (scored.id, drift.id), (idle.id, silent.id)] {
            roster_member::ActiveModel {
                roster_id: Set(roster_id),
                artist_id: Set(artist_id),
                purchase_price: Set(Decimal::ZERO),
            }
            .insert(&db)
            .await
            .unwrap();
        }
        set_clock(&db, at).await;
        (db, scored.id, idle.id)
    }

    #[tokio::test]
    async fn test_advance_credits_rosters() {
        let (db, scored, idle) = scenario(period(6, 2024)).await;

        let outcome = advance(&db, &GameRules::default()).await.unwrap();
        assert_eq!(outcome.previous, period(6, 2024));
        assert_eq!(outcome.period, period(7, 2024));
        assert_eq!(outcome.rosters_updated, 1);

        let scored = get_roster(&db, scored).await.unwrap();
        assert_eq!(scored.points, Decimal::from(12));
        assert_eq!(scored.budget, Decimal::from(2040));

        let idle = get_roster(&db, idle).await.unwrap();
        assert_eq!(idle.points, Decimal::ZERO);
        assert_eq!(idle.budget, Decimal::from(2000));

        assert_eq!(
            clock::current_period(&db, period(1, 2024)).await.unwrap(),
            period(7, 2024)
        );
    }

    #[tokio::test]
    async fn test_advance_rolls_over_year() {
        let (db, scored, _) = scenario(period(12, 2024)).await;

        let outcome = advance(&db, &GameRules::default()).await.unwrap();
        assert_eq!(outcome.period, period(1, 2025));

        let dto = AdvanceDto::from(outcome);
        assert_eq!(dto.month_name, "January");
        assert_eq!(dto.year, 2025);

        let scored = get_roster(&db, scored).await.unwrap();
        assert_eq!(scored.points, Decimal::from(12));
        assert_eq!(scored.budget, Decimal::from(2040));
    }

    #[tokio::test]
    async fn test_advance_initializes_clock() {
        let db = setup_db().await.unwrap();
        let rules = GameRules {
            initial_period: period(3, 2025),
            ..GameRules::default()
        };

        let outcome = advance(&db, &rules).await.unwrap();
        assert_eq!(outcome.previous, period(3, 2025));
        assert_eq!(outcome.period, period(4, 2025));
        assert_eq!(outcome.rosters_updated, 0);
    }

    #[tokio::test]
    async fn test_failed_advance_changes_nothing() {
        let (db, scored, _) = scenario(period(6, 2024)).await;

        // Make the final clock write fail after rosters were already credited
        db.execute_unprepared(
            "CREATE TRIGGER freeze_clock BEFORE UPDATE ON game_settings \
             BEGIN SELECT RAISE(ABORT, 'clock frozen'); END;",
        )
        .await
        .unwrap();

        let err = advance(&db, &GameRules::default()).await.unwrap_err();
        assert!(!err.is_domain());

        let scored = get_roster(&db, scored).await.unwrap();
        assert_eq!(scored.points, Decimal::ZERO);
        assert_eq!(scored.budget, Decimal::from(2000));
        assert_eq!(
            clock::current_period(&db, period(1, 2024)).await.unwrap(),
            period(6, 2024)
        );
    }
}
