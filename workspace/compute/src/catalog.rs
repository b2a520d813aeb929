//! Artist catalog: search, roster contents and bulk import of monthly stats.

use common::{ArtistSnapshotDto, CatalogArtist, GamePeriod};
use model::entities::{artist, artist_stats, roster, roster_member};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

use crate::error::{LeagueError, Result};
use crate::transaction::commit_or_rollback;

/// Shortest search term accepted by [`search_artists`].
pub const MIN_SEARCH_LEN: usize = 2;

/// Counts of rows written by [`import_catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub artists_created: usize,
    pub stats_created: usize,
    pub stats_updated: usize,
}

fn snapshot(artist: &artist::Model, stats: &artist_stats::Model) -> ArtistSnapshotDto {
    ArtistSnapshotDto {
        artist_id: artist.id,
        artist_name: artist.name.clone(),
        price: stats.price,
        listeners: stats.listeners,
        followers: stats.followers,
        popularity: stats.popularity,
        month: u32::try_from(stats.month).unwrap_or_default(),
        year: stats.year,
    }
}

/// Finds artists whose name contains `term`, ignoring case, that have stats for `period`.
#[instrument(skip(db))]
pub async fn search_artists(
    db: &DatabaseConnection,
    period: GamePeriod,
    term: &str,
) -> Result<Vec<ArtistSnapshotDto>> {
    let term = term.trim();
    if term.chars().count() < MIN_SEARCH_LEN {
        return Err(LeagueError::invalid(format!(
            "Search term must be at least {} characters",
            MIN_SEARCH_LEN
        )));
    }

    let pattern = format!("%{}%", term.to_lowercase());
    let rows = artist::Entity::find()
        .find_also_related(artist_stats::Entity)
        .filter(Expr::expr(Func::lower(Expr::col((artist::Entity, artist::Column::Name)))).like(pattern))
        .filter(artist_stats::Column::Month.eq(period.month as i32))
        .filter(artist_stats::Column::Year.eq(period.year))
        .order_by_asc(artist::Column::Name)
        .all(db)
        .await?;

    let results: Vec<ArtistSnapshotDto> = rows
        .iter()
        .filter_map(|(artist, stats)| stats.as_ref().map(|s| snapshot(artist, s)))
        .collect();
    debug!("Search '{}' matched {} artists in {}", term, results.len(), period);
    Ok(results)
}

/// Artists on a roster with their stats for `period`.
///
/// Artists without stats for `period` are shown with their latest known stats.
#[instrument(skip(db))]
pub async fn roster_artists(
    db: &DatabaseConnection,
    period: GamePeriod,
    roster_id: i32,
) -> Result<Vec<ArtistSnapshotDto>> {
    if roster::Entity::find_by_id(roster_id).one(db).await?.is_none() {
        return Err(LeagueError::not_found(format!("Roster {} not found", roster_id)));
    }

    let artists = artist::Entity::find()
        .inner_join(roster_member::Entity)
        .filter(roster_member::Column::RosterId.eq(roster_id))
        .order_by_asc(artist::Column::Name)
        .all(db)
        .await?;
    let artist_ids: Vec<i32> = artists.iter().map(|a| a.id).collect();

    // Newest first, so the first row seen per artist is the latest one
    let stats = artist_stats::Entity::find()
        .filter(artist_stats::Column::ArtistId.is_in(artist_ids))
        .order_by_desc(artist_stats::Column::Year)
        .order_by_desc(artist_stats::Column::Month)
        .all(db)
        .await?;

    let mut current: HashMap<i32, &artist_stats::Model> = HashMap::new();
    let mut latest: HashMap<i32, &artist_stats::Model> = HashMap::new();
    for row in &stats {
        latest.entry(row.artist_id).or_insert(row);
        if row.month == period.month as i32 && row.year == period.year {
            current.insert(row.artist_id, row);
        }
    }

    let mut results = Vec::with_capacity(artists.len());
    for artist in &artists {
        match current.get(&artist.id).or_else(|| latest.get(&artist.id)) {
            Some(stats) => results.push(snapshot(artist, stats)),
            None => warn!("Artist {} on roster {} has no stats", artist.id, roster_id),
        }
    }
    Ok(results)
}

/// Creates missing artists and inserts or replaces their monthly stats.
///
/// Artists are matched by exact name; stats by (artist, month, year). The whole
/// catalog is imported in one transaction.
#[instrument(skip(db, catalog), fields(artists = catalog.len()))]
pub async fn import_catalog(db: &DatabaseConnection, catalog: &[CatalogArtist]) -> Result<ImportSummary> {
    let txn = db.begin().await?;
    let result = import_catalog_in(&txn, catalog).await;
    commit_or_rollback(txn, result).await
}

async fn import_catalog_in(txn: &DatabaseTransaction, catalog: &[CatalogArtist]) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    for entry in catalog {
        let name = entry.name.trim();
        if name.is_empty() {
            return Err(LeagueError::invalid("Artist name must not be empty"));
        }

        let artist = match artist::Entity::find()
            .filter(artist::Column::Name.eq(name))
            .one(txn)
            .await?
        {
            Some(existing) => existing,
            None => {
                summary.artists_created += 1;
                artist::ActiveModel {
                    name: Set(name.to_string()),
                    ..Default::default()
                }
                .insert(txn)
                .await?
            }
        };

        for stats in &entry.stats {
            let period = GamePeriod::new(stats.month, stats.year).ok_or_else(|| {
                LeagueError::invalid(format!(
                    "Invalid month {} for artist '{}'",
                    stats.month, name
                ))
            })?;

            let existing = artist_stats::Entity::find()
                .filter(artist_stats::Column::ArtistId.eq(artist.id))
                .filter(artist_stats::Column::Month.eq(period.month as i32))
                .filter(artist_stats::Column::Year.eq(period.year))
                .one(txn)
                .await?;

            let mut row = match existing {
                Some(model) => {
                    summary.stats_updated += 1;
                    model.into()
                }
                None => {
                    summary.stats_created += 1;
                    artist_stats::ActiveModel {
                        artist_id: Set(artist.id),
                        month: Set(period.month as i32),
                        year: Set(period.year),
                        ..Default::default()
                    }
                }
            };
            row.price = Set(stats.price);
            row.listeners = Set(stats.listeners);
            row.followers = Set(stats.followers);
            row.popularity = Set(stats.popularity);
            row.save(txn).await?;
        }
    }

    info!(
        "Imported catalog: {} artists created, {} stats created, {} stats updated",
        summary.artists_created, summary.stats_created, summary.stats_updated
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use common::CatalogStats;
    use rust_decimal::Decimal;
    use sea_orm::PaginatorTrait;

    fn catalog_stats(month: u32, price: i64, popularity: i32) -> CatalogStats {
        CatalogStats {
            month,
            year: 2024,
            price: Decimal::from(price),
            listeners: 10,
            followers: 5,
            popularity,
        }
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_period_bound() {
        let db = setup_db().await.unwrap();
        let echoes = new_artist(&db, "The Echoes").await;
        let echo = new_artist(&db, "Echo Chamber").await;
        let other = new_artist(&db, "Drift").await;
        new_stats(&db, echoes.id, period(1, 2024), 500, 70).await;
        new_stats(&db, echo.id, period(2, 2024), 300, 40).await;
        new_stats(&db, other.id, period(1, 2024), 100, 10).await;

        let found = search_artists(&db, period(1, 2024), "ECHO").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].artist_name, "The Echoes");
        assert_eq!(found[0].price, Decimal::from(500));
        assert_eq!((found[0].month, found[0].year), (1, 2024));

        let found = search_artists(&db, period(2, 2024), "echo").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].artist_name, "Echo Chamber");
    }

    #[tokio::test]
    async fn test_search_term_too_short() {
        let db = setup_db().await.unwrap();
        let err = search_artists(&db, period(1, 2024), " e ").await.unwrap_err();
        assert!(matches!(err, LeagueError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_roster_artists_prefers_current_stats() {
        let db = setup_db().await.unwrap();
        let player = new_player(&db, "Alice").await;
        let league = new_league(&db, "Synthwave", &player).await;
        let roster = new_roster(&db, &player, &league).await;
        let echoes = new_artist(&db, "The Echoes").await;
        let drift = new_artist(&db, "Drift").await;
        new_stats(&db, echoes.id, period(1, 2024), 500, 70).await;
        new_stats(&db, echoes.id, period(2, 2024), 650, 75).await;
        new_stats(&db, drift.id, period(1, 2024), 300, 50).await;
        for artist_id in [echoes.id, drift.id] {
            roster_member::ActiveModel {
                roster_id: Set(roster.id),
                artist_id: Set(artist_id),
                purchase_price: Set(Decimal::from(100)),
            }
            .insert(&db)
            .await
            .unwrap();
        }

        let artists = roster_artists(&db, period(1, 2024), roster.id).await.unwrap();
        assert_eq!(artists.len(), 2);
        assert_eq!(artists[0].artist_name, "Drift");
        assert_eq!(artists[1].price, Decimal::from(500));

        // Drift has no February stats and falls back to January
        let artists = roster_artists(&db, period(2, 2024), roster.id).await.unwrap();
        assert_eq!(artists[0].price, Decimal::from(300));
        assert_eq!(artists[0].month, 1);
        assert_eq!(artists[1].price, Decimal::from(650));

        let err = roster_artists(&db, period(1, 2024), 999).await.unwrap_err();
        assert!(matches!(err, LeagueError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_import_catalog_upserts() {
        let db = setup_db().await.unwrap();
        let catalog = vec![
            CatalogArtist {
                name: "The Echoes".to_string(),
                stats: vec![catalog_stats(1, 500, 70), catalog_stats(2, 550, 72)],
            },
            CatalogArtist {
                name: "Drift".to_string(),
                stats: vec![catalog_stats(1, 300, 50)],
            },
        ];

        let summary = import_catalog(&db, &catalog).await.unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                artists_created: 2,
                stats_created: 3,
                stats_updated: 0
            }
        );

        let again = vec![CatalogArtist {
            name: "The Echoes".to_string(),
            stats: vec![catalog_stats(2, 600, 80)],
        }];
        let summary = import_catalog(&db, &again).await.unwrap();
        assert_eq!(summary.artists_created, 0);
        assert_eq!(summary.stats_updated, 1);

        assert_eq!(artist::Entity::find().count(&db).await.unwrap(), 2);
        let found = search_artists(&db, period(2, 2024), "echoes").await.unwrap();
        assert_eq!(found[0].price, Decimal::from(600));
        assert_eq!(found[0].popularity, 80);
    }

    #[tokio::test]
    async fn test_import_catalog_rejects_bad_month() {
        let db = setup_db().await.unwrap();
        let catalog = vec![CatalogArtist {
            name: "The Echoes".to_string(),
            stats: vec![catalog_stats(1, 500, 70), catalog_stats(13, 500, 70)],
        }];

        let err = import_catalog(&db, &catalog).await.unwrap_err();
        assert!(matches!(err, LeagueError::InvalidInput(_)));
        // Nothing from the failed import is kept
        assert_eq!(artist::Entity::find().count(&db).await.unwrap(), 0);
    }
}
