use anyhow::{Context, Result};
use common::CatalogArtist;
use compute::catalog::{import_catalog, ImportSummary};
use sea_orm::Database;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, trace};

/// Imports an artist catalog from a JSON file into the database.
pub async fn import_artists(json_path: &str, database_url: &str) -> Result<()> {
    trace!("Entering import_artists function");
    info!("Starting artist catalog import");
    debug!("JSON path: {}", json_path);
    debug!("Database URL: {}", database_url);

    let catalog = read_catalog(Path::new(json_path))?;
    info!("Loaded {} artists from {}", catalog.len(), json_path);

    // Connect to database
    let db = Database::connect(database_url)
        .await
        .with_context(|| format!("Failed to connect to database: {}", database_url))?;

    let ImportSummary {
        artists_created,
        stats_created,
        stats_updated,
    } = import_catalog(&db, &catalog).await?;

    info!(
        "Import finished: {} new artists, {} new monthly stats, {} replaced",
        artists_created, stats_created, stats_updated
    );
    Ok(())
}

fn read_catalog(path: &Path) -> Result<Vec<CatalogArtist>> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let catalog: Vec<CatalogArtist> =
        serde_json::from_reader(BufReader::new(file)).context("Failed to parse artist catalog")?;
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_parse_catalog() {
        let json = r#"[
            {"name": "The Echoes", "stats": [
                {"month": 1, "year": 2024, "price": "500", "listeners": 1200000, "followers": 340000, "popularity": 72},
                {"month": 2, "year": 2024, "price": 525.5, "popularity": 74}
            ]},
            {"name": "Drift"}
        ]"#;

        let catalog: Vec<CatalogArtist> = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].stats[0].price, Decimal::from(500));
        assert_eq!(catalog[0].stats[1].price, Decimal::new(5255, 1));
        assert_eq!(catalog[0].stats[1].listeners, 0);
        assert!(catalog[1].stats.is_empty());
    }

    #[test]
    fn test_missing_file() {
        assert!(read_catalog(Path::new("/nonexistent/catalog.json")).is_err());
    }
}
