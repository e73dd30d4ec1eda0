//! One-shot seeder for the `zip_codes` reference table.
//!
//! Usage: `cargo run --bin load_zips -- path/to/zips.csv`
//!
//! Expects a CSV with a header row of `zip,city,state,lat,lon`. Skips
//! seeding entirely if the table already has rows.

use dotenv::dotenv;
use haulbid_backend::create_pool;
use haulbid_backend::db::zip_codes as zip_db;
use haulbid_backend::models::zip_codes;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
struct ZipRow {
    zip: String,
    city: Option<String>,
    state: Option<String>,
    lat: f64,
    lon: f64,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let path = std::env::args()
        .nth(1)
        .expect("Usage: load_zips <path to zips.csv>");

    let db = create_pool().await;

    let existing = zip_db::count_zips(&db)
        .await
        .expect("Failed to count zip_codes rows");
    if existing > 0 {
        tracing::info!("zip_codes already seeded ({existing} rows), nothing to do");
        return Ok(());
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(&path)
        .expect("Failed to open CSV file");

    let mut rows = Vec::new();
    for record in reader.deserialize::<ZipRow>() {
        let row = record.expect("Malformed CSV row");
        rows.push(zip_codes::Model {
            zip: row.zip,
            city: row.city,
            state: row.state,
            lat: row.lat,
            lon: row.lon,
        });
    }

    let count = rows.len();
    zip_db::insert_zips(&db, rows)
        .await
        .expect("Failed to insert zip_codes rows");
    tracing::info!("Seeded {count} ZIP rows from {path}");

    Ok(())
}
