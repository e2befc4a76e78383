// Shared test helpers for database setup and test data creation.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use tempfile::TempDir;

use geoguard::{run_migrations, GeoProvider, GeoRecordStore, Location, ResolverConfig};

/// Creates a migrated test store over a tempfile-backed SQLite database.
///
/// The returned `TempDir` keeps the database directory alive; hold it in the
/// test body for as long as the store is in use.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_store() -> (GeoRecordStore, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let db_path = dir.path().join("geoguard_test.db");

    std::fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .read(true)
        .open(&db_path)
        .expect("Failed to create test database file");

    let pool = SqlitePool::connect(&format!("sqlite:{}", db_path.to_string_lossy()))
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    (GeoRecordStore::new(Arc::new(pool)), dir)
}

/// Builds a resolver config pointed at test endpoints, with a rate-gate
/// interval small enough not to slow the suite down.
#[allow(dead_code)] // Used by other test files
pub fn test_resolver_config(primary: &str, secondary: &str) -> ResolverConfig {
    ResolverConfig {
        primary_endpoint: primary.to_string(),
        secondary_endpoint: secondary.to_string(),
        self_ip_endpoint: format!("{primary}/self-ip"),
        self_ip_fallback_endpoint: format!("{secondary}/self-ip"),
        request_timeout_secs: 5,
        min_request_interval: Duration::from_millis(1),
    }
}

/// Builds a fully-populated location for seeding upserts.
#[allow(dead_code)] // Used by other test files
pub fn test_location(ip: &str, city: &str, country: &str, lat: f64, lon: f64) -> Location {
    Location {
        ip: ip.to_string(),
        city: city.to_string(),
        region: "unknown".to_string(),
        country: country.to_string(),
        country_code: "XX".to_string(),
        latitude: Some(lat),
        longitude: Some(lon),
        timezone: "unknown".to_string(),
        organization: "unknown".to_string(),
        is_mobile: false,
        is_proxy: false,
        is_vpn: false,
        flag_url: None,
        source: GeoProvider::Primary,
    }
}

/// Inserts a record directly, with an explicit `last_seen`, for detector
/// scenarios that need controlled timelines.
#[allow(dead_code)] // Used by other test files
pub async fn seed_record(
    store: &GeoRecordStore,
    user_id: &str,
    ip: &str,
    city: &str,
    country: &str,
    coordinates: Option<(f64, f64)>,
    timezone: &str,
    last_seen: i64,
) {
    let (latitude, longitude) = match coordinates {
        Some((lat, lon)) => (Some(lat), Some(lon)),
        None => (None, None),
    };
    sqlx::query(
        "INSERT INTO geo_records (
            user_id, ip, country, city, region, latitude, longitude,
            timezone, organization, is_mobile, is_proxy, is_vpn,
            first_seen, last_seen, visit_count
        ) VALUES (?, ?, ?, ?, 'unknown', ?, ?, ?, 'unknown', 0, 0, 0, ?, ?, 1)",
    )
    .bind(user_id)
    .bind(ip)
    .bind(country)
    .bind(city)
    .bind(latitude)
    .bind(longitude)
    .bind(timezone)
    .bind(last_seen)
    .bind(last_seen)
    .execute(store.pool())
    .await
    .expect("seed insert should succeed");
}
