//! Geo record store operations.
//!
//! The store is the single writer of `geo_records`; the detectors and the
//! analytics aggregator only read. The upsert keys on `(user_id, ip)` so
//! repeated sightings update one row instead of accumulating duplicates.

use std::sync::Arc;

use chrono::Utc;
use log::debug;
use sqlx::SqlitePool;

use crate::error_handling::StoreError;
use crate::resolver::Location;

use super::models::GeoRecord;

/// Persistence for [`GeoRecord`]s over a shared SQLite pool.
pub struct GeoRecordStore {
    pool: Arc<SqlitePool>,
}

impl GeoRecordStore {
    /// Creates a store over an initialized pool (see `storage::init_db_pool`).
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        GeoRecordStore { pool }
    }

    /// The underlying pool, for callers that manage their own queries in tests.
    pub fn pool(&self) -> &SqlitePool {
        self.pool.as_ref()
    }

    /// Inserts or updates the record for `(user_id, location.ip)`.
    ///
    /// On first sight the row is created with `visit_count = 1`; afterwards
    /// the mutable location fields are refreshed, `last_seen` is bumped, and
    /// `visit_count` increments. Returns the row as stored.
    pub async fn upsert(&self, user_id: &str, location: &Location) -> Result<GeoRecord, StoreError> {
        let now = Utc::now().timestamp_millis();
        let record = sqlx::query_as::<_, GeoRecord>(
            "INSERT INTO geo_records (
                user_id, ip, country, city, region, latitude, longitude,
                timezone, organization, is_mobile, is_proxy, is_vpn,
                first_seen, last_seen, visit_count
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1)
            ON CONFLICT(user_id, ip) DO UPDATE SET
                country = excluded.country,
                city = excluded.city,
                region = excluded.region,
                latitude = excluded.latitude,
                longitude = excluded.longitude,
                timezone = excluded.timezone,
                organization = excluded.organization,
                is_mobile = excluded.is_mobile,
                is_proxy = excluded.is_proxy,
                is_vpn = excluded.is_vpn,
                last_seen = excluded.last_seen,
                visit_count = geo_records.visit_count + 1
            RETURNING *",
        )
        .bind(user_id)
        .bind(&location.ip)
        .bind(&location.country)
        .bind(&location.city)
        .bind(&location.region)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(&location.timezone)
        .bind(&location.organization)
        .bind(location.is_mobile)
        .bind(location.is_proxy)
        .bind(location.is_vpn)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool.as_ref())
        .await?;

        debug!(
            "upserted geo record for user {} from {} (visit {})",
            record.user_id, record.ip, record.visit_count
        );
        Ok(record)
    }

    /// The most recently seen records across all users, newest first.
    /// Feeds the dashboard activity feed.
    pub async fn recent(&self, limit: i64) -> Result<Vec<GeoRecord>, StoreError> {
        let records = sqlx::query_as::<_, GeoRecord>(
            "SELECT * FROM geo_records ORDER BY last_seen DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(records)
    }

    /// Every record for one user, newest first.
    pub async fn by_user(&self, user_id: &str) -> Result<Vec<GeoRecord>, StoreError> {
        let records = sqlx::query_as::<_, GeoRecord>(
            "SELECT * FROM geo_records WHERE user_id = ? ORDER BY last_seen DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(records)
    }

    /// A user's most recent `limit` records in chronological order, ready
    /// for pairwise travel scans.
    pub async fn user_history(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<GeoRecord>, StoreError> {
        let records = sqlx::query_as::<_, GeoRecord>(
            "SELECT * FROM (
                SELECT * FROM geo_records WHERE user_id = ?
                ORDER BY last_seen DESC LIMIT ?
            ) ORDER BY last_seen ASC",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(records)
    }

    /// The users with the most recent activity, bounding how many accounts a
    /// detection pass scans.
    pub async fn recently_active_users(&self, limit: i64) -> Result<Vec<String>, StoreError> {
        let users = sqlx::query_scalar::<_, String>(
            "SELECT user_id FROM geo_records
             GROUP BY user_id ORDER BY MAX(last_seen) DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(users)
    }

    /// Every record in the store, for the analytics aggregator.
    pub async fn all(&self) -> Result<Vec<GeoRecord>, StoreError> {
        let records =
            sqlx::query_as::<_, GeoRecord>("SELECT * FROM geo_records ORDER BY last_seen DESC")
                .fetch_all(self.pool.as_ref())
                .await?;
        Ok(records)
    }
}
