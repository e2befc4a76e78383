// storage/models.rs
// Database models and types

use serde::Serialize;

/// One persisted sighting of an identity from a network location.
///
/// # Database Schema
///
/// Maps directly to the `geo_records` table: exactly one row per
/// `(user_id, ip)` pair, enforced by a unique index. Timestamps are stored
/// as milliseconds since Unix epoch. Location strings that the provider had
/// no value for hold `"unknown"`; latitude/longitude are `NULL` instead,
/// which excludes the row from travel-speed analysis.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct GeoRecord {
    /// Row id.
    pub id: i64,
    /// Opaque identity reference, owned by the identity subsystem.
    pub user_id: String,
    /// The IP this identity was seen from; immutable once created.
    pub ip: String,
    /// Country name.
    pub country: String,
    /// City name.
    pub city: String,
    /// Region or subdivision name.
    pub region: String,
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
    /// IANA timezone identifier.
    pub timezone: String,
    /// Owning organization or ISP.
    pub organization: String,
    /// Best-effort mobile-network flag.
    pub is_mobile: bool,
    /// Best-effort proxy flag.
    pub is_proxy: bool,
    /// Best-effort VPN/hosting flag.
    pub is_vpn: bool,
    /// When this (user, ip) pair was first seen, in epoch milliseconds.
    pub first_seen: i64,
    /// When this (user, ip) pair was last seen, in epoch milliseconds.
    pub last_seen: i64,
    /// How many times this pair has been seen; increments on every upsert.
    pub visit_count: i64,
}
