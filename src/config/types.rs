//! Configuration types.
//!
//! This module defines the structs used to configure the guard, the
//! resolver, and the detection thresholds, along with the logging enums.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::constants::{
    ACTIVE_USER_SCAN_LIMIT, DB_PATH, MAX_DISTINCT_COUNTRIES, MAX_DISTINCT_IPS,
    MAX_PLAUSIBLE_VELOCITY_KMH, MIN_REQUEST_INTERVAL, MIN_TRAVEL_DISTANCE_KM,
    PER_USER_HISTORY_LIMIT, PRIMARY_GEO_ENDPOINT, PROVIDER_TIMEOUT_SECS, SECONDARY_GEO_ENDPOINT,
    SELF_IP_ENDPOINT, SELF_IP_FALLBACK_ENDPOINT,
};

/// Logging level for the library.
///
/// Controls the verbosity of log output, from most restrictive (Error) to
/// most verbose (Trace).
#[derive(Clone, Debug)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Configuration for the geo resolver: provider endpoints, the request
/// timeout, and the outbound rate-limit interval.
///
/// Endpoints are full URLs including the scheme, so whether a provider is
/// reached over HTTP or HTTPS is a deployment decision, not a hard-coded one.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Primary geolocation provider base URL (ip-api style JSON)
    pub primary_endpoint: String,

    /// Secondary geolocation provider base URL (ipwho style JSON),
    /// tried exactly once when the primary fails
    pub secondary_endpoint: String,

    /// Plain-text "what is my IP" endpoint
    pub self_ip_endpoint: String,

    /// Fallback "what is my IP" endpoint
    pub self_ip_fallback_endpoint: String,

    /// Per-request timeout in seconds for all provider calls
    pub request_timeout_secs: u64,

    /// Minimum spacing between outbound provider requests, enforced
    /// globally across concurrent callers
    pub min_request_interval: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            primary_endpoint: PRIMARY_GEO_ENDPOINT.to_string(),
            secondary_endpoint: SECONDARY_GEO_ENDPOINT.to_string(),
            self_ip_endpoint: SELF_IP_ENDPOINT.to_string(),
            self_ip_fallback_endpoint: SELF_IP_FALLBACK_ENDPOINT.to_string(),
            request_timeout_secs: PROVIDER_TIMEOUT_SECS,
            min_request_interval: MIN_REQUEST_INTERVAL,
        }
    }
}

/// Detection thresholds and scan bounds for the anomaly detectors.
///
/// These are threshold heuristics, not a statistical model; the defaults
/// come from `config::constants` and are meant to be tuned per deployment.
#[derive(Debug, Clone)]
pub struct DetectionThresholds {
    /// Flag a user seen from more than this many distinct IPs
    pub max_distinct_ips: usize,

    /// Flag a user seen from more than this many distinct countries
    pub max_distinct_countries: usize,

    /// Flag consecutive records whose implied travel speed exceeds this (km/h)
    pub max_velocity_kmh: f64,

    /// Ignore consecutive records closer together than this (km)
    pub min_travel_distance_km: f64,

    /// How many recently-active users one detection pass scans
    pub active_user_scan_limit: i64,

    /// How many of a user's most recent records one detection pass considers
    pub per_user_history_limit: i64,
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            max_distinct_ips: MAX_DISTINCT_IPS,
            max_distinct_countries: MAX_DISTINCT_COUNTRIES,
            max_velocity_kmh: MAX_PLAUSIBLE_VELOCITY_KMH,
            min_travel_distance_km: MIN_TRAVEL_DISTANCE_KM,
            active_user_scan_limit: ACTIVE_USER_SCAN_LIMIT,
            per_user_history_limit: PER_USER_HISTORY_LIMIT,
        }
    }
}

/// Top-level configuration for [`crate::GeoGuard`].
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Database path (SQLite file)
    pub db_path: PathBuf,

    /// Resolver configuration (endpoints, timeout, rate-limit interval)
    pub resolver: ResolverConfig,

    /// Detection thresholds
    pub thresholds: DetectionThresholds,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DB_PATH),
            resolver: ResolverConfig::default(),
            thresholds: DetectionThresholds::default(),
        }
    }
}
