//! Error type definitions.
//!
//! This module defines all error types used throughout the crate. Each
//! failure domain (initialization, resolution, persistence, tracking) gets
//! its own enum so callers can match on exactly the failures they can
//! handle.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

use crate::resolver::GeoProvider;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for geolocation resolution.
///
/// Every expected failure mode of the resolver maps onto one of these
/// variants; the resolver never panics or raises anything untyped. The
/// variant distinguishes transport failures from data-quality failures so
/// telemetry can tell a dead provider apart from a lying one.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Transport or timeout failure reaching a provider.
    #[error("network error reaching {provider} geo provider: {source}")]
    Network {
        /// Which provider the request was aimed at.
        provider: GeoProvider,
        /// The underlying transport error.
        source: ReqwestError,
    },

    /// The provider answered HTTP 429; the caller falls back rather than retrying.
    #[error("{provider} geo provider quota exceeded (HTTP 429)")]
    QuotaExceeded {
        /// Which provider reported quota exhaustion.
        provider: GeoProvider,
    },

    /// The provider responded, but with an error flag, an unexpected status,
    /// or a payload missing required fields.
    #[error("{provider} geo provider returned unusable data: {reason}")]
    ProviderData {
        /// Which provider produced the unusable payload.
        provider: GeoProvider,
        /// What was wrong with it.
        reason: String,
    },

    /// Own-IP discovery failed on both the primary and fallback endpoints.
    #[error("self IP discovery failed: {0}")]
    SelfIpDiscovery(String),
}

impl ResolveError {
    /// Short machine-friendly label for logs and telemetry.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::Network { .. } => "network",
            ResolveError::QuotaExceeded { .. } => "quota_exceeded",
            ResolveError::ProviderData { .. } => "provider_data",
            ResolveError::SelfIpDiscovery(_) => "self_ip_discovery",
        }
    }
}

/// Error types for record-store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

/// Error type for the session-tracking flow.
///
/// Tracking is best-effort: whichever stage fails first short-circuits the
/// flow, and no partial GeoRecord is written.
#[derive(Error, Debug)]
pub enum TrackError {
    /// The IP could not be resolved to a location.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The record store rejected the upsert.
    #[error(transparent)]
    Store(#[from] StoreError),
}
