//! geoguard library: geolocation-based session security
//!
//! This library resolves user IPs to network locations (with caching, rate
//! limiting, and provider fallback), persists one location-history record per
//! (user, IP) pair, and analyzes that history for account sharing,
//! physically-impossible travel, and anonymizing-network usage.
//!
//! # Example
//!
//! ```no_run
//! use geoguard::{GeoGuard, GuardConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let guard = GeoGuard::new(GuardConfig::default()).await?;
//!
//! // On a session event: resolve the client IP and record the sighting.
//! let record = guard.track_session("user-42", Some("203.0.113.7")).await?;
//! println!("seen from {}, {} ({} visits)", record.city, record.country, record.visit_count);
//!
//! // On a dashboard refresh: pull alerts and the analytics summary.
//! let alerts = guard.run_detectors().await?;
//! let summary = guard.summarize().await?;
//! println!("{} alert(s), {} countries", alerts.len(), summary.country_count);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

mod analytics;
pub mod config;
mod detectors;
mod error_handling;
pub mod initialization;
mod monitor;
mod resolver;
mod storage;

// Re-export public API
pub use analytics::{summarize_records, CountryShare, GeoSummary, TimezoneActivity};
pub use config::{DetectionThresholds, GuardConfig, LogFormat, LogLevel, ResolverConfig};
pub use detectors::{Alert, AlertEvidence, AlertKind, AlertSubject, RiskLevel};
pub use error_handling::{InitializationError, ResolveError, StoreError, TrackError};
pub use guard::GeoGuard;
pub use monitor::{start_monitor, MonitorConfig};
pub use resolver::{GeoProvider, GeoResolver, Location};
pub use storage::{init_db_pool, run_migrations, GeoRecord, GeoRecordStore};

// Internal guard module (ties the resolver, store, and detectors together)
mod guard {
    use anyhow::{Context, Result};
    use log::{debug, info, warn};

    use crate::analytics::{self, GeoSummary};
    use crate::config::{DetectionThresholds, GuardConfig};
    use crate::detectors::{self, Alert};
    use crate::error_handling::{StoreError, TrackError};
    use crate::resolver::GeoResolver;
    use crate::storage::{init_db_pool, run_migrations, GeoRecord, GeoRecordStore};

    /// The session-security facade: owns the resolver, the record store, and
    /// the detection thresholds.
    ///
    /// Construct one at process start and share it by reference. The
    /// resolver's cache and rate gate live inside it, so all callers get the
    /// same cache hits and the same global request spacing.
    pub struct GeoGuard {
        resolver: GeoResolver,
        store: GeoRecordStore,
        thresholds: DetectionThresholds,
    }

    impl GeoGuard {
        /// Creates a guard from configuration: opens (or creates) the
        /// database, applies migrations, and builds the resolver.
        ///
        /// # Errors
        ///
        /// Returns an error if the database cannot be opened or migrated, or
        /// if the HTTP client cannot be built.
        pub async fn new(config: GuardConfig) -> Result<Self> {
            let pool = init_db_pool(&config.db_path)
                .await
                .context("Failed to initialize database pool")?;
            run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            let resolver =
                GeoResolver::new(config.resolver).context("Failed to initialize geo resolver")?;

            Ok(GeoGuard {
                resolver,
                store: GeoRecordStore::new(pool),
                thresholds: config.thresholds,
            })
        }

        /// Assembles a guard from already-built parts. Useful when the
        /// embedding application manages the pool itself.
        pub fn from_parts(
            resolver: GeoResolver,
            store: GeoRecordStore,
            thresholds: DetectionThresholds,
        ) -> Self {
            GeoGuard {
                resolver,
                store,
                thresholds,
            }
        }

        /// Resolves a session's location and records the sighting.
        ///
        /// With `ip == None` the caller's own public IP is discovered first.
        /// The flow is best-effort: whichever stage fails first
        /// short-circuits with a typed error, and nothing is written on
        /// failure.
        pub async fn track_session(
            &self,
            user_id: &str,
            ip: Option<&str>,
        ) -> Result<GeoRecord, TrackError> {
            let location = match self.resolver.resolve(ip).await {
                Ok(location) => location,
                Err(e) => {
                    warn!(
                        "session tracking for {user_id} failed at resolution ({}): {e}",
                        e.kind()
                    );
                    return Err(e.into());
                }
            };

            let record = self.store.upsert(user_id, &location).await?;
            info!(
                "tracked session for {} from {} ({}, {}), visit {}",
                user_id, record.ip, record.city, record.country, record.visit_count
            );
            Ok(record)
        }

        /// Flags users whose recent history spans too many IPs or countries.
        pub async fn detect_shared_accounts(&self) -> Result<Vec<Alert>, StoreError> {
            detectors::detect_shared_accounts(&self.store, &self.thresholds).await
        }

        /// Flags consecutive sightings implying impossible travel speeds.
        pub async fn detect_impossible_travel(&self) -> Result<Vec<Alert>, StoreError> {
            detectors::detect_impossible_travel(&self.store, &self.thresholds).await
        }

        /// Flags access through anonymizing networks (extension point,
        /// currently raises nothing).
        pub async fn detect_anonymizing_networks(&self) -> Result<Vec<Alert>, StoreError> {
            detectors::detect_anonymizing_networks(&self.store, &self.thresholds).await
        }

        /// Runs all detectors concurrently; alerts come back most severe
        /// first.
        pub async fn run_detectors(&self) -> Result<Vec<Alert>, StoreError> {
            detectors::run_detectors(&self.store, &self.thresholds).await
        }

        /// Computes the analytics summary over the whole record history.
        pub async fn summarize(&self) -> Result<GeoSummary, StoreError> {
            analytics::summarize(&self.store).await
        }

        /// Empties the resolver's result cache.
        pub async fn clear_resolver_cache(&self) {
            self.resolver.clear_cache().await;
            debug!("resolver cache cleared on request");
        }

        /// Read access to the record store, for the dashboard activity feed.
        pub fn store(&self) -> &GeoRecordStore {
            &self.store
        }

        /// The detection thresholds this guard runs with.
        pub fn thresholds(&self) -> &DetectionThresholds {
            &self.thresholds
        }
    }
}
