//! Anomaly detectors.
//!
//! Three independent, read-only analyzers over the geo record store:
//! shared-account, impossible-travel, and anonymizing-network (extension
//! point). Each is a stateless, idempotent pass whose alerts are pure
//! functions of the record window it reads, so they can run on demand, on a
//! timer, or concurrently with each other.

mod anonymizing_network;
mod distance;
mod impossible_travel;
mod shared_account;
mod types;

use crate::config::DetectionThresholds;
use crate::error_handling::StoreError;
use crate::storage::GeoRecordStore;

// Re-export public API
pub use anonymizing_network::detect_anonymizing_networks;
pub use impossible_travel::detect_impossible_travel;
pub use shared_account::detect_shared_accounts;
pub use types::{Alert, AlertEvidence, AlertKind, AlertSubject, RiskLevel};

/// Runs all three detectors concurrently and merges their alerts, most
/// severe first.
pub async fn run_detectors(
    store: &GeoRecordStore,
    thresholds: &DetectionThresholds,
) -> Result<Vec<Alert>, StoreError> {
    let (shared, travel, anonymizing) = tokio::join!(
        detect_shared_accounts(store, thresholds),
        detect_impossible_travel(store, thresholds),
        detect_anonymizing_networks(store, thresholds),
    );

    let mut alerts = shared?;
    alerts.extend(travel?);
    alerts.extend(anonymizing?);
    types::sort_by_risk(&mut alerts);
    Ok(alerts)
}
