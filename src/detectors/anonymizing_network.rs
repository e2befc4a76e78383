//! Anonymizing-network detection.
//!
//! Extension point. The provider flags (`is_proxy`, `is_vpn`) are already
//! persisted on every record, and `AlertEvidence::AnonymizingNetwork`
//! exists; what is missing is intelligence good enough to act on. The
//! free-tier provider flags alone produce too many false positives to page
//! anyone over. Until a datacenter-ASN feed is wired in, this pass raises
//! nothing.

use log::debug;

use crate::config::DetectionThresholds;
use crate::error_handling::StoreError;
use crate::storage::GeoRecordStore;

use super::types::Alert;

/// Scans for access through anonymizing networks. Currently a no-op that
/// returns an empty, correctly-typed result.
pub async fn detect_anonymizing_networks(
    _store: &GeoRecordStore,
    _thresholds: &DetectionThresholds,
) -> Result<Vec<Alert>, StoreError> {
    debug!("anonymizing-network pass raised 0 alert(s)");
    Ok(Vec::new())
}
