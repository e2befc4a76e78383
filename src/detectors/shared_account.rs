//! Shared-account detection.
//!
//! A threshold heuristic over distinct networks: one identity seen from too
//! many IPs, or from too many countries, within its recent history suggests
//! the credentials are being passed around.

use std::collections::HashSet;

use chrono::Utc;
use log::debug;

use crate::config::DetectionThresholds;
use crate::error_handling::StoreError;
use crate::storage::{GeoRecord, GeoRecordStore};

use super::types::{sort_by_risk, Alert, AlertEvidence, AlertKind, AlertSubject, RiskLevel};

/// Scans recently-active users and flags those whose recent history spans
/// more distinct IPs or countries than the thresholds allow.
///
/// Results are sorted most severe first.
pub async fn detect_shared_accounts(
    store: &GeoRecordStore,
    thresholds: &DetectionThresholds,
) -> Result<Vec<Alert>, StoreError> {
    let users = store
        .recently_active_users(thresholds.active_user_scan_limit)
        .await?;
    let computed_at = Utc::now().timestamp_millis();

    let mut alerts = Vec::new();
    for user_id in users {
        let history = store
            .user_history(&user_id, thresholds.per_user_history_limit)
            .await?;
        if let Some(alert) = evaluate_user(&user_id, &history, thresholds, computed_at) {
            alerts.push(alert);
        }
    }

    sort_by_risk(&mut alerts);
    debug!("shared-account pass raised {} alert(s)", alerts.len());
    Ok(alerts)
}

/// Evaluates one user's history against the thresholds.
///
/// Exceeding the country threshold marks the account `Critical` (multiple
/// countries is far harder to explain benignly than multiple IPs); exceeding
/// only the IP threshold marks it `High`.
pub(crate) fn evaluate_user(
    user_id: &str,
    records: &[GeoRecord],
    thresholds: &DetectionThresholds,
    computed_at: i64,
) -> Option<Alert> {
    if records.is_empty() {
        return None;
    }

    let ip_count = records
        .iter()
        .map(|r| r.ip.as_str())
        .collect::<HashSet<_>>()
        .len();
    let country_count = records
        .iter()
        .map(|r| r.country.as_str())
        .collect::<HashSet<_>>()
        .len();

    let too_many_ips = ip_count > thresholds.max_distinct_ips;
    let too_many_countries = country_count > thresholds.max_distinct_countries;
    if !too_many_ips && !too_many_countries {
        return None;
    }

    let risk_level = if too_many_countries {
        RiskLevel::Critical
    } else {
        RiskLevel::High
    };

    Some(Alert {
        kind: AlertKind::SharedAccount,
        risk_level,
        subject: AlertSubject::new(user_id),
        evidence: AlertEvidence::SharedAccount {
            ip_count,
            country_count,
        },
        computed_at,
    })
}
