//! Impossible-travel detection.
//!
//! Walks each user's history chronologically and computes the travel speed
//! implied by consecutive sightings. Speeds beyond sustained commercial air
//! travel mean the account was used from two places at once.

use chrono::Utc;
use log::debug;

use crate::config::constants::NEAR_ZERO_ELAPSED_HOURS;
use crate::config::DetectionThresholds;
use crate::error_handling::StoreError;
use crate::storage::{GeoRecord, GeoRecordStore};

use super::distance::haversine_km;
use super::types::{sort_by_risk, Alert, AlertEvidence, AlertKind, AlertSubject, RiskLevel};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;
const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Scans recently-active users and flags consecutive sighting pairs whose
/// implied velocity exceeds the plausible maximum.
///
/// Results are sorted most severe first.
pub async fn detect_impossible_travel(
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
        alerts.extend(evaluate_history(&user_id, &history, thresholds, computed_at));
    }

    sort_by_risk(&mut alerts);
    debug!("impossible-travel pass raised {} alert(s)", alerts.len());
    Ok(alerts)
}

/// Evaluates one user's chronologically-ordered history pairwise.
///
/// Rules, in precedence order:
/// 1. A record without coordinates is invisible to this detector.
/// 2. Pairs closer than the distance floor are skipped outright, whatever
///    their timing.
/// 3. A pair above the floor with near-zero elapsed time is concurrent use
///    from two distant places: `Critical`, with the velocity computed
///    against the epsilon floor so the figure stays finite.
/// 4. Otherwise the pair is flagged at `High` when the implied velocity
///    exceeds the threshold.
pub(crate) fn evaluate_history(
    user_id: &str,
    records: &[GeoRecord],
    thresholds: &DetectionThresholds,
    computed_at: i64,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    let located: Vec<&GeoRecord> = records
        .iter()
        .filter(|r| r.latitude.is_some() && r.longitude.is_some())
        .collect();

    for pair in located.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        let (lat1, lon1) = (prev.latitude.unwrap_or(0.0), prev.longitude.unwrap_or(0.0));
        let (lat2, lon2) = (curr.latitude.unwrap_or(0.0), curr.longitude.unwrap_or(0.0));

        let distance_km = haversine_km(lat1, lon1, lat2, lon2);
        if distance_km <= thresholds.min_travel_distance_km {
            continue;
        }

        let elapsed_millis = curr.last_seen - prev.last_seen;
        let elapsed_hours = elapsed_millis as f64 / MILLIS_PER_HOUR;

        let (risk_level, velocity_kmh) = if elapsed_hours <= NEAR_ZERO_ELAPSED_HOURS {
            (RiskLevel::Critical, distance_km / NEAR_ZERO_ELAPSED_HOURS)
        } else {
            let velocity = distance_km / elapsed_hours;
            if velocity <= thresholds.max_velocity_kmh {
                continue;
            }
            (RiskLevel::High, velocity)
        };

        let elapsed_minutes = (elapsed_millis.max(0) as f64 / MILLIS_PER_MINUTE).round() as i64;
        alerts.push(Alert {
            kind: AlertKind::ImpossibleTravel,
            risk_level,
            subject: AlertSubject::new(user_id),
            evidence: AlertEvidence::ImpossibleTravel {
                from: location_label(prev),
                to: location_label(curr),
                distance_km: distance_km.round(),
                elapsed_minutes,
                velocity_kmh: velocity_kmh.round(),
            },
            computed_at,
        });
    }

    alerts
}

fn location_label(record: &GeoRecord) -> String {
    format!("{}, {}", record.city, record.country)
}
