//! Alert type definitions.
//!
//! Alerts are computed on demand from the record history and never
//! persisted; recomputing over the same records yields the same alerts.

use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;

/// What a detector found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIterMacro)]
pub enum AlertKind {
    /// One identity used from an implausible number of networks or countries.
    SharedAccount,
    /// Consecutive sightings whose implied travel speed is not physically possible.
    ImpossibleTravel,
    /// Access through an anonymizing network (extension point, no detections yet).
    AnonymizingNetwork,
}

impl AlertKind {
    /// Returns a human-readable label for the alert kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::SharedAccount => "Shared account",
            AlertKind::ImpossibleTravel => "Impossible travel",
            AlertKind::AnonymizingNetwork => "Anonymizing network",
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of an alert. Totally ordered so consumers can sort and filter;
/// `Critical` is the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, EnumIterMacro)]
pub enum RiskLevel {
    /// Worth recording, not worth waking anyone.
    Low,
    /// Unusual; review when convenient.
    Medium,
    /// Likely abuse; review soon.
    High,
    /// Almost certainly abuse; review now.
    Critical,
}

impl RiskLevel {
    /// Returns a human-readable label for the risk level.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who an alert is about.
///
/// Only `user_id` is known to this core; the identity subsystem may fill in
/// display fields before the alert reaches the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertSubject {
    /// Opaque identity reference.
    pub user_id: String,
    /// Denormalized display name, supplied by the identity subsystem.
    pub display_name: Option<String>,
}

impl AlertSubject {
    /// Creates a subject for `user_id` with no display fields.
    pub fn new(user_id: &str) -> Self {
        AlertSubject {
            user_id: user_id.to_string(),
            display_name: None,
        }
    }
}

/// Kind-specific alert details.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlertEvidence {
    /// Distinct-network counts behind a shared-account flag.
    SharedAccount {
        /// Distinct IPs the user was seen from.
        ip_count: usize,
        /// Distinct countries the user was seen from.
        country_count: usize,
    },
    /// The record pair behind an impossible-travel flag.
    ImpossibleTravel {
        /// "City, Country" label of the earlier sighting.
        from: String,
        /// "City, Country" label of the later sighting.
        to: String,
        /// Great-circle distance between the two, rounded to whole km.
        distance_km: f64,
        /// Time between the two sightings, rounded to whole minutes.
        elapsed_minutes: i64,
        /// Implied travel speed, rounded to whole km/h.
        velocity_kmh: f64,
    },
    /// Indicators behind an anonymizing-network flag.
    AnonymizingNetwork {
        /// The IP the indicator applies to.
        ip: String,
        /// What marked the network as anonymizing.
        indicator: String,
    },
}

/// A detection result.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    /// What was detected.
    pub kind: AlertKind,
    /// How severe it is.
    pub risk_level: RiskLevel,
    /// Who it is about.
    pub subject: AlertSubject,
    /// Kind-specific details.
    pub evidence: AlertEvidence,
    /// When the analysis ran, in epoch milliseconds. This is the time of
    /// computation, not of the underlying events.
    pub computed_at: i64,
}

/// Orders alerts most severe first, the order the dashboard wants them in.
pub(crate) fn sort_by_risk(alerts: &mut [Alert]) {
    alerts.sort_by(|a, b| b.risk_level.cmp(&a.risk_level));
}
