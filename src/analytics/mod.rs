//! Location analytics.
//!
//! Descriptive statistics over the geo record store for the administrator
//! dashboard: how many countries and cities the user base spans, which
//! countries dominate, and which timezones are active. Read-only, like the
//! detectors.

use std::collections::{HashMap, HashSet};

use log::debug;
use serde::Serialize;

use crate::config::constants::UNKNOWN_FIELD;
use crate::error_handling::StoreError;
use crate::storage::{GeoRecord, GeoRecordStore};

/// One country's share of the recorded activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryShare {
    /// Country name.
    pub country: String,
    /// Distinct users seen from this country.
    pub user_count: usize,
    /// This country's share of all records, in percent. A ratio of events,
    /// not of people: a user with records in two countries contributes to
    /// both shares.
    pub percentage_of_total: f64,
}

/// One timezone's recorded activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimezoneActivity {
    /// IANA timezone identifier, or `"Unknown"` when the provider had none.
    pub timezone: String,
    /// Records seen in this timezone.
    pub active_count: usize,
}

/// Summary statistics over the whole record set.
#[derive(Debug, Clone, Serialize)]
pub struct GeoSummary {
    /// Total records in the store.
    pub total_records: usize,
    /// Distinct country values seen.
    pub country_count: usize,
    /// Distinct city values seen.
    pub city_count: usize,
    /// Per-country activity shares, largest first.
    pub per_country: Vec<CountryShare>,
    /// Per-timezone activity, busiest first.
    pub per_timezone: Vec<TimezoneActivity>,
}

/// Computes the summary over everything currently in the store.
pub async fn summarize(store: &GeoRecordStore) -> Result<GeoSummary, StoreError> {
    let records = store.all().await?;
    let summary = summarize_records(&records);
    debug!(
        "analytics pass: {} records across {} countries",
        summary.total_records, summary.country_count
    );
    Ok(summary)
}

/// Computes the summary over a record slice. With no records every count is
/// zero and both distributions are empty; never an error.
pub fn summarize_records(records: &[GeoRecord]) -> GeoSummary {
    let total_records = records.len();

    let mut country_records: HashMap<&str, usize> = HashMap::new();
    let mut country_users: HashMap<&str, HashSet<&str>> = HashMap::new();
    let mut timezone_records: HashMap<&str, usize> = HashMap::new();
    let mut cities: HashSet<&str> = HashSet::new();

    for record in records {
        *country_records.entry(record.country.as_str()).or_default() += 1;
        country_users
            .entry(record.country.as_str())
            .or_default()
            .insert(record.user_id.as_str());
        cities.insert(record.city.as_str());

        let timezone = match record.timezone.as_str() {
            "" | UNKNOWN_FIELD => "Unknown",
            tz => tz,
        };
        *timezone_records.entry(timezone).or_default() += 1;
    }

    let mut per_country: Vec<CountryShare> = country_records
        .iter()
        .map(|(&country, &record_count)| CountryShare {
            country: country.to_string(),
            user_count: country_users.get(country).map_or(0, HashSet::len),
            percentage_of_total: round2(record_count as f64 * 100.0 / total_records as f64),
        })
        .collect();
    per_country.sort_by(|a, b| {
        b.percentage_of_total
            .partial_cmp(&a.percentage_of_total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.country.cmp(&b.country))
    });

    let mut per_timezone: Vec<TimezoneActivity> = timezone_records
        .into_iter()
        .map(|(timezone, active_count)| TimezoneActivity {
            timezone: timezone.to_string(),
            active_count,
        })
        .collect();
    per_timezone.sort_by(|a, b| {
        b.active_count
            .cmp(&a.active_count)
            .then_with(|| a.timezone.cmp(&b.timezone))
    });

    GeoSummary {
        total_records,
        country_count: country_records.len(),
        city_count: cities.len(),
        per_country,
        per_timezone,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
