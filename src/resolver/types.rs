//! Resolver data structures.
//!
//! The canonical [`Location`] shape every provider payload is normalized
//! into, and the [`GeoProvider`] tag recording which provider produced it.

use serde::{Deserialize, Serialize};

/// Which upstream provider a location came from.
///
/// Provider-specific field names never leave the resolver; this tag is the
/// only provider detail that does, so logs and telemetry can attribute
/// failures and stale data to the right upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeoProvider {
    /// The preferred provider, tried first for every lookup.
    Primary,
    /// The fallback provider, tried exactly once when the primary fails.
    Secondary,
}

impl GeoProvider {
    /// Returns a lowercase label for log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            GeoProvider::Primary => "primary",
            GeoProvider::Secondary => "secondary",
        }
    }
}

impl std::fmt::Display for GeoProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved network location, normalized across providers.
///
/// String fields hold `"unknown"` rather than an empty value when the
/// provider had nothing; latitude/longitude are `None` when absent, which
/// excludes the record from travel analysis downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// The IP address this location was resolved from.
    pub ip: String,
    /// City name.
    pub city: String,
    /// Region or subdivision name.
    pub region: String,
    /// Country name.
    pub country: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: String,
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
    /// IANA timezone identifier.
    pub timezone: String,
    /// Owning organization or ISP.
    pub organization: String,
    /// Best-effort mobile-network flag from the provider.
    pub is_mobile: bool,
    /// Best-effort proxy flag from the provider.
    pub is_proxy: bool,
    /// Best-effort VPN/hosting flag from the provider.
    pub is_vpn: bool,
    /// Flag-icon URL constructed from the country code, when one is known.
    pub flag_url: Option<String>,
    /// Which provider produced this result.
    pub source: GeoProvider,
}
