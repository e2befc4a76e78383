//! Provider payload shapes and adapters.
//!
//! Each upstream provider returns its own JSON schema. The shapes are kept
//! as one variant per provider in [`ProviderPayload`], and only the adapter
//! in this module turns them into the canonical [`Location`]; provider field
//! names never leak past the resolver boundary.

use serde::Deserialize;

use crate::config::constants::{FLAG_ICON_BASE, UNKNOWN_FIELD};
use crate::error_handling::ResolveError;

use super::types::{GeoProvider, Location};

/// Primary provider payload (ip-api style).
///
/// Errors are flagged in-band: `status` is `"fail"` and `message` carries
/// the reason, with an HTTP 200 around it.
#[derive(Debug, Deserialize)]
pub(crate) struct PrimaryGeoResponse {
    status: Option<String>,
    message: Option<String>,
    country: Option<String>,
    #[serde(rename = "countryCode")]
    country_code: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
    city: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    timezone: Option<String>,
    isp: Option<String>,
    org: Option<String>,
    #[serde(default)]
    mobile: bool,
    #[serde(default)]
    proxy: bool,
    #[serde(default)]
    hosting: bool,
}

/// Secondary provider payload (ipwho style).
#[derive(Debug, Deserialize)]
pub(crate) struct SecondaryGeoResponse {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    country: Option<String>,
    country_code: Option<String>,
    region: Option<String>,
    city: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    timezone: Option<SecondaryTimezone>,
    connection: Option<SecondaryConnection>,
    security: Option<SecondarySecurity>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SecondaryTimezone {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SecondaryConnection {
    org: Option<String>,
    isp: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SecondarySecurity {
    #[serde(default)]
    proxy: bool,
    #[serde(default)]
    vpn: bool,
}

/// A raw provider response, tagged by which provider produced it.
pub(crate) enum ProviderPayload {
    Primary(PrimaryGeoResponse),
    Secondary(SecondaryGeoResponse),
}

impl ProviderPayload {
    /// Normalizes the payload into a [`Location`] for `ip`.
    ///
    /// An error-flagged response or a payload missing the country name or
    /// city is a data-quality failure; the caller treats it like any other
    /// provider failure and falls back.
    pub(crate) fn into_location(self, ip: &str) -> Result<Location, ResolveError> {
        match self {
            ProviderPayload::Primary(payload) => {
                if payload.status.as_deref() != Some("success") {
                    return Err(ResolveError::ProviderData {
                        provider: GeoProvider::Primary,
                        reason: payload
                            .message
                            .unwrap_or_else(|| "error-flagged response".to_string()),
                    });
                }
                let (country, city) =
                    required_fields(GeoProvider::Primary, payload.country, payload.city)?;
                let country_code = normalize(payload.country_code);
                Ok(Location {
                    ip: ip.to_string(),
                    city,
                    region: normalize(payload.region_name),
                    country,
                    flag_url: flag_icon_url(&country_code),
                    country_code,
                    latitude: payload.lat,
                    longitude: payload.lon,
                    timezone: normalize(payload.timezone),
                    organization: normalize(payload.org.or(payload.isp)),
                    is_mobile: payload.mobile,
                    is_proxy: payload.proxy,
                    is_vpn: payload.hosting,
                    source: GeoProvider::Primary,
                })
            }
            ProviderPayload::Secondary(payload) => {
                if !payload.success {
                    return Err(ResolveError::ProviderData {
                        provider: GeoProvider::Secondary,
                        reason: payload
                            .message
                            .unwrap_or_else(|| "error-flagged response".to_string()),
                    });
                }
                let (country, city) =
                    required_fields(GeoProvider::Secondary, payload.country, payload.city)?;
                let country_code = normalize(payload.country_code);
                let security = payload.security.unwrap_or_default();
                let organization = payload
                    .connection
                    .and_then(|c| c.org.or(c.isp));
                Ok(Location {
                    ip: ip.to_string(),
                    city,
                    region: normalize(payload.region),
                    country,
                    flag_url: flag_icon_url(&country_code),
                    country_code,
                    latitude: payload.latitude,
                    longitude: payload.longitude,
                    timezone: normalize(payload.timezone.and_then(|t| t.id)),
                    organization: normalize(organization),
                    is_mobile: false,
                    is_proxy: security.proxy,
                    is_vpn: security.vpn,
                    source: GeoProvider::Secondary,
                })
            }
        }
    }
}

/// Both the country name and the city must be present; anything less is a
/// data-quality failure rather than a partially-filled location.
fn required_fields(
    provider: GeoProvider,
    country: Option<String>,
    city: Option<String>,
) -> Result<(String, String), ResolveError> {
    match (non_empty(country), non_empty(city)) {
        (Some(country), Some(city)) => Ok((country, city)),
        (None, _) => Err(ResolveError::ProviderData {
            provider,
            reason: "missing country name".to_string(),
        }),
        (_, None) => Err(ResolveError::ProviderData {
            provider,
            reason: "missing city".to_string(),
        }),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn normalize(value: Option<String>) -> String {
    non_empty(value).unwrap_or_else(|| UNKNOWN_FIELD.to_string())
}

fn flag_icon_url(country_code: &str) -> Option<String> {
    if country_code == UNKNOWN_FIELD {
        return None;
    }
    Some(format!(
        "{}/{}.png",
        FLAG_ICON_BASE,
        country_code.to_lowercase()
    ))
}
