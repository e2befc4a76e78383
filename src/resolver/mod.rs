//! Geolocation resolver.
//!
//! Maps an IP address (or the caller's own public IP) to a canonical
//! [`Location`] by querying a primary HTTP provider with one secondary
//! fallback. Results are cached in memory per IP, and all outbound requests
//! pass a shared minimum-interval rate gate.
//!
//! The resolver is an explicitly constructed instance owning its cache and
//! gate; callers share it by reference. There are no module-level globals.

mod gate;
mod providers;
mod self_ip;
mod types;

use std::collections::HashMap;

use log::{debug, warn};
use tokio::sync::RwLock;

use crate::config::constants::HTTP_STATUS_TOO_MANY_REQUESTS;
use crate::config::ResolverConfig;
use crate::error_handling::{InitializationError, ResolveError};
use crate::initialization::init_client;

use gate::MinIntervalGate;
use providers::{PrimaryGeoResponse, ProviderPayload, SecondaryGeoResponse};

pub use types::{GeoProvider, Location};

/// Resolves IP addresses to locations with caching, rate limiting, and
/// provider fallback.
pub struct GeoResolver {
    client: reqwest::Client,
    config: ResolverConfig,
    cache: RwLock<HashMap<String, Location>>,
    gate: MinIntervalGate,
}

impl GeoResolver {
    /// Creates a resolver from the given configuration.
    ///
    /// Builds the HTTP client with the configured timeout; every outbound
    /// call is bounded by it, so a dead provider costs one timeout, not a
    /// hung caller.
    pub fn new(config: ResolverConfig) -> Result<Self, InitializationError> {
        let client = init_client(config.request_timeout_secs)?;
        Ok(GeoResolver {
            client,
            gate: MinIntervalGate::new(config.min_request_interval),
            cache: RwLock::new(HashMap::new()),
            config,
        })
    }

    /// Resolves `ip` to a [`Location`].
    ///
    /// With `ip == None`, the caller's own public IP is discovered first;
    /// that discovery has its own single fallback endpoint and its failure
    /// is terminal for the call.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when own-IP discovery is exhausted or when
    /// both providers fail for the IP. The error distinguishes network
    /// failure from quota exhaustion and data-quality failure.
    pub async fn resolve(&self, ip: Option<&str>) -> Result<Location, ResolveError> {
        let ip = match ip {
            Some(ip) => ip.to_string(),
            None => self_ip::discover(&self.client, &self.config).await?,
        };
        self.resolve_ip(&ip).await
    }

    /// Empties the result cache.
    ///
    /// Entries are never invalidated on a timer; this is the operational
    /// control for forcing fresh lookups after a provider data problem.
    pub async fn clear_cache(&self) {
        let mut cache = self.cache.write().await;
        let dropped = cache.len();
        cache.clear();
        debug!("cleared geo cache ({dropped} entries)");
    }

    /// Number of cached results, for monitoring.
    pub async fn cache_len(&self) -> usize {
        self.cache.read().await.len()
    }

    async fn resolve_ip(&self, ip: &str) -> Result<Location, ResolveError> {
        if let Some(hit) = self.cache.read().await.get(ip).cloned() {
            debug!("geo cache hit for {ip}");
            return Ok(hit);
        }

        self.gate.pass().await;
        let location = match self.query_primary(ip).await {
            Ok(location) => location,
            Err(primary_err) => {
                warn!(
                    "primary geo provider failed for {ip} ({}: {primary_err}), falling back",
                    primary_err.kind()
                );
                self.gate.pass().await;
                self.query_secondary(ip).await?
            }
        };

        // Concurrent misses for the same IP may both get here; the results
        // are equivalent, so last writer wins.
        self.cache
            .write()
            .await
            .insert(ip.to_string(), location.clone());
        debug!(
            "resolved {ip} to {}, {} via {} provider",
            location.city, location.country, location.source
        );
        Ok(location)
    }

    async fn query_primary(&self, ip: &str) -> Result<Location, ResolveError> {
        let url = provider_url(&self.config.primary_endpoint, ip);
        let payload: PrimaryGeoResponse =
            fetch_json(&self.client, GeoProvider::Primary, &url).await?;
        ProviderPayload::Primary(payload).into_location(ip)
    }

    async fn query_secondary(&self, ip: &str) -> Result<Location, ResolveError> {
        let url = provider_url(&self.config.secondary_endpoint, ip);
        let payload: SecondaryGeoResponse =
            fetch_json(&self.client, GeoProvider::Secondary, &url).await?;
        ProviderPayload::Secondary(payload).into_location(ip)
    }
}

fn provider_url(endpoint: &str, ip: &str) -> String {
    format!("{}/{}", endpoint.trim_end_matches('/'), ip)
}

async fn fetch_json<T: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    provider: GeoProvider,
    url: &str,
) -> Result<T, ResolveError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| ResolveError::Network { provider, source })?;

    let status = response.status();
    if status.as_u16() == HTTP_STATUS_TOO_MANY_REQUESTS {
        return Err(ResolveError::QuotaExceeded { provider });
    }
    if !status.is_success() {
        return Err(ResolveError::ProviderData {
            provider,
            reason: format!("HTTP {status}"),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ResolveError::ProviderData {
            provider,
            reason: format!("malformed JSON: {e}"),
        })
}
