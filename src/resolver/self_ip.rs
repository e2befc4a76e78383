//! Own-IP discovery.
//!
//! Resolving "the caller's own location" needs the caller's public address
//! first. Two plain-text endpoints are tried in order; both failing is
//! terminal for the resolution call, with no further fallback.

use std::net::IpAddr;

use log::{debug, warn};

use crate::config::ResolverConfig;
use crate::error_handling::ResolveError;

/// Discovers the caller's public IP, trying the configured endpoint and then
/// its fallback exactly once.
pub(crate) async fn discover(
    client: &reqwest::Client,
    config: &ResolverConfig,
) -> Result<String, ResolveError> {
    match fetch_ip(client, &config.self_ip_endpoint).await {
        Ok(ip) => {
            debug!("discovered own IP {ip} via {}", config.self_ip_endpoint);
            Ok(ip)
        }
        Err(first) => {
            warn!(
                "self IP endpoint {} failed ({first}), trying fallback",
                config.self_ip_endpoint
            );
            match fetch_ip(client, &config.self_ip_fallback_endpoint).await {
                Ok(ip) => {
                    debug!(
                        "discovered own IP {ip} via fallback {}",
                        config.self_ip_fallback_endpoint
                    );
                    Ok(ip)
                }
                Err(second) => Err(ResolveError::SelfIpDiscovery(format!(
                    "{}: {first}; {}: {second}",
                    config.self_ip_endpoint, config.self_ip_fallback_endpoint
                ))),
            }
        }
    }
}

async fn fetch_ip(client: &reqwest::Client, endpoint: &str) -> Result<String, String> {
    let response = client
        .get(endpoint)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }
    let body = response.text().await.map_err(|e| e.to_string())?;
    let candidate = body.trim();
    candidate
        .parse::<IpAddr>()
        .map_err(|_| format!("unparseable address {candidate:?}"))?;
    Ok(candidate.to_string())
}
