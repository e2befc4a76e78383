//! Configuration constants.
//!
//! This module defines the default operational parameters: provider
//! endpoints, timeouts, the rate-limit interval, and the detection
//! thresholds. Everything here is a default; callers override values
//! through the structs in `config::types`.

use std::time::Duration;

/// Default primary geolocation provider endpoint (ip-api style JSON).
///
/// The free tier of this provider is only served over plain HTTP; the scheme
/// is part of the config field, so deployments with an API key point
/// `ResolverConfig::primary_endpoint` at the HTTPS endpoint instead.
pub const PRIMARY_GEO_ENDPOINT: &str = "http://ip-api.com/json";

/// Default secondary (fallback) geolocation provider endpoint (ipwho style JSON).
pub const SECONDARY_GEO_ENDPOINT: &str = "https://ipwho.is";

/// Default plain-text "what is my IP" endpoint.
pub const SELF_IP_ENDPOINT: &str = "https://api.ipify.org";

/// Fallback "what is my IP" endpoint, tried exactly once if the first fails.
pub const SELF_IP_FALLBACK_ENDPOINT: &str = "https://checkip.amazonaws.com";

/// Base URL for constructed flag-icon links.
/// The lowercased ISO country code plus `.png` is appended.
pub const FLAG_ICON_BASE: &str = "https://flagcdn.com/32x32";

/// Minimum spacing between outbound provider requests.
///
/// Both default providers throttle free-tier callers per minute; 150ms keeps
/// a burst of resolutions serialized under their quotas instead of tripping
/// HTTP 429 responses.
pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(150);

/// Per-request timeout for provider calls in seconds.
/// Provider lookups normally answer in under a second; 12s bounds the worst
/// case without leaving interactive callers hanging indefinitely.
pub const PROVIDER_TIMEOUT_SECS: u64 = 12;

/// Placeholder stored for location fields the provider had no value for.
pub const UNKNOWN_FIELD: &str = "unknown";

/// A user seen from more than this many distinct IPs is flagged as a shared account.
pub const MAX_DISTINCT_IPS: usize = 3;

/// A user seen from more than this many distinct countries is flagged as a
/// shared account at Critical risk.
pub const MAX_DISTINCT_COUNTRIES: usize = 2;

/// Fastest sustained travel speed considered plausible, in km/h.
/// Commercial air travel tops out around 900 km/h ground speed.
pub const MAX_PLAUSIBLE_VELOCITY_KMH: f64 = 900.0;

/// Consecutive records closer than this many kilometers are ordinary local
/// movement (or VPN jitter) and are never flagged, regardless of timing.
pub const MIN_TRAVEL_DISTANCE_KM: f64 = 100.0;

/// Elapsed times at or below this many hours count as concurrent sessions
/// rather than travel; guards the velocity division against near-zero gaps.
pub const NEAR_ZERO_ELAPSED_HOURS: f64 = 0.001;

/// How many recently-active users a detection pass scans.
pub const ACTIVE_USER_SCAN_LIMIT: i64 = 200;

/// How many of a user's most recent records a detection pass considers.
pub const PER_USER_HISTORY_LIMIT: i64 = 50;

/// Interval between background detection passes.
pub const DETECTOR_REFRESH_INTERVAL: Duration = Duration::from_secs(120);

/// Interval between background analytics passes.
pub const ANALYTICS_REFRESH_INTERVAL: Duration = Duration::from_secs(300);

/// Default SQLite database path.
pub const DB_PATH: &str = "./geoguard.db";

/// HTTP status code for provider quota exhaustion.
pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;
