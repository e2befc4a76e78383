//! Background monitoring.
//!
//! Runs the detection and analytics passes on fixed intervals so the
//! dashboard's data is fresh without it having to trigger every pass itself.
//! Both passes are stateless reads, so a tick that overlaps an on-demand
//! refresh is harmless.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

use crate::config::constants::{ANALYTICS_REFRESH_INTERVAL, DETECTOR_REFRESH_INTERVAL};
use crate::detectors::RiskLevel;
use crate::GeoGuard;

/// Intervals for the background passes.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// How often the detectors run.
    pub detector_interval: Duration,
    /// How often the analytics summary is recomputed.
    pub analytics_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            detector_interval: DETECTOR_REFRESH_INTERVAL,
            analytics_interval: ANALYTICS_REFRESH_INTERVAL,
        }
    }
}

/// Spawns the background monitor task.
///
/// Returns the token that stops it; cancel on shutdown. A failing pass is
/// logged and the next tick tries again; one bad pass must not kill the
/// monitor.
pub fn start_monitor(guard: Arc<GeoGuard>, config: MonitorConfig) -> CancellationToken {
    let token = CancellationToken::new();
    let shutdown = token.clone();

    tokio::spawn(async move {
        let mut detector_tick = interval(config.detector_interval);
        let mut analytics_tick = interval(config.analytics_interval);

        loop {
            tokio::select! {
                _ = detector_tick.tick() => {
                    match guard.run_detectors().await {
                        Ok(alerts) => {
                            let critical = alerts
                                .iter()
                                .filter(|a| a.risk_level == RiskLevel::Critical)
                                .count();
                            if critical > 0 {
                                warn!(
                                    "detection pass raised {} alert(s), {} critical",
                                    alerts.len(),
                                    critical
                                );
                            } else if !alerts.is_empty() {
                                info!("detection pass raised {} alert(s)", alerts.len());
                            } else {
                                debug!("detection pass raised no alerts");
                            }
                        }
                        Err(e) => warn!("detection pass failed: {e}"),
                    }
                }
                _ = analytics_tick.tick() => {
                    match guard.summarize().await {
                        Ok(summary) => debug!(
                            "analytics refresh: {} records, {} countries, {} cities",
                            summary.total_records, summary.country_count, summary.city_count
                        ),
                        Err(e) => warn!("analytics pass failed: {e}"),
                    }
                }
                _ = shutdown.cancelled() => {
                    debug!("geo monitor shutting down");
                    break;
                }
            }
        }
    });

    token
}
