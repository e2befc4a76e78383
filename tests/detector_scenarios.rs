//! Detector and analytics scenarios over a seeded record store.

mod helpers;

use geoguard::{
    AlertEvidence, AlertKind, DetectionThresholds, GeoGuard, GeoRecordStore, GeoResolver,
    ResolverConfig, RiskLevel,
};

use helpers::{create_test_store, seed_record};

const HOUR_MS: i64 = 3_600_000;

fn guard_over_store(store: GeoRecordStore) -> GeoGuard {
    let resolver = GeoResolver::new(ResolverConfig::default()).expect("resolver should build");
    GeoGuard::from_parts(resolver, store, DetectionThresholds::default())
}

/// A user seen in Bogota and then in Madrid one hour later gets exactly one
/// impossible-travel alert with the distance and velocity in evidence.
#[tokio::test]
async fn test_bogota_madrid_hop_raises_impossible_travel() {
    let (store, _dir) = create_test_store().await;
    let base = 1_700_000_000_000;
    seed_record(
        &store,
        "u1",
        "181.49.0.1",
        "Bogota",
        "Colombia",
        Some((4.71, -74.07)),
        "America/Bogota",
        base,
    )
    .await;
    seed_record(
        &store,
        "u1",
        "83.40.0.1",
        "Madrid",
        "Spain",
        Some((40.42, -3.70)),
        "Europe/Madrid",
        base + HOUR_MS,
    )
    .await;

    let guard = guard_over_store(store);
    let alerts = guard
        .detect_impossible_travel()
        .await
        .expect("detection should succeed");

    assert_eq!(alerts.len(), 1);
    let alert = &alerts[0];
    assert_eq!(alert.kind, AlertKind::ImpossibleTravel);
    assert_eq!(alert.risk_level, RiskLevel::High);
    assert_eq!(alert.subject.user_id, "u1");
    match &alert.evidence {
        AlertEvidence::ImpossibleTravel {
            from,
            to,
            distance_km,
            elapsed_minutes,
            velocity_kmh,
        } => {
            assert_eq!(from, "Bogota, Colombia");
            assert_eq!(to, "Madrid, Spain");
            assert!(
                (7900.0..8100.0).contains(distance_km),
                "expected ~8000 km, got {distance_km}"
            );
            assert_eq!(*elapsed_minutes, 60);
            assert!(*velocity_kmh > 900.0, "must exceed the plausible maximum");
        }
        other => panic!("expected ImpossibleTravel evidence, got {other:?}"),
    }
}

/// A slow multi-day trip between the same cities raises nothing.
#[tokio::test]
async fn test_slow_travel_raises_nothing() {
    let (store, _dir) = create_test_store().await;
    let base = 1_700_000_000_000;
    seed_record(
        &store,
        "u1",
        "181.49.0.1",
        "Bogota",
        "Colombia",
        Some((4.71, -74.07)),
        "America/Bogota",
        base,
    )
    .await;
    seed_record(
        &store,
        "u1",
        "83.40.0.1",
        "Madrid",
        "Spain",
        Some((40.42, -3.70)),
        "Europe/Madrid",
        base + 48 * HOUR_MS,
    )
    .await;

    let guard = guard_over_store(store);
    let alerts = guard
        .detect_impossible_travel()
        .await
        .expect("detection should succeed");
    assert!(alerts.is_empty());
}

/// Shared-account thresholds over the store: 4 distinct IPs in one country
/// flags High; 3 countries flags Critical; a user at the limits stays clean.
#[tokio::test]
async fn test_shared_account_thresholds_over_store() {
    let (store, _dir) = create_test_store().await;
    let base = 1_700_000_000_000;

    // Clean: exactly 3 IPs, 1 country.
    for (i, ip) in ["10.0.0.1", "10.0.0.2", "10.0.0.3"].iter().enumerate() {
        seed_record(
            &store,
            "clean-user",
            ip,
            "Berlin",
            "Germany",
            None,
            "Europe/Berlin",
            base + i as i64 * HOUR_MS,
        )
        .await;
    }

    // High: 4 IPs, 1 country.
    for (i, ip) in ["10.1.0.1", "10.1.0.2", "10.1.0.3", "10.1.0.4"]
        .iter()
        .enumerate()
    {
        seed_record(
            &store,
            "ip-hopper",
            ip,
            "Berlin",
            "Germany",
            None,
            "Europe/Berlin",
            base + i as i64 * HOUR_MS,
        )
        .await;
    }

    // Critical: 3 countries, breaching the country threshold.
    seed_record(
        &store,
        "globetrotter",
        "10.2.0.1",
        "Berlin",
        "Germany",
        None,
        "Europe/Berlin",
        base,
    )
    .await;
    seed_record(
        &store,
        "globetrotter",
        "10.2.0.2",
        "Paris",
        "France",
        None,
        "Europe/Paris",
        base + HOUR_MS,
    )
    .await;
    seed_record(
        &store,
        "globetrotter",
        "10.2.0.3",
        "Tokyo",
        "Japan",
        None,
        "Asia/Tokyo",
        base + 2 * HOUR_MS,
    )
    .await;

    let guard = guard_over_store(store);
    let alerts = guard
        .detect_shared_accounts()
        .await
        .expect("detection should succeed");

    assert_eq!(alerts.len(), 2, "only the two offenders are flagged");
    // Sorted most severe first.
    assert_eq!(alerts[0].risk_level, RiskLevel::Critical);
    assert_eq!(alerts[0].subject.user_id, "globetrotter");
    assert_eq!(alerts[1].risk_level, RiskLevel::High);
    assert_eq!(alerts[1].subject.user_id, "ip-hopper");
}

/// The anonymizing-network pass exists and returns an empty, correctly-typed
/// result even over a store full of proxy-flagged records.
#[tokio::test]
async fn test_anonymizing_network_pass_is_a_typed_noop() {
    let (store, _dir) = create_test_store().await;
    seed_record(
        &store,
        "u1",
        "10.0.0.1",
        "Berlin",
        "Germany",
        None,
        "Europe/Berlin",
        1_700_000_000_000,
    )
    .await;

    let guard = guard_over_store(store);
    let alerts = guard
        .detect_anonymizing_networks()
        .await
        .expect("the pass must succeed");
    assert!(alerts.is_empty());
}

/// run_detectors merges all passes and orders the result most severe first.
#[tokio::test]
async fn test_run_detectors_merges_and_sorts() {
    let (store, _dir) = create_test_store().await;
    let base = 1_700_000_000_000;

    // An ip-hopper (High, shared account)...
    for (i, ip) in ["10.1.0.1", "10.1.0.2", "10.1.0.3", "10.1.0.4"]
        .iter()
        .enumerate()
    {
        seed_record(
            &store,
            "ip-hopper",
            ip,
            "Berlin",
            "Germany",
            None,
            "Europe/Berlin",
            base + i as i64 * HOUR_MS,
        )
        .await;
    }
    // ...and a user in two places at once (Critical, impossible travel).
    seed_record(
        &store,
        "bilocated",
        "181.49.0.1",
        "Bogota",
        "Colombia",
        Some((4.71, -74.07)),
        "America/Bogota",
        base,
    )
    .await;
    seed_record(
        &store,
        "bilocated",
        "83.40.0.1",
        "Madrid",
        "Spain",
        Some((40.42, -3.70)),
        "Europe/Madrid",
        base,
    )
    .await;

    let guard = guard_over_store(store);
    let alerts = guard.run_detectors().await.expect("detection should succeed");

    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].risk_level, RiskLevel::Critical);
    assert_eq!(alerts[0].kind, AlertKind::ImpossibleTravel);
    assert_eq!(alerts[1].risk_level, RiskLevel::High);
    assert_eq!(alerts[1].kind, AlertKind::SharedAccount);
}

/// The analytics summary over a seeded store: counts, shares, and the
/// Unknown timezone bucket.
#[tokio::test]
async fn test_summary_over_seeded_store() {
    let (store, _dir) = create_test_store().await;
    let base = 1_700_000_000_000;
    seed_record(
        &store,
        "u1",
        "10.0.0.1",
        "Berlin",
        "Germany",
        None,
        "Europe/Berlin",
        base,
    )
    .await;
    seed_record(
        &store,
        "u2",
        "10.0.0.2",
        "Munich",
        "Germany",
        None,
        "Europe/Berlin",
        base + 1,
    )
    .await;
    seed_record(
        &store,
        "u3",
        "10.0.0.3",
        "Paris",
        "France",
        None,
        "unknown",
        base + 2,
    )
    .await;
    seed_record(
        &store,
        "u4",
        "10.0.0.4",
        "Tokyo",
        "Japan",
        None,
        "Asia/Tokyo",
        base + 3,
    )
    .await;

    let guard = guard_over_store(store);
    let summary = guard.summarize().await.expect("summary should succeed");

    assert_eq!(summary.total_records, 4);
    assert_eq!(summary.country_count, 3);
    assert_eq!(summary.city_count, 4);

    assert_eq!(summary.per_country[0].country, "Germany");
    assert_eq!(summary.per_country[0].user_count, 2);
    assert_eq!(summary.per_country[0].percentage_of_total, 50.0);

    let total: f64 = summary
        .per_country
        .iter()
        .map(|c| c.percentage_of_total)
        .sum();
    assert!((total - 100.0).abs() < 0.1);

    assert!(summary
        .per_timezone
        .iter()
        .any(|t| t.timezone == "Unknown" && t.active_count == 1));
}

/// An empty store summarizes to zero-valued, well-formed output.
#[tokio::test]
async fn test_summary_over_empty_store() {
    let (store, _dir) = create_test_store().await;
    let guard = guard_over_store(store);
    let summary = guard.summarize().await.expect("summary should succeed");

    assert_eq!(summary.total_records, 0);
    assert_eq!(summary.country_count, 0);
    assert_eq!(summary.city_count, 0);
    assert!(summary.per_country.is_empty());
    assert!(summary.per_timezone.is_empty());
}

/// The activity-feed read returns records newest first.
#[tokio::test]
async fn test_recent_returns_newest_first() {
    let (store, _dir) = create_test_store().await;
    let base = 1_700_000_000_000;
    seed_record(
        &store,
        "u1",
        "10.0.0.1",
        "Berlin",
        "Germany",
        None,
        "Europe/Berlin",
        base,
    )
    .await;
    seed_record(
        &store,
        "u2",
        "10.0.0.2",
        "Paris",
        "France",
        None,
        "Europe/Paris",
        base + HOUR_MS,
    )
    .await;

    let records = store.recent(10).await.expect("read should succeed");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].user_id, "u2");
    assert_eq!(records[1].user_id, "u1");
}
