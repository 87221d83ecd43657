// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests of the processing service boundary.

use voxroute_agent::ProcessingService;
use voxroute_analytics::AnalyticsExport;
use voxroute_core::{DecisionRule, NetworkQuality, ProcessingLocation, UserProcessingPreferences};
use voxroute_test_utils::{SnapshotBuilder, TestHarness};

async fn service(harness: &TestHarness) -> ProcessingService {
    ProcessingService::from_config(harness.config(), harness.sampler()).await
}

#[tokio::test]
async fn export_round_trips_every_event() {
    let harness = TestHarness::builder().without_persistence().build().unwrap();
    let svc = service(&harness).await;
    let prefs = UserProcessingPreferences::default();

    for (i, text) in ["what time is it", "check my bank balance", "remind me to call mom"]
        .iter()
        .enumerate()
    {
        let decision = svc.make_decision(text, None, &prefs);
        svc.record_outcome(&decision, i != 1, 0.0005 * i as f64, 0.7, None);
    }

    let bytes = svc.export_analytics_data().unwrap();
    let export = AnalyticsExport::from_json_bytes(&bytes).unwrap();
    let report = svc.analytics_report();

    assert_eq!(export.total_events, 3);
    assert_eq!(export.total_events, report.total_events);
    assert_eq!(export.events, svc.analytics().events());
    assert_eq!(export.report.current_stats, report.current_stats);
    let range = export.date_range.expect("events present");
    assert!(range.start <= range.end);
}

#[tokio::test]
async fn history_keeps_newest_hundred_decisions() {
    let harness = TestHarness::builder().without_persistence().build().unwrap();
    let svc = service(&harness).await;

    let ids: Vec<String> = (0..150)
        .map(|i| svc.decide(&format!("query number {i}"), None).id)
        .collect();

    let history = svc.engine().history();
    assert_eq!(history.len(), 100);
    assert_eq!(history[0].id, ids[50]);
    assert_eq!(history[99].id, ids[149]);
}

#[tokio::test]
async fn analytics_survive_restart() {
    let harness = TestHarness::builder().with_max_events(5).build().unwrap();

    let first = service(&harness).await;
    assert!(first.analytics().is_persistent());
    for _ in 0..8 {
        let decision = first.decide("set a timer for ten minutes", None);
        first.record_outcome(&decision, true, 0.0, 1.0, None);
    }
    first.flush().await;
    let expected = first.analytics().events();
    assert_eq!(expected.len(), 5);

    let second = service(&harness).await;
    assert_eq!(second.analytics().events(), expected);
    assert_eq!(second.analytics_report().total_events, 5);
    // Roll-ups count every recorded event, not just the retained ones.
    assert_eq!(second.analytics().daily_stats()[0].total, 8);
}

#[tokio::test]
async fn clear_removes_persisted_events() {
    let harness = TestHarness::builder().build().unwrap();

    let first = service(&harness).await;
    let decision = first.decide("what is the weather", None);
    first.record_outcome(&decision, true, 0.001, 0.5, None);
    first.clear_analytics_data();
    first.flush().await;

    let second = service(&harness).await;
    assert!(second.analytics().is_empty());
    assert!(second.analytics().daily_stats().is_empty());
}

#[tokio::test]
async fn unopenable_database_degrades_to_memory() {
    let harness = TestHarness::builder().build().unwrap();
    // A regular file where the database's parent directory should be.
    let blocker = harness.database_path().with_file_name("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let mut config = harness.config().clone();
    config.analytics.database_path = blocker.join("analytics.db").to_string_lossy().into_owned();

    let svc = ProcessingService::from_config(&config, harness.sampler()).await;
    assert!(!svc.analytics().is_persistent());

    let decision = svc.decide("what time is it", None);
    svc.record_outcome(&decision, true, 0.0, 1.0, None);
    assert_eq!(svc.analytics().len(), 1);
}

#[tokio::test]
async fn sampler_changes_apply_to_next_decision() {
    let harness = TestHarness::builder().without_persistence().build().unwrap();
    let svc = service(&harness).await;
    let text = "explain the history of the roman empire in detail and compare it with the byzantine empire";

    let online = svc.decide(text, None);
    assert_ne!(online.rule, DecisionRule::NoNetwork);

    harness
        .sampler()
        .set(SnapshotBuilder::new().network(NetworkQuality::Unavailable).build());
    let offline = svc.decide(text, None);
    assert_eq!(offline.rule, DecisionRule::NoNetwork);
    assert_ne!(offline.recommended_location, ProcessingLocation::Server);
    assert_ne!(offline.recommended_location, ProcessingLocation::Hybrid);
    assert!(!offline.reasoning.is_empty());
}
