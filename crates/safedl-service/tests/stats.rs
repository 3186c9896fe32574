//! Statistics integration tests.

mod common;

use common::TestHarness;
use serde_json::{json, Value};

#[tokio::test]
async fn empty_catalog_stats() {
    let harness = TestHarness::new();

    let response = harness.server.get("/api/stats").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["totalSoftware"], 0);
    assert_eq!(body["brokenLinks"], 0);
    assert_eq!(body["safetyPercentage"], 100);
}

#[tokio::test]
async fn stats_count_every_category() {
    let harness = TestHarness::new();
    harness.create_record("windows", "Windows 11", json!({})).await;
    harness.create_record("windows", "Windows 10", json!({})).await;
    harness.create_record("office", "Office 2021", json!({})).await;
    harness.create_record("antivirus", "Defender", json!({})).await;

    let body: Value = harness.server.get("/api/stats").await.json();

    assert_eq!(body["totalSoftware"], 4);
    assert_eq!(body["categoryBreakdown"]["windows"], 2);
    assert_eq!(body["categoryBreakdown"]["office"], 1);
    assert_eq!(body["categoryBreakdown"]["tools"], 0);
    assert_eq!(body["categoryBreakdown"]["antivirus"], 1);
    assert_eq!(body["safetyPercentage"], 100);
}
