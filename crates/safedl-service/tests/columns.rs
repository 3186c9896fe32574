//! Column migration integration tests.

mod common;

use common::TestHarness;
use serde_json::{json, Value};

fn column_key(mutation: &Value) -> String {
    mutation["column"]["key"].as_str().unwrap().to_string()
}

// ============================================================================
// End to end
// ============================================================================

#[tokio::test]
async fn license_key_column_round_trip() {
    let harness = TestHarness::new();
    for name in ["Rufus", "7-Zip", "CPU-Z"] {
        harness.create_record("tools", name, json!({})).await;
    }

    let mutation = harness.add_column("tools", "License Key", "text").await;
    let key = column_key(&mutation);
    assert_eq!(mutation["recordsUpdated"], 3);

    let config = harness.column_config("tools").await;
    assert_eq!(config["columns"].as_array().unwrap().len(), 1);
    let records = harness.list_records("tools").await;
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r[&key] == ""));

    harness
        .server
        .delete(&format!("/api/columns/tools/{key}"))
        .add_header(TestHarness::auth_header_name(), TestHarness::admin_auth_header())
        .await
        .assert_status_ok();

    let config = harness.column_config("tools").await;
    assert!(config["columns"].as_array().unwrap().is_empty());
    assert!(harness
        .list_records("tools")
        .await
        .iter()
        .all(|r| r.get(&key).is_none()));
}

// ============================================================================
// Add
// ============================================================================

#[tokio::test]
async fn add_column_updates_records_and_configuration() {
    let harness = TestHarness::new();
    harness.create_record("office", "Office 2019", json!({})).await;
    harness.create_record("office", "Office 2021", json!({})).await;

    let mutation = harness.add_column("office", "License Key", "text").await;
    let key = column_key(&mutation);

    assert!(key.starts_with("license_key_"));
    assert_eq!(mutation["column"]["label"], "License Key");
    assert_eq!(mutation["column"]["type"], "text");
    assert_eq!(mutation["recordsUpdated"], 2);

    for record in harness.list_records("office").await {
        assert_eq!(record[&key], "");
    }

    let config = harness.column_config("office").await;
    let columns = config["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0]["key"], key.as_str());
    assert_eq!(columns[0]["label"], "License Key");
}

#[tokio::test]
async fn url_column_expands_to_four_fields() {
    let harness = TestHarness::new();
    harness.create_record("windows", "Windows 11", json!({})).await;

    let mutation = harness.add_column("windows", "Download", "url").await;
    let key = column_key(&mutation);

    let records = harness.list_records("windows").await;
    let record = &records[0];
    assert_eq!(record[format!("{key}32")], "");
    assert_eq!(record[format!("{key}64")], "");
    assert_eq!(record[format!("{key}Common")], "");
    assert_eq!(record[format!("{key}Show")], "both");
    assert!(record.get(&key).is_none());
}

#[tokio::test]
async fn number_column_defaults_to_zero() {
    let harness = TestHarness::new();
    harness.create_record("tools", "Rufus", json!({})).await;

    let mutation = harness.add_column("tools", "Size MB", "number").await;
    let key = column_key(&mutation);

    assert_eq!(harness.list_records("tools").await[0][&key], 0);
}

#[tokio::test]
async fn same_label_twice_yields_distinct_columns() {
    let harness = TestHarness::new();

    let first = column_key(&harness.add_column("tools", "Notes", "text").await);
    let second = column_key(&harness.add_column("tools", "Notes", "text").await);

    assert_ne!(first, second);
    let config = harness.column_config("tools").await;
    assert_eq!(config["columns"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn blank_label_is_rejected_without_writes() {
    let harness = TestHarness::new();
    harness.create_record("tools", "Rufus", json!({})).await;

    let response = harness
        .server
        .post("/api/columns/tools")
        .add_header(TestHarness::auth_header_name(), TestHarness::admin_auth_header())
        .json(&json!({ "label": "   ", "type": "text" }))
        .await;

    response.assert_status_bad_request();
    let config = harness.column_config("tools").await;
    assert!(config["columns"].as_array().unwrap().is_empty());
    let record = &harness.list_records("tools").await[0];
    assert_eq!(record.as_object().unwrap().len(), 5);
}

#[tokio::test]
async fn add_column_requires_admin() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/columns/tools")
        .json(&json!({ "label": "Notes", "type": "text" }))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn closed_admin_routes_reject_everything() {
    let harness = TestHarness::without_admin_key();

    let response = harness
        .server
        .post("/api/columns/tools")
        .add_header(TestHarness::auth_header_name(), TestHarness::admin_auth_header())
        .json(&json!({ "label": "Notes", "type": "text" }))
        .await;

    response.assert_status_unauthorized();
}

// ============================================================================
// Rename
// ============================================================================

#[tokio::test]
async fn rename_changes_label_only() {
    let harness = TestHarness::new();
    harness.create_record("antivirus", "Defender", json!({})).await;
    let key = column_key(&harness.add_column("antivirus", "Vendor", "text").await);

    let response = harness
        .server
        .patch(&format!("/api/columns/antivirus/{key}"))
        .add_header(TestHarness::auth_header_name(), TestHarness::admin_auth_header())
        .json(&json!({ "label": "Publisher" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["column"]["key"], key.as_str());
    assert_eq!(body["column"]["label"], "Publisher");
    assert_eq!(body["recordsUpdated"], 0);

    let config = harness.column_config("antivirus").await;
    assert_eq!(config["columns"][0]["label"], "Publisher");
    assert_eq!(harness.list_records("antivirus").await[0][&key], "");
}

#[tokio::test]
async fn rename_unknown_column_is_not_found() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .patch("/api/columns/antivirus/missing_key")
        .add_header(TestHarness::auth_header_name(), TestHarness::admin_auth_header())
        .json(&json!({ "label": "Publisher" }))
        .await;

    response.assert_status_not_found();
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn delete_url_column_strips_every_field() {
    let harness = TestHarness::new();
    harness.create_record("windows", "Windows 11", json!({})).await;
    let keep = column_key(&harness.add_column("windows", "Edition", "text").await);
    let key = column_key(&harness.add_column("windows", "Download", "url").await);

    let response = harness
        .server
        .delete(&format!("/api/columns/windows/{key}"))
        .add_header(TestHarness::auth_header_name(), TestHarness::admin_auth_header())
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["recordsUpdated"], 1);

    let record = &harness.list_records("windows").await[0];
    for suffix in ["32", "64", "Common", "Show"] {
        assert!(record.get(format!("{key}{suffix}")).is_none());
    }
    assert_eq!(record[&keep], "");

    let config = harness.column_config("windows").await;
    let columns = config["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0]["key"], keep.as_str());
}

#[tokio::test]
async fn deleting_twice_is_not_found() {
    let harness = TestHarness::new();
    let key = column_key(&harness.add_column("tools", "Notes", "text").await);
    let path = format!("/api/columns/tools/{key}");

    harness
        .server
        .delete(&path)
        .add_header(TestHarness::auth_header_name(), TestHarness::admin_auth_header())
        .await
        .assert_status_ok();

    let response = harness
        .server
        .delete(&path)
        .add_header(TestHarness::auth_header_name(), TestHarness::admin_auth_header())
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn punctuated_labels_can_be_renamed_and_deleted() {
    let harness = TestHarness::new();
    harness.create_record("tools", "Wireshark", json!({})).await;

    for label in ["TCP/IP", "C#", "50% off?"] {
        let key = column_key(&harness.add_column("tools", label, "text").await);
        assert!(
            key.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
            "{label} -> {key}"
        );

        harness
            .server
            .patch(&format!("/api/columns/tools/{key}"))
            .add_header(TestHarness::auth_header_name(), TestHarness::admin_auth_header())
            .json(&json!({ "label": format!("{label} (renamed)") }))
            .await
            .assert_status_ok();

        let response = harness
            .server
            .delete(&format!("/api/columns/tools/{key}"))
            .add_header(TestHarness::auth_header_name(), TestHarness::admin_auth_header())
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["column"]["label"], format!("{label} (renamed)"));
        assert_eq!(body["recordsUpdated"], 1);
    }

    let config = harness.column_config("tools").await;
    assert!(config["columns"].as_array().unwrap().is_empty());
    assert_eq!(harness.list_records("tools").await[0].as_object().unwrap().len(), 5);
}

// ============================================================================
// Record-only field endpoints
// ============================================================================

#[tokio::test]
async fn legacy_add_and_delete_fields() {
    let harness = TestHarness::new();
    harness.create_record("office", "Office 2021", json!({})).await;

    let response = harness
        .server
        .post("/api/admin/columns/add")
        .add_header(TestHarness::auth_header_name(), TestHarness::admin_auth_header())
        .json(&json!({ "category": "office", "columnKey": "mirror", "columnType": "url" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["recordsUpdated"], 1);

    let record = &harness.list_records("office").await[0];
    assert_eq!(record["mirror32"], "");
    assert_eq!(record["mirrorShow"], "both");
    // Configuration is saved separately by the caller.
    let config = harness.column_config("office").await;
    assert!(config["columns"].as_array().unwrap().is_empty());

    let response = harness
        .server
        .post("/api/admin/columns/delete")
        .add_header(TestHarness::auth_header_name(), TestHarness::admin_auth_header())
        .json(&json!({ "category": "office", "columnKey": "mirror", "isUrlColumn": true }))
        .await;

    response.assert_status_ok();
    let record = &harness.list_records("office").await[0];
    assert!(record.get("mirror32").is_none());
    assert!(record.get("mirrorShow").is_none());
}

#[tokio::test]
async fn legacy_add_rejects_reserved_key() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/admin/columns/add")
        .add_header(TestHarness::auth_header_name(), TestHarness::admin_auth_header())
        .json(&json!({ "category": "office", "columnKey": "name" }))
        .await;

    response.assert_status_bad_request();
}
