//! Saved-department shortlist integration tests.

mod common;

use common::TestHarness;
use serde_json::json;

fn save_body(institute: &str, rank: u64) -> serde_json::Value {
    json!({
        "institute": institute,
        "department": "CSE",
        "quota": "all_india",
        "seat_gender": "gender_neutral",
        "seat_type": "OPEN",
        "rank": rank
    })
}

#[tokio::test]
async fn save_and_resave_share_one_entry() {
    let harness = TestHarness::new();
    let (_, token) = harness.seed_user("asha@example.com");

    let response = harness
        .server
        .post("/v1/departments/save")
        .add_header("authorization", TestHarness::bearer(&token))
        .json(&save_body("NIT Trichy", 9_000))
        .await;
    response.assert_status_ok();
    let first: serde_json::Value = response.json();
    assert_eq!(first["created"], true);
    let id = first["id"].as_str().unwrap().to_string();

    // Same seat tuple again, different rank: same id, not created.
    let response = harness
        .server
        .post("/v1/departments/save")
        .add_header("authorization", TestHarness::bearer(&token))
        .json(&save_body("NIT Trichy", 1_234))
        .await;
    response.assert_status_ok();
    let second: serde_json::Value = response.json();
    assert_eq!(second["created"], false);
    assert_eq!(second["id"], id.as_str());

    // Listing keeps the original save-time rank.
    let response = harness
        .server
        .get("/v1/departments/saved")
        .add_header("authorization", TestHarness::bearer(&token))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let saved = body["saved"].as_array().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0]["rank_at_save"], 9_000);
}

#[tokio::test]
async fn shortlists_are_user_scoped() {
    let harness = TestHarness::new();
    let (_, token) = harness.seed_user("asha@example.com");
    let (_, other_token) = harness.seed_user("ravi@example.com");

    harness
        .server
        .post("/v1/departments/save")
        .add_header("authorization", TestHarness::bearer(&token))
        .json(&save_body("NIT Trichy", 9_000))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .get("/v1/departments/saved")
        .add_header("authorization", TestHarness::bearer(&other_token))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["saved"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn delete_removes_entry() {
    let harness = TestHarness::new();
    let (_, token) = harness.seed_user("asha@example.com");

    let response = harness
        .server
        .post("/v1/departments/save")
        .add_header("authorization", TestHarness::bearer(&token))
        .json(&save_body("NIT Trichy", 9_000))
        .await;
    let body: serde_json::Value = response.json();
    let id = body["id"].as_str().unwrap().to_string();

    harness
        .server
        .delete(&format!("/v1/departments/saved/{id}"))
        .add_header("authorization", TestHarness::bearer(&token))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .get("/v1/departments/saved")
        .add_header("authorization", TestHarness::bearer(&token))
        .await;
    let body: serde_json::Value = response.json();
    assert!(body["saved"].as_array().unwrap().is_empty());

    // Second delete is a 404.
    harness
        .server
        .delete(&format!("/v1/departments/saved/{id}"))
        .add_header("authorization", TestHarness::bearer(&token))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn delete_unknown_id_not_found() {
    let harness = TestHarness::new();
    let (_, token) = harness.seed_user("asha@example.com");

    harness
        .server
        .delete("/v1/departments/saved/deadbeef")
        .add_header("authorization", TestHarness::bearer(&token))
        .await
        .assert_status_not_found();
}
