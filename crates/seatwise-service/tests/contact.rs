//! Contact form and admin triage integration tests.

mod common;

use common::TestHarness;
use serde_json::json;

#[tokio::test]
async fn submission_and_admin_triage() {
    let harness = TestHarness::new();

    // The form is public.
    let response = harness
        .server
        .post("/v1/contact")
        .json(&json!({
            "name": "Meera",
            "email": "Meera@Example.com",
            "mobile": "9000000002",
            "message": "Which NITs can I get with rank 40000?"
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let id = body["id"].as_str().unwrap().to_string();

    // Admin sees it, email normalized to lowercase.
    let response = harness
        .server
        .get("/v1/admin/contact?unresolved_only=true")
        .add_header("x-admin-key", common::ADMIN_KEY)
        .await;
    response.assert_status_ok();
    let list: serde_json::Value = response.json();
    let submissions = list["submissions"].as_array().unwrap();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0]["email"], "meera@example.com");
    assert_eq!(submissions[0]["resolved"], false);

    // Resolve it; the unresolved filter now hides it.
    harness
        .server
        .post(&format!("/v1/admin/contact/{id}/resolve"))
        .add_header("x-admin-key", common::ADMIN_KEY)
        .await
        .assert_status_ok();

    let response = harness
        .server
        .get("/v1/admin/contact?unresolved_only=true")
        .add_header("x-admin-key", common::ADMIN_KEY)
        .await;
    let list: serde_json::Value = response.json();
    assert!(list["submissions"].as_array().unwrap().is_empty());

    // Still visible in the full listing as resolved.
    let response = harness
        .server
        .get("/v1/admin/contact")
        .add_header("x-admin-key", common::ADMIN_KEY)
        .await;
    let list: serde_json::Value = response.json();
    assert_eq!(list["submissions"][0]["resolved"], true);
}

#[tokio::test]
async fn resolve_is_idempotent() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/contact")
        .json(&json!({
            "name": "Ravi",
            "email": "ravi@example.com",
            "message": "Hello"
        }))
        .await;
    let body: serde_json::Value = response.json();
    let id = body["id"].as_str().unwrap().to_string();

    for _ in 0..2 {
        harness
            .server
            .post(&format!("/v1/admin/contact/{id}/resolve"))
            .add_header("x-admin-key", common::ADMIN_KEY)
            .await
            .assert_status_ok();
    }
}

#[tokio::test]
async fn resolve_unknown_id_not_found() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post(&format!("/v1/admin/contact/{}/resolve", uuid::Uuid::new_v4()))
        .add_header("x-admin-key", common::ADMIN_KEY)
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn submission_requires_name_and_message() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/contact")
        .json(&json!({
            "name": "",
            "email": "x@example.com",
            "message": "hi"
        }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn admin_listing_requires_admin() {
    let harness = TestHarness::new();

    harness
        .server
        .get("/v1/admin/contact")
        .await
        .assert_status_unauthorized();
}
