//! User registration, login, and profile integration tests.

mod common;

use common::TestHarness;
use serde_json::json;

fn register_body(email: &str) -> serde_json::Value {
    json!({
        "name": "Asha",
        "email": email,
        "mobile": "9000000001",
        "gender": "female",
        "category": "general",
        "home_state": "Kerala"
    })
}

#[tokio::test]
async fn register_grants_signup_bonus() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/users/register")
        .json(&register_body("asha@example.com"))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["user"]["credits"], 15);
    assert_eq!(body["user"]["lifetime_recharged"], 15);
    assert_eq!(body["user"]["lifetime_spent"], 0);

    // The bonus shows up in the ledger.
    let token = body["token"].as_str().unwrap();
    let response = harness
        .server
        .get("/v1/credits/transactions")
        .add_header("authorization", TestHarness::bearer(token))
        .await;
    response.assert_status_ok();
    let ledger: serde_json::Value = response.json();
    let transactions = ledger["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["transaction_type"], "signup_bonus");
    assert_eq!(transactions[0]["amount"], 15);
}

#[tokio::test]
async fn register_duplicate_email_conflicts() {
    let harness = TestHarness::new();

    harness
        .server
        .post("/v1/users/register")
        .json(&register_body("asha@example.com"))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .post("/v1/users/register")
        .json(&register_body("asha@example.com"))
        .await;
    response.assert_status_conflict();
}

#[tokio::test]
async fn register_rejects_invalid_email() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/users/register")
        .json(&register_body("not-an-email"))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn login_with_matching_mobile_succeeds() {
    let harness = TestHarness::new();
    harness.seed_user("asha@example.com");

    let response = harness
        .server
        .post("/v1/users/login")
        .json(&json!({
            "email": "asha@example.com",
            "mobile": "9000000001"
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["user"]["email"], "asha@example.com");
}

#[tokio::test]
async fn login_with_wrong_mobile_fails() {
    let harness = TestHarness::new();
    harness.seed_user("asha@example.com");

    let response = harness
        .server
        .post("/v1/users/login")
        .json(&json!({
            "email": "asha@example.com",
            "mobile": "9999999999"
        }))
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn login_unknown_email_fails() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/users/login")
        .json(&json!({
            "email": "nobody@example.com",
            "mobile": "9000000001"
        }))
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn me_returns_profile() {
    let harness = TestHarness::new();
    let (user, token) = harness.seed_user("asha@example.com");

    let response = harness
        .server
        .get("/v1/users/me")
        .add_header("authorization", TestHarness::bearer(&token))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["user_id"], user.user_id.to_string());
    assert_eq!(body["home_state"], "Kerala");
}

#[tokio::test]
async fn me_without_token_fails() {
    let harness = TestHarness::new();

    let response = harness.server.get("/v1/users/me").await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn garbage_token_fails() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/v1/users/me")
        .add_header("authorization", "Bearer not-a-real-token")
        .await;
    response.assert_status_unauthorized();
}
