//! Calendly webhook integration tests.

mod common;

use common::TestHarness;
use seatwise_service::crypto::hmac_sha256_hex;
use serde_json::json;

fn invitee_created(email: &str) -> String {
    json!({
        "event": "invitee.created",
        "payload": { "email": email }
    })
    .to_string()
}

fn signature(body: &str) -> String {
    hmac_sha256_hex(common::CALENDLY_SECRET, body)
}

#[tokio::test]
async fn booking_debits_session_cost() {
    let harness = TestHarness::new();
    let (user, token) = harness.seed_user("asha@example.com");

    // Fund the account so the 50-credit booking fee clears.
    harness
        .server
        .post("/v1/admin/credits/grant")
        .add_header("x-admin-key", common::ADMIN_KEY)
        .json(&json!({
            "user_id": user.user_id.to_string(),
            "amount": 100,
            "reason": "Test funding"
        }))
        .await
        .assert_status_ok();

    let body = invitee_created("asha@example.com");
    let response = harness
        .server
        .post("/webhooks/calendly")
        .add_header("calendly-webhook-signature", signature(&body))
        .text(body)
        .await;

    response.assert_status_ok();
    let ack: serde_json::Value = response.json();
    assert_eq!(ack["received"], true);

    let response = harness
        .server
        .get("/v1/credits/balance")
        .add_header("authorization", TestHarness::bearer(&token))
        .await;
    let balance: serde_json::Value = response.json();
    assert_eq!(balance["credits"], 65); // 15 + 100 - 50

    let response = harness
        .server
        .get("/v1/credits/transactions")
        .add_header("authorization", TestHarness::bearer(&token))
        .await;
    let ledger: serde_json::Value = response.json();
    let transactions = ledger["transactions"].as_array().unwrap();
    assert_eq!(transactions[0]["transaction_type"], "session_booking");
    assert_eq!(transactions[0]["amount"], -50);
}

#[tokio::test]
async fn bad_signature_is_unauthorized() {
    let harness = TestHarness::new();
    harness.seed_user("asha@example.com");

    let body = invitee_created("asha@example.com");
    let response = harness
        .server
        .post("/webhooks/calendly")
        .add_header("calendly-webhook-signature", "deadbeef")
        .text(body)
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn missing_signature_is_unauthorized() {
    let harness = TestHarness::new();
    harness.seed_user("asha@example.com");

    let response = harness
        .server
        .post("/webhooks/calendly")
        .text(invitee_created("asha@example.com"))
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn unknown_invitee_email_not_found() {
    let harness = TestHarness::new();

    let body = invitee_created("stranger@example.com");
    let response = harness
        .server
        .post("/webhooks/calendly")
        .add_header("calendly-webhook-signature", signature(&body))
        .text(body)
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn short_balance_returns_402() {
    let harness = TestHarness::new();
    // 15-credit signup bonus cannot cover the 50-credit booking fee.
    let (_, token) = harness.seed_user("asha@example.com");

    let body = invitee_created("asha@example.com");
    let response = harness
        .server
        .post("/webhooks/calendly")
        .add_header("calendly-webhook-signature", signature(&body))
        .text(body)
        .await;

    assert_eq!(response.status_code(), 402);
    let error: serde_json::Value = response.json();
    assert_eq!(error["error"]["code"], "insufficient_credits");

    // Balance untouched.
    let response = harness
        .server
        .get("/v1/credits/balance")
        .add_header("authorization", TestHarness::bearer(&token))
        .await;
    let balance: serde_json::Value = response.json();
    assert_eq!(balance["credits"], 15);
}

#[tokio::test]
async fn other_events_are_acknowledged_without_billing() {
    let harness = TestHarness::new();
    let (_, token) = harness.seed_user("asha@example.com");

    let body = json!({
        "event": "invitee.canceled",
        "payload": { "email": "asha@example.com" }
    })
    .to_string();

    let response = harness
        .server
        .post("/webhooks/calendly")
        .add_header("calendly-webhook-signature", signature(&body))
        .text(body)
        .await;
    response.assert_status_ok();

    let response = harness
        .server
        .get("/v1/credits/balance")
        .add_header("authorization", TestHarness::bearer(&token))
        .await;
    let balance: serde_json::Value = response.json();
    assert_eq!(balance["credits"], 15);
}
