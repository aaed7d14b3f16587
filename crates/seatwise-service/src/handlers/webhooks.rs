//! Scheduling webhook: bills mentorship session bookings.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use seatwise_core::{CreditTransaction, SESSION_BOOKING_COST_CREDITS};
use seatwise_store::Store;

use crate::crypto::{constant_time_eq, hmac_sha256_hex};
use crate::error::ApiError;
use crate::state::AppState;

const SIGNATURE_HEADER: &str = "calendly-webhook-signature";

/// The subset of a Calendly webhook event we act on.
#[derive(Debug, Deserialize)]
struct CalendlyEvent {
    event: String,
    payload: CalendlyPayload,
}

#[derive(Debug, Deserialize)]
struct CalendlyPayload {
    /// Invitee email, present on `invitee.created` events.
    #[serde(default)]
    email: Option<String>,
}

/// Webhook acknowledgement.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Always true; the scheduler only needs a 2xx.
    pub received: bool,
}

fn verify_signature(
    secret: Option<&str>,
    headers: &HeaderMap,
    body: &str,
) -> Result<(), ApiError> {
    let Some(secret) = secret else {
        tracing::warn!("Scheduling webhook secret not configured, skipping verification");
        return Ok(());
    };

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let expected = hmac_sha256_hex(secret, body);
    if constant_time_eq(signature, &expected) {
        Ok(())
    } else {
        tracing::warn!("Scheduling webhook signature mismatch");
        Err(ApiError::Unauthorized)
    }
}

/// Handle a Calendly webhook.
///
/// Signature is an HMAC-SHA256 over the raw request body, so this handler
/// takes the body as a `String` and parses it after verification. An
/// `invitee.created` event debits the booking cost from the invitee's
/// account; a short balance returns 402 so the booking can be flagged.
pub async fn calendly_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<WebhookResponse>, ApiError> {
    verify_signature(
        state.config.calendly_webhook_secret.as_deref(),
        &headers,
        &body,
    )?;

    let event: CalendlyEvent = serde_json::from_str(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid webhook payload: {e}")))?;

    if event.event != "invitee.created" {
        tracing::debug!(event = %event.event, "Ignoring webhook event");
        return Ok(Json(WebhookResponse { received: true }));
    }

    let email = event
        .payload
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing invitee email".into()))?;

    let user = state
        .store
        .get_user_by_email(email)?
        .ok_or_else(|| ApiError::NotFound("No account for invitee email".into()))?;

    let tx = CreditTransaction::session_booking(user.user_id, SESSION_BOOKING_COST_CREDITS, 0);
    let balance = state.store.debit_credits(&user.user_id, &tx)?;

    tracing::info!(
        user_id = %user.user_id,
        cost = SESSION_BOOKING_COST_CREDITS,
        new_balance = balance,
        "Session booking billed"
    );

    Ok(Json(WebhookResponse { received: true }))
}
