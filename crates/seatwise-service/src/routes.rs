//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{delete, get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    colleges, contact, credits, cutoffs, departments, health, payments, predictions, users,
    webhooks,
};
use crate::state::AppState;

// ============================================================================
// Concurrency Limiting Constants
// ============================================================================

/// Maximum concurrent requests for prediction endpoints.
/// Predictions scan the cutoff table, so they get their own cap sized for
/// the exam-result-day spike.
const PREDICTION_MAX_CONCURRENT_REQUESTS: usize = 100;

/// Maximum concurrent requests for general API endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `POST /v1/users/register` - Register an account
/// - `POST /v1/users/login` - Log in
/// - `POST /v1/contact` - Contact form
///
/// ## Authenticated (session JWT)
/// - `GET /v1/users/me` - Current user's profile and balance
/// - `POST /v1/predictions` - Run an eligibility prediction
/// - `GET /v1/predictions` - Prediction history
/// - `GET /v1/predictions/{id}` - One stored prediction snapshot
/// - `GET /v1/credits/balance` - Current balance
/// - `GET /v1/credits/transactions` - Ledger history
/// - `POST /v1/colleges/view` - Unlock college details
/// - `POST /v1/departments/save` - Save a department to the shortlist
/// - `GET /v1/departments/saved` - List the shortlist
/// - `DELETE /v1/departments/saved/{id}` - Remove from the shortlist
/// - `POST /v1/payments/order` - Create a gateway order
/// - `POST /v1/payments/verify` - Verify a checkout payment
/// - `POST /v1/payments/manual` - Submit a manual UPI payment
///
/// ## Admin (admin role or `X-Admin-Key`)
/// - `GET /v1/admin/payments/pending` - Pending orders
/// - `POST /v1/admin/payments/approve` - Approve a manual payment
/// - `POST /v1/admin/credits/grant` - Grant credits
/// - `POST /v1/admin/cutoffs` - Bulk-import cutoff rows
/// - `GET /v1/admin/contact` - List contact submissions
/// - `POST /v1/admin/contact/{id}/resolve` - Resolve a submission
///
/// ## Webhooks (signature verification, no concurrency limit)
/// - `POST /webhooks/calendly` - Session booking events
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    // Prediction routes carry their own concurrency limit. They are the
    // hottest endpoints around result announcements and each request scans
    // the cutoff table.
    let prediction_routes = Router::new()
        .route("/", post(predictions::create_prediction))
        .route("/", get(predictions::list_predictions))
        .route("/:id", get(predictions::get_prediction))
        .layer(ConcurrencyLimitLayer::new(
            PREDICTION_MAX_CONCURRENT_REQUESTS,
        ));

    // Create concurrency-limited API routes
    let api_routes = Router::new()
        // Users
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users/me", get(users::me))
        // Credits
        .route("/credits/balance", get(credits::get_balance))
        .route("/credits/transactions", get(credits::list_transactions))
        // Colleges and departments
        .route("/colleges/view", post(colleges::view_college))
        .route("/departments/save", post(departments::save_department))
        .route("/departments/saved", get(departments::list_saved))
        .route("/departments/saved/:id", delete(departments::delete_saved))
        // Payments
        .route("/payments/order", post(payments::create_order))
        .route("/payments/verify", post(payments::verify_payment))
        .route("/payments/manual", post(payments::submit_manual_payment))
        // Contact form
        .route("/contact", post(contact::submit_contact))
        // Admin
        .route("/admin/payments/pending", get(payments::list_pending))
        .route("/admin/payments/approve", post(payments::approve_payment))
        .route("/admin/credits/grant", post(credits::admin_grant))
        .route("/admin/cutoffs", post(cutoffs::import_cutoffs))
        .route("/admin/contact", get(contact::list_contact))
        .route("/admin/contact/:id/resolve", post(contact::resolve_contact))
        // Prediction routes (with their own concurrency limit)
        .nest("/predictions", prediction_routes)
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        // Health (public, no rate limit)
        .route("/health", get(health::health))
        // API v1 routes (rate limited)
        .nest("/v1", api_routes)
        // Webhooks (no rate limit - controlled by external services)
        .route("/webhooks/calendly", post(webhooks::calendly_webhook))
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
