//! Authentication: session token issuance and extractors.
//!
//! This module provides:
//! - `issue_session` - mint an HS256 session token at register/login
//! - `AuthUser` - end-user authentication via session token
//! - `AdminAuth` - admin authentication via admin-role token or ops API key
//!
//! Authorization decisions are made only from server-issued claims; no
//! client-supplied identity field is ever trusted.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use seatwise_core::{User, UserId};

use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::state::AppState;

/// Role claim values.
pub const ROLE_USER: &str = "user";
/// Role granted to configured admin emails at login.
pub const ROLE_ADMIN: &str = "admin";

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID).
    pub sub: String,
    /// Role ("user" or "admin").
    pub role: String,
    /// Expiration time.
    pub exp: i64,
    /// Issued at.
    pub iat: i64,
}

/// Mint a session token for a user.
///
/// The role is derived server-side from the configured admin email list.
///
/// # Errors
///
/// Returns `ApiError::Internal` if token encoding fails.
pub fn issue_session(user: &User, config: &ServiceConfig) -> Result<String, ApiError> {
    let now = chrono::Utc::now();
    let role = if config.is_admin_email(&user.email) {
        ROLE_ADMIN
    } else {
        ROLE_USER
    };

    let claims = SessionClaims {
        sub: user.user_id.to_string(),
        role: role.to_string(),
        exp: (now + chrono::Duration::hours(config.session_ttl_hours)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.session_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("failed to sign session token: {e}")))
}

/// Decode and validate a session token.
fn decode_session(token: &str, config: &ServiceConfig) -> Result<SessionClaims, ApiError> {
    let validation = Validation::new(Algorithm::HS256);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.session_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "Session token validation failed");
        ApiError::Unauthorized
    })?;

    Ok(data.claims)
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)
}

/// An authenticated user extracted from a session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user ID.
    pub user_id: UserId,
    /// The role claim.
    pub role: String,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let token = bearer_token(parts)?;

            // Allow test tokens in testing only.
            // This bypass is gated behind #[cfg(test)] or the "test-auth"
            // feature to ensure it is never active in production builds.
            #[cfg(any(test, feature = "test-auth"))]
            if let Some(user_id_str) = token.strip_prefix("test-token:") {
                let user_id = user_id_str
                    .parse::<UserId>()
                    .map_err(|_| ApiError::Unauthorized)?;

                return Ok(AuthUser {
                    user_id,
                    role: ROLE_USER.to_string(),
                });
            }

            let claims = decode_session(token, &state.config)?;
            let user_id = claims
                .sub
                .parse::<UserId>()
                .map_err(|_| ApiError::Unauthorized)?;

            Ok(AuthUser {
                user_id,
                role: claims.role,
            })
        })
    }
}

/// Admin authentication for privileged endpoints.
///
/// Accepts either a session token whose role claim is `admin`, or the
/// `X-Admin-Key` header matching the configured ops key.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    /// Admin identifier (for audit logging).
    pub admin_id: String,
}

impl FromRequestParts<Arc<AppState>> for AdminAuth {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            // Ops tooling path: X-Admin-Key header.
            if let Some(admin_key) = parts.headers.get("x-admin-key").and_then(|v| v.to_str().ok())
            {
                let expected = state
                    .config
                    .admin_api_key
                    .as_ref()
                    .ok_or(ApiError::Unauthorized)?;
                if !crate::crypto::constant_time_eq(admin_key, expected) {
                    return Err(ApiError::Unauthorized);
                }

                let admin_id = parts
                    .headers
                    .get("x-admin-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("ops")
                    .to_string();

                tracing::info!(admin_id = %admin_id, "Admin authenticated via API key");
                return Ok(AdminAuth { admin_id });
            }

            // Session token path: role claim must be admin.
            let token = bearer_token(parts)?;

            #[cfg(any(test, feature = "test-auth"))]
            if let Some(user_id_str) = token.strip_prefix("test-admin-token:") {
                user_id_str
                    .parse::<UserId>()
                    .map_err(|_| ApiError::Unauthorized)?;
                return Ok(AdminAuth {
                    admin_id: user_id_str.to_string(),
                });
            }

            let claims = decode_session(token, &state.config)?;
            if claims.role != ROLE_ADMIN {
                return Err(ApiError::Forbidden);
            }

            tracing::info!(admin_id = %claims.sub, "Admin authenticated");
            Ok(AdminAuth {
                admin_id: claims.sub,
            })
        })
    }
}
