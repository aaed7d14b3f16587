//! User registration, login, and profile handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use seatwise_core::{Category, CreditTransaction, Gender, User, UserId, SIGNUP_BONUS_CREDITS};
use seatwise_store::Store;

use crate::auth::{issue_session, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;

/// User profile response.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Mobile number.
    pub mobile: String,
    /// Gender.
    pub gender: Gender,
    /// Reservation category.
    pub category: Category,
    /// Home state.
    pub home_state: String,
    /// Current credit balance.
    pub credits: i64,
    /// Lifetime recharged credits.
    pub lifetime_recharged: i64,
    /// Lifetime spent credits.
    pub lifetime_spent: i64,
    /// Created timestamp.
    pub created_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            mobile: user.mobile.clone(),
            gender: user.gender,
            category: user.category,
            home_state: user.home_state.clone(),
            credits: user.credits,
            lifetime_recharged: user.lifetime_recharged,
            lifetime_spent: user.lifetime_spent,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Email address (must be unique).
    pub email: String,
    /// Mobile number.
    pub mobile: String,
    /// Gender.
    pub gender: Gender,
    /// Reservation category.
    pub category: Category,
    /// Home state.
    pub home_state: String,
}

/// Session response returned by register and login.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// The session token.
    pub token: String,
    /// The user profile.
    pub user: UserResponse,
}

/// Register a new user.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let email = body.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::BadRequest("Invalid email".into()));
    }
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Name is required".into()));
    }
    if body.mobile.trim().is_empty() {
        return Err(ApiError::BadRequest("Mobile number is required".into()));
    }

    if state.store.get_user_by_email(email)?.is_some() {
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let user = User::new(
        UserId::generate(),
        body.name.trim().to_string(),
        email.to_string(),
        body.mobile.trim().to_string(),
        body.gender,
        body.category,
        body.home_state.trim().to_string(),
    );

    let bonus = CreditTransaction::signup_bonus(user.user_id, SIGNUP_BONUS_CREDITS);
    state.store.create_user(&user, &bonus)?;

    tracing::info!(user_id = %user.user_id, "User registered");

    let token = issue_session(&user, &state.config)?;
    Ok(Json(SessionResponse {
        token,
        user: UserResponse::from(&user),
    }))
}

/// Login request: the email/mobile pair is the credential.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Mobile number registered with the email.
    pub mobile: String,
}

/// Log in an existing user.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let user = state
        .store
        .get_user_by_email(body.email.trim())?
        .ok_or(ApiError::Unauthorized)?;

    if user.mobile != body.mobile.trim() {
        return Err(ApiError::Unauthorized);
    }

    tracing::info!(user_id = %user.user_id, "User logged in");

    let token = issue_session(&user, &state.config)?;
    Ok(Json(SessionResponse {
        token,
        user: UserResponse::from(&user),
    }))
}

/// Get the current user's profile.
pub async fn me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(UserResponse::from(&user)))
}
