// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    auth::CurrentUser,
    error::AppError,
    models::user::{LoginRequest, RegisterRequest, UserResponse},
    services::users,
    state::AppState,
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created and the user object (excluding password).
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = users::register(state.store.as_ref(), state.hasher.as_ref(), &payload).await?;
    tracing::info!("Registered user '{}' with role {}", user.username, user.role);

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Authenticates a user and returns a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|_| AppError::InvalidCredentials)?;

    let response = users::login(
        state.store.as_ref(),
        state.hasher.as_ref(),
        &state.tokens,
        &payload,
    )
    .await?;

    Ok(Json(response))
}

/// Returns the identity the presented token resolves to.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}
