// src/handlers/users.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    auth::CurrentUser,
    error::AppError,
    models::user::{UpdateUserRequest, UserResponse},
    services::users,
    state::AppState,
};

/// Lists all users in the system.
/// Admin only.
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let users = users::list(state.store.as_ref(), &actor).await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(users))
}

/// Self or admin.
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = users::get(state.store.as_ref(), &actor, &username).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Partially updates a profile. Self or admin.
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(username): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = users::update(
        state.store.as_ref(),
        state.hasher.as_ref(),
        &actor,
        &username,
        payload,
    )
    .await?;

    tracing::info!("User '{}' updated by '{}'", user.username, actor.username);
    Ok(Json(UserResponse::from(user)))
}

/// Deletes an account and everything it owns. Self or admin.
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    users::delete(state.store.as_ref(), &actor, &username).await?;
    tracing::info!("User '{}' deleted by '{}'", username, actor.username);
    Ok(StatusCode::NO_CONTENT)
}

/// Grants the ADMIN role.
/// Admin only.
pub async fn grant_admin(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = users::grant_admin(state.store.as_ref(), &actor, &username).await?;
    tracing::info!("User '{}' granted ADMIN by '{}'", user.username, actor.username);
    Ok(Json(UserResponse::from(user)))
}
