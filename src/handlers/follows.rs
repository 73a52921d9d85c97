// src/handlers/follows.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    auth::CurrentUser,
    error::AppError,
    models::follow::FollowResponse,
    services::follows,
    state::AppState,
};

/// Follow `username` as the calling user.
pub async fn follow_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let follow = follows::create(state.store.as_ref(), &actor, &username).await?;
    Ok((StatusCode::CREATED, Json(FollowResponse::from(follow))))
}

pub async fn unfollow_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    follows::delete(state.store.as_ref(), &actor, &username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_following(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let edges = follows::list_following(state.store.as_ref(), &username).await?;
    Ok(Json(edges))
}

pub async fn list_followers(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let edges = follows::list_followers(state.store.as_ref(), &username).await?;
    Ok(Json(edges))
}
