// src/handlers/likes.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    auth::CurrentUser,
    error::AppError,
    models::like::LikeResponse,
    services::likes,
    state::AppState,
};

/// Like a tweet. A second like from the same user is rejected.
pub async fn like_tweet(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(tweet_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let like = likes::create(state.store.as_ref(), &actor, tweet_id).await?;
    Ok((StatusCode::CREATED, Json(LikeResponse::from(like))))
}

pub async fn unlike_tweet(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(tweet_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    likes::delete(state.store.as_ref(), &actor, tweet_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_tweet_likes(
    State(state): State<AppState>,
    Path(tweet_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let likes = likes::list_by_tweet(state.store.as_ref(), tweet_id).await?;
    let likes: Vec<LikeResponse> = likes.into_iter().map(LikeResponse::from).collect();
    Ok(Json(likes))
}

pub async fn list_user_likes(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let likes = likes::list_by_user(state.store.as_ref(), &username).await?;
    let likes: Vec<LikeResponse> = likes.into_iter().map(LikeResponse::from).collect();
    Ok(Json(likes))
}

pub async fn get_like(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let like = likes::find(state.store.as_ref(), id).await?;
    Ok(Json(LikeResponse::from(like)))
}
