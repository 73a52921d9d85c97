// src/handlers/comments.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{comment::CommentResponse, tweet::ContentRequest},
    services::comments,
    state::AppState,
};

pub async fn create_comment(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(tweet_id): Path<Uuid>,
    Json(payload): Json<ContentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let comment = comments::create(state.store.as_ref(), &actor, tweet_id, &payload.content).await?;
    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}

/// Comments on a tweet, newest first.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(tweet_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let comments = comments::list_by_tweet(state.store.as_ref(), tweet_id).await?;
    let comments: Vec<CommentResponse> = comments.into_iter().map(CommentResponse::from).collect();
    Ok(Json(comments))
}

pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let comment = comments::find(state.store.as_ref(), id).await?;
    Ok(Json(CommentResponse::from(comment)))
}

pub async fn update_comment(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ContentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let comment = comments::update(state.store.as_ref(), &actor, id, &payload.content).await?;
    Ok(Json(CommentResponse::from(comment)))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    comments::delete(state.store.as_ref(), &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
