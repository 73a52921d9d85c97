// src/handlers/tweets.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{
        comment::CommentResponse,
        tweet::{ContentRequest, TweetDetailResponse, TweetListParams, TweetResponse},
    },
    services::tweets,
    state::AppState,
};

/// Create a new tweet.
pub async fn create_tweet(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(payload): Json<ContentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tweet = tweets::create(state.store.as_ref(), &actor, &payload.content).await?;
    Ok((StatusCode::CREATED, Json(TweetResponse::from(tweet))))
}

/// List tweets (recent first), optionally by author.
pub async fn list_tweets(
    State(state): State<AppState>,
    Query(params): Query<TweetListParams>,
) -> Result<impl IntoResponse, AppError> {
    let tweets = tweets::list(state.store.as_ref(), params.username.as_deref()).await?;
    let tweets: Vec<TweetResponse> = tweets.into_iter().map(TweetResponse::from).collect();
    Ok(Json(tweets))
}

/// Get a single tweet with its comments.
pub async fn get_tweet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (tweet, comments) = tweets::get_with_comments(state.store.as_ref(), id).await?;

    Ok(Json(TweetDetailResponse {
        tweet: tweet.into(),
        comments: comments.into_iter().map(CommentResponse::from).collect(),
    }))
}

/// Replace a tweet's content. Owner only.
pub async fn update_tweet(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ContentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tweet = tweets::update(state.store.as_ref(), &actor, id, &payload.content).await?;
    Ok(Json(TweetResponse::from(tweet)))
}

/// Delete a tweet. Owner only.
pub async fn delete_tweet(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    tweets::delete(state.store.as_ref(), &actor, id).await?;
    tracing::info!("Tweet {} deleted by '{}'", id, actor.username);
    Ok(StatusCode::NO_CONTENT)
}
