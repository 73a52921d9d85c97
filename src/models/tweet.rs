// src/models/tweet.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::comment::CommentResponse;

/// Represents the 'tweets' table, joined with the author's current username.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Tweet {
    pub id: Uuid,
    /// Owner. Immutable after creation.
    pub user_id: Uuid,
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating or replacing a tweet's content.
/// Shared by comments, which follow the same content rules.
#[derive(Debug, Deserialize, Validate)]
pub struct ContentRequest {
    #[validate(length(
        min = 1,
        max = 1024,
        message = "Content must be between 1 and 1024 characters"
    ))]
    pub content: String,
}

/// Query parameters for listing tweets.
#[derive(Debug, Deserialize)]
pub struct TweetListParams {
    /// Restrict to tweets authored by this username.
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetResponse {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub username: String,
}

impl From<Tweet> for TweetResponse {
    fn from(tweet: Tweet) -> Self {
        Self {
            id: tweet.id,
            content: tweet.content,
            created_at: tweet.created_at,
            updated_at: tweet.updated_at,
            username: tweet.username,
        }
    }
}

/// A single tweet together with its comments, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetDetailResponse {
    #[serde(flatten)]
    pub tweet: TweetResponse,
    pub comments: Vec<CommentResponse>,
}
