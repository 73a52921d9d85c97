use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A like edge. At most one exists per (user, tweet) pair.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Like {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub tweet_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResponse {
    pub id: Uuid,
    pub username: String,
    pub tweet_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Like> for LikeResponse {
    fn from(like: Like) -> Self {
        Self {
            id: like.id,
            username: like.username,
            tweet_id: like.tweet_id,
            created_at: like.created_at,
        }
    }
}
