use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A directed follow edge. `follower_id != followed_id`, and at most one
/// edge exists per ordered pair; the reverse pair is a separate edge.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Follow {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub follower_username: String,
    pub followed_id: Uuid,
    pub followed_username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowResponse {
    pub follow_id: Uuid,
    pub follower: String,
    pub followed: String,
    pub created_at: DateTime<Utc>,
}

impl From<Follow> for FollowResponse {
    fn from(follow: Follow) -> Self {
        Self {
            follow_id: follow.id,
            follower: follow.follower_username,
            followed: follow.followed_username,
            created_at: follow.created_at,
        }
    }
}

/// One entry of a following/followers listing: the edge and the user on
/// the other side of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowEdgeResponse {
    pub follow_id: Uuid,
    pub username: String,
}
