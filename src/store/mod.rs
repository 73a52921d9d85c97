// src/store/mod.rs

//! Persistence seam for users, tweets, comments and relationship edges.
//!
//! Every implementation must enforce the same constraints as the SQL
//! schema in `migrations/`: unique usernames and e-mails, one like per
//! (user, tweet), one follow per ordered (follower, followed) pair, no
//! self-follow, and cascading deletes. Services rely on these constraints
//! as the final word on uniqueness; their own existence checks only give
//! friendlier errors on the common path.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    comment::Comment,
    follow::Follow,
    like::Like,
    tweet::Tweet,
    user::{NewUser, User},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

// Constraint names, shared by the schema and the in-process store.
pub const USERS_USERNAME_KEY: &str = "users_username_key";
pub const USERS_EMAIL_KEY: &str = "users_email_key";
pub const LIKES_USER_TWEET_KEY: &str = "likes_user_id_tweet_id_key";
pub const FOLLOWS_PAIR_KEY: &str = "follows_follower_id_followed_id_key";
pub const FOLLOWS_NO_SELF_CHECK: &str = "follows_no_self_follow";
pub const TWEETS_USER_FKEY: &str = "tweets_user_id_fkey";
pub const COMMENTS_TWEET_FKEY: &str = "comments_tweet_id_fkey";
pub const COMMENTS_USER_FKEY: &str = "comments_user_id_fkey";
pub const LIKES_TWEET_FKEY: &str = "likes_tweet_id_fkey";
pub const LIKES_USER_FKEY: &str = "likes_user_id_fkey";
pub const FOLLOWS_FOLLOWER_FKEY: &str = "follows_follower_id_fkey";
pub const FOLLOWS_FOLLOWED_FKEY: &str = "follows_followed_id_fkey";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint '{0}' violated")]
    UniqueViolation(String),

    #[error("check constraint '{0}' violated")]
    CheckViolation(String),

    #[error("foreign key constraint '{0}' violated")]
    ForeignKeyViolation(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    pub fn is_unique_violation(&self, constraint: &str) -> bool {
        matches!(self, StoreError::UniqueViolation(name) if name == constraint)
    }

    pub fn is_foreign_key_violation(&self, constraint: &str) -> bool {
        matches!(self, StoreError::ForeignKeyViolation(name) if name == constraint)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db) = err.as_database_error() {
            let constraint = db.constraint().unwrap_or_default().to_string();
            if db.is_unique_violation() {
                return StoreError::UniqueViolation(constraint);
            }
            if db.is_check_violation() {
                return StoreError::CheckViolation(constraint);
            }
            if db.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation(constraint);
            }
        }
        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Field-level changes applied by `Store::update_user`.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub bio: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.bio.is_none()
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    // --- Users ---

    /// Inserts a user. The very first user ever stored is given
    /// `Role::Admin`, everyone else `Role::User`; the emptiness check and
    /// the insert happen as one serialized step.
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;
    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    /// Returns `None` when the user no longer exists.
    async fn update_user(
        &self,
        id: Uuid,
        changes: UserChanges,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<User>>;
    async fn grant_admin(&self, id: Uuid, now: DateTime<Utc>) -> StoreResult<Option<User>>;
    /// Deletes the user and everything hanging off it. Returns whether a row was removed.
    async fn delete_user(&self, id: Uuid) -> StoreResult<bool>;

    // --- Tweets ---

    async fn insert_tweet(&self, user_id: Uuid, content: &str) -> StoreResult<Tweet>;
    async fn find_tweet(&self, id: Uuid) -> StoreResult<Option<Tweet>>;
    /// Newest first.
    async fn list_tweets(&self) -> StoreResult<Vec<Tweet>>;
    /// Newest first.
    async fn list_tweets_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Tweet>>;
    /// Owner-conditional write: `None` unless a tweet with this id owned by `owner_id` exists.
    async fn update_tweet_content(
        &self,
        id: Uuid,
        owner_id: Uuid,
        content: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Tweet>>;
    /// Owner-conditional delete.
    async fn delete_tweet(&self, id: Uuid, owner_id: Uuid) -> StoreResult<bool>;

    // --- Comments ---

    async fn insert_comment(
        &self,
        tweet_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> StoreResult<Comment>;
    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>>;
    /// Newest first.
    async fn list_comments_by_tweet(&self, tweet_id: Uuid) -> StoreResult<Vec<Comment>>;
    async fn update_comment_content(
        &self,
        id: Uuid,
        owner_id: Uuid,
        content: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Comment>>;
    async fn delete_comment(&self, id: Uuid, owner_id: Uuid) -> StoreResult<bool>;

    // --- Likes ---

    async fn insert_like(&self, user_id: Uuid, tweet_id: Uuid) -> StoreResult<Like>;
    async fn find_like(&self, id: Uuid) -> StoreResult<Option<Like>>;
    async fn find_like_by_pair(&self, user_id: Uuid, tweet_id: Uuid) -> StoreResult<Option<Like>>;
    async fn list_likes_by_tweet(&self, tweet_id: Uuid) -> StoreResult<Vec<Like>>;
    async fn list_likes_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Like>>;
    async fn delete_like(&self, id: Uuid) -> StoreResult<bool>;

    // --- Follows ---

    async fn insert_follow(&self, follower_id: Uuid, followed_id: Uuid) -> StoreResult<Follow>;
    async fn find_follow(&self, follower_id: Uuid, followed_id: Uuid)
    -> StoreResult<Option<Follow>>;
    /// Edges where `user_id` is the follower.
    async fn list_following(&self, user_id: Uuid) -> StoreResult<Vec<Follow>>;
    /// Edges where `user_id` is the followed side.
    async fn list_followers(&self, user_id: Uuid) -> StoreResult<Vec<Follow>>;
    async fn delete_follow(&self, id: Uuid) -> StoreResult<bool>;
}

/// Shared handle to the store, as held by the application state.
pub type StoreState = Arc<dyn Store>;
