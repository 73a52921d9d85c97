// src/store/memory.rs

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    COMMENTS_TWEET_FKEY, COMMENTS_USER_FKEY, FOLLOWS_FOLLOWED_FKEY, FOLLOWS_FOLLOWER_FKEY,
    FOLLOWS_NO_SELF_CHECK, FOLLOWS_PAIR_KEY, LIKES_TWEET_FKEY, LIKES_USER_FKEY,
    LIKES_USER_TWEET_KEY, Store, StoreError, StoreResult, TWEETS_USER_FKEY, USERS_EMAIL_KEY,
    USERS_USERNAME_KEY,
    UserChanges,
};
use crate::models::{
    comment::Comment,
    follow::Follow,
    like::Like,
    tweet::Tweet,
    user::{NewUser, Role, User},
};

struct TweetRow {
    id: Uuid,
    user_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

struct CommentRow {
    id: Uuid,
    tweet_id: Uuid,
    user_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

struct LikeRow {
    id: Uuid,
    user_id: Uuid,
    tweet_id: Uuid,
    created_at: DateTime<Utc>,
}

struct FollowRow {
    id: Uuid,
    follower_id: Uuid,
    followed_id: Uuid,
    created_at: DateTime<Utc>,
}

/// Rows are kept in insertion order, so "newest first" is a reverse scan.
#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tweets: Vec<TweetRow>,
    comments: Vec<CommentRow>,
    likes: Vec<LikeRow>,
    follows: Vec<FollowRow>,
}

impl Tables {
    fn username_of(&self, user_id: Uuid) -> String {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    fn tweet(&self, row: &TweetRow) -> Tweet {
        Tweet {
            id: row.id,
            user_id: row.user_id,
            username: self.username_of(row.user_id),
            content: row.content.clone(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    fn comment(&self, row: &CommentRow) -> Comment {
        Comment {
            id: row.id,
            tweet_id: row.tweet_id,
            user_id: row.user_id,
            username: self.username_of(row.user_id),
            content: row.content.clone(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    fn like(&self, row: &LikeRow) -> Like {
        Like {
            id: row.id,
            user_id: row.user_id,
            username: self.username_of(row.user_id),
            tweet_id: row.tweet_id,
            created_at: row.created_at,
        }
    }

    fn follow(&self, row: &FollowRow) -> Follow {
        Follow {
            id: row.id,
            follower_id: row.follower_id,
            follower_username: self.username_of(row.follower_id),
            followed_id: row.followed_id,
            followed_username: self.username_of(row.followed_id),
            created_at: row.created_at,
        }
    }

    fn check_user_unique(
        &self,
        skip_id: Option<Uuid>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> StoreResult<()> {
        let others = || self.users.iter().filter(move |u| Some(u.id) != skip_id);
        if let Some(username) = username {
            if others().any(|u| u.username == username) {
                return Err(StoreError::UniqueViolation(USERS_USERNAME_KEY.to_string()));
            }
        }
        if let Some(email) = email {
            if others().any(|u| u.email == email) {
                return Err(StoreError::UniqueViolation(USERS_EMAIL_KEY.to_string()));
            }
        }
        Ok(())
    }

    fn user_exists(&self, id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == id)
    }
}

/// In-process store.
///
/// All tables sit behind a single `RwLock`; every constraint check runs
/// under the same write guard as the mutation it protects, which gives
/// the same guarantees the SQL constraints give `PgStore`.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        tables.check_user_unique(None, Some(&user.username), Some(&user.email))?;

        let role = if tables.users.is_empty() {
            Role::Admin
        } else {
            Role::User
        };
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role,
            bio: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.clone())
    }

    async fn update_user(
        &self,
        id: Uuid,
        changes: UserChanges,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;
        tables.check_user_unique(Some(id), changes.username.as_deref(), changes.email.as_deref())?;

        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(bio) = changes.bio {
            user.bio = Some(bio);
        }
        user.updated_at = now;
        Ok(Some(user.clone()))
    }

    async fn grant_admin(&self, id: Uuid, now: DateTime<Utc>) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if user.role != Role::Admin {
            user.role = Role::Admin;
            user.updated_at = now;
        }
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Ok(false);
        }

        let owned_tweets: HashSet<Uuid> = tables
            .tweets
            .iter()
            .filter(|t| t.user_id == id)
            .map(|t| t.id)
            .collect();
        tables.tweets.retain(|t| t.user_id != id);
        tables
            .comments
            .retain(|c| c.user_id != id && !owned_tweets.contains(&c.tweet_id));
        tables
            .likes
            .retain(|l| l.user_id != id && !owned_tweets.contains(&l.tweet_id));
        tables
            .follows
            .retain(|f| f.follower_id != id && f.followed_id != id);
        Ok(true)
    }

    async fn insert_tweet(&self, user_id: Uuid, content: &str) -> StoreResult<Tweet> {
        let mut tables = self.tables.write().await;
        if !tables.user_exists(user_id) {
            return Err(StoreError::ForeignKeyViolation(TWEETS_USER_FKEY.to_string()));
        }
        let now = Utc::now();
        let row = TweetRow {
            id: Uuid::new_v4(),
            user_id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        let tweet = tables.tweet(&row);
        tables.tweets.push(row);
        Ok(tweet)
    }

    async fn find_tweet(&self, id: Uuid) -> StoreResult<Option<Tweet>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tweets
            .iter()
            .find(|t| t.id == id)
            .map(|row| tables.tweet(row)))
    }

    async fn list_tweets(&self) -> StoreResult<Vec<Tweet>> {
        let tables = self.tables.read().await;
        Ok(tables.tweets.iter().rev().map(|row| tables.tweet(row)).collect())
    }

    async fn list_tweets_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Tweet>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tweets
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .map(|row| tables.tweet(row))
            .collect())
    }

    async fn update_tweet_content(
        &self,
        id: Uuid,
        owner_id: Uuid,
        content: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Tweet>> {
        let mut tables = self.tables.write().await;
        let Some(index) = tables
            .tweets
            .iter()
            .position(|t| t.id == id && t.user_id == owner_id)
        else {
            return Ok(None);
        };
        let row = &mut tables.tweets[index];
        row.content = content.to_string();
        row.updated_at = now;
        Ok(Some(tables.tweet(&tables.tweets[index])))
    }

    async fn delete_tweet(&self, id: Uuid, owner_id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.tweets.len();
        tables
            .tweets
            .retain(|t| !(t.id == id && t.user_id == owner_id));
        if tables.tweets.len() == before {
            return Ok(false);
        }
        tables.comments.retain(|c| c.tweet_id != id);
        tables.likes.retain(|l| l.tweet_id != id);
        Ok(true)
    }

    async fn insert_comment(
        &self,
        tweet_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> StoreResult<Comment> {
        let mut tables = self.tables.write().await;
        if !tables.tweets.iter().any(|t| t.id == tweet_id) {
            return Err(StoreError::ForeignKeyViolation(COMMENTS_TWEET_FKEY.to_string()));
        }
        if !tables.user_exists(user_id) {
            return Err(StoreError::ForeignKeyViolation(COMMENTS_USER_FKEY.to_string()));
        }
        let now = Utc::now();
        let row = CommentRow {
            id: Uuid::new_v4(),
            tweet_id,
            user_id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        let comment = tables.comment(&row);
        tables.comments.push(row);
        Ok(comment)
    }

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .find(|c| c.id == id)
            .map(|row| tables.comment(row)))
    }

    async fn list_comments_by_tweet(&self, tweet_id: Uuid) -> StoreResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .rev()
            .filter(|c| c.tweet_id == tweet_id)
            .map(|row| tables.comment(row))
            .collect())
    }

    async fn update_comment_content(
        &self,
        id: Uuid,
        owner_id: Uuid,
        content: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Comment>> {
        let mut tables = self.tables.write().await;
        let Some(index) = tables
            .comments
            .iter()
            .position(|c| c.id == id && c.user_id == owner_id)
        else {
            return Ok(None);
        };
        let row = &mut tables.comments[index];
        row.content = content.to_string();
        row.updated_at = now;
        Ok(Some(tables.comment(&tables.comments[index])))
    }

    async fn delete_comment(&self, id: Uuid, owner_id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables
            .comments
            .retain(|c| !(c.id == id && c.user_id == owner_id));
        Ok(tables.comments.len() != before)
    }

    async fn insert_like(&self, user_id: Uuid, tweet_id: Uuid) -> StoreResult<Like> {
        let mut tables = self.tables.write().await;
        if !tables.tweets.iter().any(|t| t.id == tweet_id) {
            return Err(StoreError::ForeignKeyViolation(LIKES_TWEET_FKEY.to_string()));
        }
        if !tables.user_exists(user_id) {
            return Err(StoreError::ForeignKeyViolation(LIKES_USER_FKEY.to_string()));
        }
        if tables
            .likes
            .iter()
            .any(|l| l.user_id == user_id && l.tweet_id == tweet_id)
        {
            return Err(StoreError::UniqueViolation(LIKES_USER_TWEET_KEY.to_string()));
        }
        let row = LikeRow {
            id: Uuid::new_v4(),
            user_id,
            tweet_id,
            created_at: Utc::now(),
        };
        let like = tables.like(&row);
        tables.likes.push(row);
        Ok(like)
    }

    async fn find_like(&self, id: Uuid) -> StoreResult<Option<Like>> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .iter()
            .find(|l| l.id == id)
            .map(|row| tables.like(row)))
    }

    async fn find_like_by_pair(&self, user_id: Uuid, tweet_id: Uuid) -> StoreResult<Option<Like>> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .iter()
            .find(|l| l.user_id == user_id && l.tweet_id == tweet_id)
            .map(|row| tables.like(row)))
    }

    async fn list_likes_by_tweet(&self, tweet_id: Uuid) -> StoreResult<Vec<Like>> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .iter()
            .filter(|l| l.tweet_id == tweet_id)
            .map(|row| tables.like(row))
            .collect())
    }

    async fn list_likes_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Like>> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .iter()
            .filter(|l| l.user_id == user_id)
            .map(|row| tables.like(row))
            .collect())
    }

    async fn delete_like(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.likes.len();
        tables.likes.retain(|l| l.id != id);
        Ok(tables.likes.len() != before)
    }

    async fn insert_follow(&self, follower_id: Uuid, followed_id: Uuid) -> StoreResult<Follow> {
        let mut tables = self.tables.write().await;
        if follower_id == followed_id {
            return Err(StoreError::CheckViolation(FOLLOWS_NO_SELF_CHECK.to_string()));
        }
        if !tables.user_exists(follower_id) {
            return Err(StoreError::ForeignKeyViolation(FOLLOWS_FOLLOWER_FKEY.to_string()));
        }
        if !tables.user_exists(followed_id) {
            return Err(StoreError::ForeignKeyViolation(FOLLOWS_FOLLOWED_FKEY.to_string()));
        }
        if tables
            .follows
            .iter()
            .any(|f| f.follower_id == follower_id && f.followed_id == followed_id)
        {
            return Err(StoreError::UniqueViolation(FOLLOWS_PAIR_KEY.to_string()));
        }
        let row = FollowRow {
            id: Uuid::new_v4(),
            follower_id,
            followed_id,
            created_at: Utc::now(),
        };
        let follow = tables.follow(&row);
        tables.follows.push(row);
        Ok(follow)
    }

    async fn find_follow(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> StoreResult<Option<Follow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .find(|f| f.follower_id == follower_id && f.followed_id == followed_id)
            .map(|row| tables.follow(row)))
    }

    async fn list_following(&self, user_id: Uuid) -> StoreResult<Vec<Follow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .filter(|f| f.follower_id == user_id)
            .map(|row| tables.follow(row))
            .collect())
    }

    async fn list_followers(&self, user_id: Uuid) -> StoreResult<Vec<Follow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .filter(|f| f.followed_id == user_id)
            .map(|row| tables.follow(row))
            .collect())
    }

    async fn delete_follow(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.follows.len();
        tables.follows.retain(|f| f.id != id);
        Ok(tables.follows.len() != before)
    }
}
