// src/store/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{Store, StoreError, StoreResult, UserChanges};
use crate::models::{
    comment::Comment,
    follow::Follow,
    like::Like,
    tweet::Tweet,
    user::{NewUser, Role, User},
};

/// Advisory lock key serializing registrations, so only one of several
/// concurrent first registrations observes an empty `users` table.
const USER_BOOTSTRAP_LOCK: i64 = 0x7573_6572_735f_6264;

const USER_COLUMNS: &str = "id, username, email, password_hash, role, bio, created_at, updated_at";

const TWEET_SELECT: &str = r#"
    SELECT t.id, t.user_id, u.username, t.content, t.created_at, t.updated_at
    FROM tweets t
    JOIN users u ON u.id = t.user_id
"#;

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.tweet_id, c.user_id, u.username, c.content, c.created_at, c.updated_at
    FROM comments c
    JOIN users u ON u.id = c.user_id
"#;

const LIKE_SELECT: &str = r#"
    SELECT l.id, l.user_id, u.username, l.tweet_id, l.created_at
    FROM likes l
    JOIN users u ON u.id = l.user_id
"#;

const FOLLOW_SELECT: &str = r#"
    SELECT f.id, f.follower_id, a.username AS follower_username,
           f.followed_id, b.username AS followed_username, f.created_at
    FROM follows f
    JOIN users a ON a.id = f.follower_id
    JOIN users b ON b.id = f.followed_id
"#;

/// Raw 'users' row; the role column is stored as text.
#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    bio: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| StoreError::Database(sqlx::Error::Decode(e.into())))?;
        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role,
            bio: row.bio,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_user(row: Option<UserRow>) -> StoreResult<Option<User>> {
    row.map(User::try_from).transpose()
}

/// PostgreSQL-backed store. Uniqueness, self-follow and cascade rules live
/// in the schema; violations come back as `StoreError` constraint variants.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(USER_BOOTSTRAP_LOCK)
            .execute(&mut *tx)
            .await?;

        let has_users = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users)")
            .fetch_one(&mut *tx)
            .await?;
        let role = if has_users { Role::User } else { Role::Admin };

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, username, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(role.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        User::try_from(row)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        into_user(row)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        into_user(row)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        into_user(row)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(User::try_from)
        .collect()
    }

    async fn update_user(
        &self,
        id: Uuid,
        changes: UserChanges,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<User>> {
        // COALESCE keeps columns whose change is absent.
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                bio = COALESCE($5, bio),
                updated_at = $6
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.username)
        .bind(changes.email)
        .bind(changes.password_hash)
        .bind(changes.bio)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        into_user(row)
    }

    async fn grant_admin(&self, id: Uuid, now: DateTime<Utc>) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET
                updated_at = CASE WHEN role = 'ADMIN' THEN updated_at ELSE $2 END,
                role = 'ADMIN'
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        into_user(row)
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_tweet(&self, user_id: Uuid, content: &str) -> StoreResult<Tweet> {
        let tweet = sqlx::query_as::<_, Tweet>(
            r#"
            WITH t AS (
                INSERT INTO tweets (id, user_id, content)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT t.id, t.user_id, u.username, t.content, t.created_at, t.updated_at
            FROM t
            JOIN users u ON u.id = t.user_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;
        Ok(tweet)
    }

    async fn find_tweet(&self, id: Uuid) -> StoreResult<Option<Tweet>> {
        let tweet = sqlx::query_as::<_, Tweet>(&format!("{TWEET_SELECT} WHERE t.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tweet)
    }

    async fn list_tweets(&self) -> StoreResult<Vec<Tweet>> {
        let tweets =
            sqlx::query_as::<_, Tweet>(&format!("{TWEET_SELECT} ORDER BY t.created_at DESC"))
                .fetch_all(&self.pool)
                .await?;
        Ok(tweets)
    }

    async fn list_tweets_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Tweet>> {
        let tweets = sqlx::query_as::<_, Tweet>(&format!(
            "{TWEET_SELECT} WHERE t.user_id = $1 ORDER BY t.created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tweets)
    }

    async fn update_tweet_content(
        &self,
        id: Uuid,
        owner_id: Uuid,
        content: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Tweet>> {
        let tweet = sqlx::query_as::<_, Tweet>(
            r#"
            WITH t AS (
                UPDATE tweets SET content = $3, updated_at = $4
                WHERE id = $1 AND user_id = $2
                RETURNING *
            )
            SELECT t.id, t.user_id, u.username, t.content, t.created_at, t.updated_at
            FROM t
            JOIN users u ON u.id = t.user_id
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(content)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tweet)
    }

    async fn delete_tweet(&self, id: Uuid, owner_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tweets WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_comment(
        &self,
        tweet_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> StoreResult<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            WITH c AS (
                INSERT INTO comments (id, tweet_id, user_id, content)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            )
            SELECT c.id, c.tweet_id, c.user_id, u.username, c.content, c.created_at, c.updated_at
            FROM c
            JOIN users u ON u.id = c.user_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tweet_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(&format!("{COMMENT_SELECT} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn list_comments_by_tweet(&self, tweet_id: Uuid) -> StoreResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "{COMMENT_SELECT} WHERE c.tweet_id = $1 ORDER BY c.created_at DESC"
        ))
        .bind(tweet_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    async fn update_comment_content(
        &self,
        id: Uuid,
        owner_id: Uuid,
        content: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            WITH c AS (
                UPDATE comments SET content = $3, updated_at = $4
                WHERE id = $1 AND user_id = $2
                RETURNING *
            )
            SELECT c.id, c.tweet_id, c.user_id, u.username, c.content, c.created_at, c.updated_at
            FROM c
            JOIN users u ON u.id = c.user_id
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(content)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn delete_comment(&self, id: Uuid, owner_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_like(&self, user_id: Uuid, tweet_id: Uuid) -> StoreResult<Like> {
        let like = sqlx::query_as::<_, Like>(
            r#"
            WITH l AS (
                INSERT INTO likes (id, user_id, tweet_id)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT l.id, l.user_id, u.username, l.tweet_id, l.created_at
            FROM l
            JOIN users u ON u.id = l.user_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(tweet_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(like)
    }

    async fn find_like(&self, id: Uuid) -> StoreResult<Option<Like>> {
        let like = sqlx::query_as::<_, Like>(&format!("{LIKE_SELECT} WHERE l.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(like)
    }

    async fn find_like_by_pair(&self, user_id: Uuid, tweet_id: Uuid) -> StoreResult<Option<Like>> {
        let like = sqlx::query_as::<_, Like>(&format!(
            "{LIKE_SELECT} WHERE l.user_id = $1 AND l.tweet_id = $2"
        ))
        .bind(user_id)
        .bind(tweet_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(like)
    }

    async fn list_likes_by_tweet(&self, tweet_id: Uuid) -> StoreResult<Vec<Like>> {
        let likes = sqlx::query_as::<_, Like>(&format!(
            "{LIKE_SELECT} WHERE l.tweet_id = $1 ORDER BY l.created_at ASC"
        ))
        .bind(tweet_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(likes)
    }

    async fn list_likes_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Like>> {
        let likes = sqlx::query_as::<_, Like>(&format!(
            "{LIKE_SELECT} WHERE l.user_id = $1 ORDER BY l.created_at ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(likes)
    }

    async fn delete_like(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM likes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_follow(&self, follower_id: Uuid, followed_id: Uuid) -> StoreResult<Follow> {
        let follow = sqlx::query_as::<_, Follow>(
            r#"
            WITH f AS (
                INSERT INTO follows (id, follower_id, followed_id)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT f.id, f.follower_id, a.username AS follower_username,
                   f.followed_id, b.username AS followed_username, f.created_at
            FROM f
            JOIN users a ON a.id = f.follower_id
            JOIN users b ON b.id = f.followed_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(follower_id)
        .bind(followed_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(follow)
    }

    async fn find_follow(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> StoreResult<Option<Follow>> {
        let follow = sqlx::query_as::<_, Follow>(&format!(
            "{FOLLOW_SELECT} WHERE f.follower_id = $1 AND f.followed_id = $2"
        ))
        .bind(follower_id)
        .bind(followed_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(follow)
    }

    async fn list_following(&self, user_id: Uuid) -> StoreResult<Vec<Follow>> {
        let follows = sqlx::query_as::<_, Follow>(&format!(
            "{FOLLOW_SELECT} WHERE f.follower_id = $1 ORDER BY f.created_at ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(follows)
    }

    async fn list_followers(&self, user_id: Uuid) -> StoreResult<Vec<Follow>> {
        let follows = sqlx::query_as::<_, Follow>(&format!(
            "{FOLLOW_SELECT} WHERE f.followed_id = $1 ORDER BY f.created_at ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(follows)
    }

    async fn delete_follow(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM follows WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
