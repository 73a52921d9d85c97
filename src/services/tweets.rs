// src/services/tweets.rs

use chrono::Utc;
use uuid::Uuid;

use crate::{
    auth::policy::{Capability, authorize},
    error::{AppError, AuthFailure},
    models::{comment::Comment, tweet::Tweet, user::User},
    services::{check_content, user_by_username},
    store::{Store, TWEETS_USER_FKEY},
};

const RESOURCE: &str = "Tweet";

pub async fn create(store: &dyn Store, actor: &User, content: &str) -> Result<Tweet, AppError> {
    check_content(content)?;
    store
        .insert_tweet(actor.id, content)
        .await
        .map_err(|e| match e {
            e if e.is_foreign_key_violation(TWEETS_USER_FKEY) => {
                AppError::Unauthorized(AuthFailure::UserNotFound)
            }
            other => AppError::from(other),
        })
}

/// All tweets, or only those by `username`, newest first.
pub async fn list(store: &dyn Store, username: Option<&str>) -> Result<Vec<Tweet>, AppError> {
    match username {
        Some(username) => {
            let author = user_by_username(store, username).await?;
            Ok(store.list_tweets_by_user(author.id).await?)
        }
        None => Ok(store.list_tweets().await?),
    }
}

pub async fn find(store: &dyn Store, id: Uuid) -> Result<Tweet, AppError> {
    store.find_tweet(id).await?.ok_or(AppError::TweetNotFound(id))
}

/// A tweet and its comments, newest first.
pub async fn get_with_comments(
    store: &dyn Store,
    id: Uuid,
) -> Result<(Tweet, Vec<Comment>), AppError> {
    let tweet = find(store, id).await?;
    let comments = store.list_comments_by_tweet(id).await?;
    Ok((tweet, comments))
}

/// Replaces the content of a tweet owned by `actor`. Content that is
/// byte-identical to the current content is rejected.
pub async fn update(
    store: &dyn Store,
    actor: &User,
    id: Uuid,
    content: &str,
) -> Result<Tweet, AppError> {
    let tweet = find(store, id).await?;
    authorize(actor, Capability::OwnerOnly(tweet.user_id), RESOURCE)?;

    check_content(content)?;
    if content == tweet.content {
        return Err(AppError::ContentIsTheSame);
    }

    // The write is conditional on id and owner; a concurrent delete
    // surfaces here as `None`.
    store
        .update_tweet_content(id, actor.id, content, Utc::now())
        .await?
        .ok_or(AppError::TweetNotFound(id))
}

pub async fn delete(store: &dyn Store, actor: &User, id: Uuid) -> Result<(), AppError> {
    let tweet = find(store, id).await?;
    authorize(actor, Capability::OwnerOnly(tweet.user_id), RESOURCE)?;

    if !store.delete_tweet(id, actor.id).await? {
        return Err(AppError::TweetNotFound(id));
    }
    Ok(())
}
