// src/services/likes.rs

use uuid::Uuid;

use crate::{
    error::{AppError, AuthFailure},
    models::{like::Like, user::User},
    services::{tweets, user_by_username},
    store::{LIKES_TWEET_FKEY, LIKES_USER_FKEY, LIKES_USER_TWEET_KEY, Store},
};

/// Likes a tweet on behalf of `actor`.
///
/// The pre-check gives the common duplicate a cheap answer; the store's
/// unique (user, tweet) constraint is what keeps concurrent duplicates out.
pub async fn create(store: &dyn Store, actor: &User, tweet_id: Uuid) -> Result<Like, AppError> {
    tweets::find(store, tweet_id).await?;

    if store.find_like_by_pair(actor.id, tweet_id).await?.is_some() {
        return Err(AppError::LikeAlreadyRegistered);
    }

    store
        .insert_like(actor.id, tweet_id)
        .await
        .map_err(|e| match e {
            e if e.is_unique_violation(LIKES_USER_TWEET_KEY) => AppError::LikeAlreadyRegistered,
            e if e.is_foreign_key_violation(LIKES_TWEET_FKEY) => AppError::TweetNotFound(tweet_id),
            // The acting account was deleted after its token resolved.
            e if e.is_foreign_key_violation(LIKES_USER_FKEY) => {
                AppError::Unauthorized(AuthFailure::UserNotFound)
            }
            other => AppError::from(other),
        })
}

/// Removes `actor`'s like from a tweet.
pub async fn delete(store: &dyn Store, actor: &User, tweet_id: Uuid) -> Result<(), AppError> {
    tweets::find(store, tweet_id).await?;

    let like = store
        .find_like_by_pair(actor.id, tweet_id)
        .await?
        .ok_or(AppError::LikeNotFound)?;

    // Lost a race with a concurrent unlike.
    if !store.delete_like(like.id).await? {
        return Err(AppError::LikeNotFound);
    }
    Ok(())
}

pub async fn find(store: &dyn Store, id: Uuid) -> Result<Like, AppError> {
    store.find_like(id).await?.ok_or(AppError::LikeNotFound)
}

pub async fn list_by_tweet(store: &dyn Store, tweet_id: Uuid) -> Result<Vec<Like>, AppError> {
    tweets::find(store, tweet_id).await?;
    Ok(store.list_likes_by_tweet(tweet_id).await?)
}

pub async fn list_by_user(store: &dyn Store, username: &str) -> Result<Vec<Like>, AppError> {
    let user = user_by_username(store, username).await?;
    Ok(store.list_likes_by_user(user.id).await?)
}
