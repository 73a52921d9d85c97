// src/services/comments.rs

use chrono::Utc;
use uuid::Uuid;

use crate::{
    auth::policy::{Capability, authorize},
    error::{AppError, AuthFailure},
    models::{comment::Comment, user::User},
    services::{check_content, tweets},
    store::{COMMENTS_TWEET_FKEY, COMMENTS_USER_FKEY, Store},
};

const RESOURCE: &str = "Comment";

/// Attaches a comment to an existing tweet.
pub async fn create(
    store: &dyn Store,
    actor: &User,
    tweet_id: Uuid,
    content: &str,
) -> Result<Comment, AppError> {
    tweets::find(store, tweet_id).await?;
    check_content(content)?;

    // The tweet may be deleted between the lookup and the insert.
    store
        .insert_comment(tweet_id, actor.id, content)
        .await
        .map_err(|e| match e {
            e if e.is_foreign_key_violation(COMMENTS_TWEET_FKEY) => AppError::TweetNotFound(tweet_id),
            e if e.is_foreign_key_violation(COMMENTS_USER_FKEY) => {
                AppError::Unauthorized(AuthFailure::UserNotFound)
            }
            other => AppError::from(other),
        })
}

pub async fn find(store: &dyn Store, id: Uuid) -> Result<Comment, AppError> {
    store
        .find_comment(id)
        .await?
        .ok_or(AppError::CommentNotFound(id))
}

/// Comments on `tweet_id`, newest first.
pub async fn list_by_tweet(store: &dyn Store, tweet_id: Uuid) -> Result<Vec<Comment>, AppError> {
    tweets::find(store, tweet_id).await?;
    Ok(store.list_comments_by_tweet(tweet_id).await?)
}

pub async fn update(
    store: &dyn Store,
    actor: &User,
    id: Uuid,
    content: &str,
) -> Result<Comment, AppError> {
    let comment = find(store, id).await?;
    authorize(actor, Capability::OwnerOnly(comment.user_id), RESOURCE)?;

    check_content(content)?;
    if content == comment.content {
        return Err(AppError::ContentIsTheSame);
    }

    store
        .update_comment_content(id, actor.id, content, Utc::now())
        .await?
        .ok_or(AppError::CommentNotFound(id))
}

pub async fn delete(store: &dyn Store, actor: &User, id: Uuid) -> Result<(), AppError> {
    let comment = find(store, id).await?;
    authorize(actor, Capability::OwnerOnly(comment.user_id), RESOURCE)?;

    if !store.delete_comment(id, actor.id).await? {
        return Err(AppError::CommentNotFound(id));
    }
    Ok(())
}
