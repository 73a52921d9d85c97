// src/services/follows.rs

use crate::{
    error::{AppError, AuthFailure},
    models::{
        follow::{Follow, FollowEdgeResponse},
        user::User,
    },
    services::user_by_username,
    store::{FOLLOWS_FOLLOWED_FKEY, FOLLOWS_FOLLOWER_FKEY, FOLLOWS_PAIR_KEY, Store, StoreError},
};

/// Makes `actor` follow `target_username`.
///
/// Self-follows and duplicate edges are rejected before the insert and,
/// for concurrent callers, again by the store's check and unique
/// constraints.
pub async fn create(
    store: &dyn Store,
    actor: &User,
    target_username: &str,
) -> Result<Follow, AppError> {
    let target = user_by_username(store, target_username).await?;

    if actor.id == target.id {
        return Err(AppError::RelationshipInvalid);
    }

    if store.find_follow(actor.id, target.id).await?.is_some() {
        return Err(AppError::RelationshipAlreadyExists(target.username));
    }

    store
        .insert_follow(actor.id, target.id)
        .await
        .map_err(|e| match e {
            e if e.is_unique_violation(FOLLOWS_PAIR_KEY) => {
                AppError::RelationshipAlreadyExists(target.username.clone())
            }
            StoreError::CheckViolation(_) => AppError::RelationshipInvalid,
            e if e.is_foreign_key_violation(FOLLOWS_FOLLOWED_FKEY) => {
                AppError::UserNotFound(target.username.clone())
            }
            e if e.is_foreign_key_violation(FOLLOWS_FOLLOWER_FKEY) => {
                AppError::Unauthorized(AuthFailure::UserNotFound)
            }
            other => AppError::from(other),
        })
}

/// Removes the edge `actor -> target_username`.
pub async fn delete(store: &dyn Store, actor: &User, target_username: &str) -> Result<(), AppError> {
    let target = user_by_username(store, target_username).await?;

    if actor.id == target.id {
        return Err(AppError::RelationshipInvalid);
    }

    let edge = store
        .find_follow(actor.id, target.id)
        .await?
        .ok_or(AppError::RelationshipNotFound)?;

    if !store.delete_follow(edge.id).await? {
        return Err(AppError::RelationshipNotFound);
    }
    Ok(())
}

/// Users that `username` follows.
pub async fn list_following(
    store: &dyn Store,
    username: &str,
) -> Result<Vec<FollowEdgeResponse>, AppError> {
    let user = user_by_username(store, username).await?;
    let edges = store.list_following(user.id).await?;

    Ok(edges
        .into_iter()
        .map(|edge| FollowEdgeResponse {
            follow_id: edge.id,
            username: edge.followed_username,
        })
        .collect())
}

/// Users following `username`.
pub async fn list_followers(
    store: &dyn Store,
    username: &str,
) -> Result<Vec<FollowEdgeResponse>, AppError> {
    let user = user_by_username(store, username).await?;
    let edges = store.list_followers(user.id).await?;

    Ok(edges
        .into_iter()
        .map(|edge| FollowEdgeResponse {
            follow_id: edge.id,
            username: edge.follower_username,
        })
        .collect())
}
