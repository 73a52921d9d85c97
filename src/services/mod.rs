// src/services/mod.rs

//! Core operations. Each function receives the store and, for
//! authenticated operations, the already-resolved acting user, and
//! returns either the affected entity or a typed `AppError`. Nothing in
//! here logs; failures are reported once at the HTTP boundary.

pub mod comments;
pub mod follows;
pub mod likes;
pub mod tweets;
pub mod users;

use crate::{error::AppError, models::user::User, store::Store};

/// Inclusive bounds on tweet and comment content, in characters.
pub const CONTENT_MIN_CHARS: usize = 1;
pub const CONTENT_MAX_CHARS: usize = 1024;

/// Looks a user up by username, failing with `UserNotFound`.
pub(crate) async fn user_by_username(store: &dyn Store, username: &str) -> Result<User, AppError> {
    store
        .find_user_by_username(username)
        .await?
        .ok_or_else(|| AppError::UserNotFound(username.to_string()))
}

/// Checks tweet/comment content length. Content is stored exactly as
/// received.
pub(crate) fn check_content(content: &str) -> Result<(), AppError> {
    let chars = content.chars().count();
    if !(CONTENT_MIN_CHARS..=CONTENT_MAX_CHARS).contains(&chars) {
        return Err(AppError::Validation(format!(
            "Content must be between {} and {} characters",
            CONTENT_MIN_CHARS, CONTENT_MAX_CHARS
        )));
    }
    Ok(())
}
