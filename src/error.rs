// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

/// Why a bearer credential could not be turned into a user.
///
/// Both variants surface identically to the client; they exist so the
/// boundary can log them differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    /// Missing scheme, malformed, badly signed, wrong issuer or expired.
    #[error("invalid token")]
    InvalidToken,
    /// Token verified, but its subject no longer names an account.
    #[error("token subject does not exist")]
    UserNotFound,
}

/// Global Application Error Enum.
/// Every failure raised by the core, mapped to HTTP exactly once in `into_response`.
#[derive(Debug, Error)]
pub enum AppError {
    // 401
    #[error("{0}")]
    Unauthorized(#[from] AuthFailure),

    #[error("Invalid username or password")]
    InvalidCredentials,

    // 403
    #[error("You are not allowed to perform this action")]
    Forbidden,

    #[error("{0} does not belong to this user")]
    NotBelongToUser(&'static str),

    // 404
    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("Tweet {0} not found")]
    TweetNotFound(Uuid),

    #[error("Comment {0} not found")]
    CommentNotFound(Uuid),

    #[error("Like not found")]
    LikeNotFound,

    #[error("Follow relationship not found")]
    RelationshipNotFound,

    // 400
    #[error("Tweet is already liked by this user")]
    LikeAlreadyRegistered,

    #[error("Already following '{0}'")]
    RelationshipAlreadyExists(String),

    #[error("You are not allowed to follow or unfollow yourself")]
    RelationshipInvalid,

    #[error("New content is the same as the current content")]
    ContentIsTheSame,

    #[error("{0}")]
    UserAlreadyRegistered(String),

    #[error("{0}")]
    Validation(String),

    // 500
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden | AppError::NotBelongToUser(_) => StatusCode::FORBIDDEN,
            AppError::UserNotFound(_)
            | AppError::TweetNotFound(_)
            | AppError::CommentNotFound(_)
            | AppError::LikeNotFound
            | AppError::RelationshipNotFound => StatusCode::NOT_FOUND,
            AppError::LikeAlreadyRegistered
            | AppError::RelationshipAlreadyExists(_)
            | AppError::RelationshipInvalid
            | AppError::ContentIsTheSame
            | AppError::UserAlreadyRegistered(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            AppError::Unauthorized(failure) => {
                match failure {
                    AuthFailure::InvalidToken => tracing::debug!("Rejected bearer token"),
                    AuthFailure::UserNotFound => {
                        tracing::warn!("Valid token presented for a missing account")
                    }
                }
                "Invalid or expired token".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Storage failures that reach this conversion were not translated by a
/// service, so they are infrastructure errors.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}
