// src/auth/identity.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};

use crate::{
    error::{AppError, AuthFailure},
    models::user::User,
    store::StoreState,
    utils::jwt::TokenService,
};

const BEARER_PREFIX: &str = "Bearer ";

/// Turns a raw `Authorization` header value into a stored user.
///
/// Resolution is repeated on every request and caches nothing: a deleted
/// or renamed account stops resolving immediately, at the cost of one
/// store lookup per authenticated call.
#[derive(Clone)]
pub struct IdentityResolver {
    tokens: TokenService,
    store: StoreState,
}

impl IdentityResolver {
    pub fn new(tokens: TokenService, store: StoreState) -> Self {
        Self { tokens, store }
    }

    /// Resolves `Bearer <token>` to the user named by the token's subject.
    ///
    /// A missing scheme is treated like any other malformed token.
    pub async fn resolve(&self, authorization: &str) -> Result<User, AppError> {
        let token = authorization
            .strip_prefix(BEARER_PREFIX)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthFailure::InvalidToken)?;

        let username = self.tokens.verify(token)?;

        self.store
            .find_user_by_username(&username)
            .await?
            .ok_or(AppError::Unauthorized(AuthFailure::UserNotFound))
    }
}

/// The authenticated caller, resolved from the `Authorization` header.
///
/// Handlers that take this extractor reject the request with 401 before
/// running when the header is missing or does not resolve.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    IdentityResolver: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let resolver = IdentityResolver::from_ref(state);

        let authorization = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .ok_or(AuthFailure::InvalidToken)?;

        let user = resolver.resolve(&authorization).await?;
        Ok(CurrentUser(user))
    }
}
