// src/services/users.rs

use chrono::Utc;

use crate::{
    auth::policy::{Capability, authorize},
    error::AppError,
    models::user::{LoginRequest, LoginResponse, NewUser, RegisterRequest, UpdateUserRequest, User},
    services::user_by_username,
    store::{Store, StoreError, USERS_EMAIL_KEY, USERS_USERNAME_KEY, UserChanges},
    utils::{hash::PasswordHasher, jwt::TokenService},
};

/// Maps a uniqueness violation on the users table to the registration error.
fn translate_user_conflict(err: StoreError, username: &str, email: &str) -> AppError {
    if err.is_unique_violation(USERS_USERNAME_KEY) {
        AppError::UserAlreadyRegistered(format!("Username '{}' is already registered", username))
    } else if err.is_unique_violation(USERS_EMAIL_KEY) {
        AppError::UserAlreadyRegistered(format!("E-mail '{}' is already registered", email))
    } else {
        AppError::from(err)
    }
}

async fn ensure_username_free(store: &dyn Store, username: &str) -> Result<(), AppError> {
    if store.find_user_by_username(username).await?.is_some() {
        return Err(AppError::UserAlreadyRegistered(format!(
            "Username '{}' is already registered",
            username
        )));
    }
    Ok(())
}

async fn ensure_email_free(store: &dyn Store, email: &str) -> Result<(), AppError> {
    if store.find_user_by_email(email).await?.is_some() {
        return Err(AppError::UserAlreadyRegistered(format!(
            "E-mail '{}' is already registered",
            email
        )));
    }
    Ok(())
}

/// Registers a new account.
///
/// The store grants ADMIN to the very first account it ever holds; every
/// later account is a plain USER.
pub async fn register(
    store: &dyn Store,
    hasher: &dyn PasswordHasher,
    payload: &RegisterRequest,
) -> Result<User, AppError> {
    ensure_username_free(store, &payload.username).await?;
    ensure_email_free(store, &payload.email).await?;

    let password_hash = hasher.hash(&payload.password)?;

    store
        .insert_user(NewUser {
            username: payload.username.clone(),
            email: payload.email.clone(),
            password_hash,
        })
        .await
        .map_err(|e| translate_user_conflict(e, &payload.username, &payload.email))
}

/// Checks credentials and issues a bearer token.
///
/// Unknown usernames and wrong passwords are indistinguishable.
pub async fn login(
    store: &dyn Store,
    hasher: &dyn PasswordHasher,
    tokens: &TokenService,
    payload: &LoginRequest,
) -> Result<LoginResponse, AppError> {
    let user = store
        .find_user_by_username(&payload.username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !hasher.verify(&payload.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let token = tokens.issue(&user.username)?;

    Ok(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: tokens.ttl_seconds(),
        id: user.id,
        username: user.username,
    })
}

pub async fn get(store: &dyn Store, actor: &User, username: &str) -> Result<User, AppError> {
    let target = user_by_username(store, username).await?;
    authorize(actor, Capability::SelfOrAdmin(target.id), "User")?;
    Ok(target)
}

pub async fn list(store: &dyn Store, actor: &User) -> Result<Vec<User>, AppError> {
    authorize(actor, Capability::AdminOnly, "User")?;
    Ok(store.list_users().await?)
}

/// Applies a partial profile update. Fields equal to the current value
/// are ignored, so re-sending one's own username is not a conflict.
///
/// Changing the username invalidates every outstanding token for the
/// account, because tokens carry the username as their subject.
pub async fn update(
    store: &dyn Store,
    hasher: &dyn PasswordHasher,
    actor: &User,
    username: &str,
    payload: UpdateUserRequest,
) -> Result<User, AppError> {
    let target = user_by_username(store, username).await?;
    authorize(actor, Capability::SelfOrAdmin(target.id), "User")?;

    let mut changes = UserChanges::default();

    if let Some(new_username) = payload.username.filter(|u| *u != target.username) {
        ensure_username_free(store, &new_username).await?;
        changes.username = Some(new_username);
    }
    if let Some(new_email) = payload.email.filter(|e| *e != target.email) {
        ensure_email_free(store, &new_email).await?;
        changes.email = Some(new_email);
    }
    if let Some(password) = payload.password {
        changes.password_hash = Some(hasher.hash(&password)?);
    }
    changes.bio = payload.bio;

    if changes.is_empty() {
        return Ok(target);
    }

    let attempted_username = changes.username.clone().unwrap_or_default();
    let attempted_email = changes.email.clone().unwrap_or_default();

    store
        .update_user(target.id, changes, Utc::now())
        .await
        .map_err(|e| translate_user_conflict(e, &attempted_username, &attempted_email))?
        .ok_or_else(|| AppError::UserNotFound(username.to_string()))
}

/// Promotes `username` to ADMIN. Granting to an existing admin is a no-op.
pub async fn grant_admin(store: &dyn Store, actor: &User, username: &str) -> Result<User, AppError> {
    authorize(actor, Capability::AdminOnly, "User")?;
    let target = user_by_username(store, username).await?;

    store
        .grant_admin(target.id, Utc::now())
        .await?
        .ok_or_else(|| AppError::UserNotFound(username.to_string()))
}

/// Deletes an account together with its tweets, comments, likes and
/// follow edges on either side.
pub async fn delete(store: &dyn Store, actor: &User, username: &str) -> Result<(), AppError> {
    let target = user_by_username(store, username).await?;
    authorize(actor, Capability::SelfOrAdmin(target.id), "User")?;

    if !store.delete_user(target.id).await? {
        return Err(AppError::UserNotFound(username.to_string()));
    }
    Ok(())
}

/// Ensures the configured admin account exists and holds ADMIN.
///
/// The password is only used when the account has to be created; an
/// existing account keeps its credentials.
pub async fn seed_admin(
    store: &dyn Store,
    hasher: &dyn PasswordHasher,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let user = match store.find_user_by_username(username).await? {
        Some(user) => user,
        None => {
            let password_hash = hasher.hash(password)?;
            store
                .insert_user(NewUser {
                    username: username.to_string(),
                    email: email.to_string(),
                    password_hash,
                })
                .await
                .map_err(|e| translate_user_conflict(e, username, email))?
        }
    };

    if user.is_admin() {
        return Ok(user);
    }

    store
        .grant_admin(user.id, Utc::now())
        .await?
        .ok_or_else(|| AppError::UserNotFound(username.to_string()))
}
