// src/models/user.rs

use std::{fmt, str::FromStr, sync::LazyLock};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("username pattern is valid"));

/// Closed set of roles. There is no capability list; see `auth::policy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Represents the 'users' table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,

    /// Unique username. Also the subject of issued tokens.
    pub username: String,

    /// Unique e-mail address.
    pub email: String,

    /// One-way password hash (PHC string).
    pub password_hash: String,

    pub role: Role,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A user about to be inserted. The store decides the role.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// DTO for registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 4, max = 12, message = "Username must be between 4 and 12 characters"),
        regex(path = *USERNAME_PATTERN, message = "Username may only contain letters, digits and '_'")
    )]
    pub username: String,

    #[validate(email(message = "E-mail is not valid"))]
    pub email: String,

    #[validate(length(min = 4, max = 20, message = "Password must be between 4 and 20 characters"))]
    pub password: String,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 12))]
    pub username: String,
    #[validate(length(min = 1, max = 20))]
    pub password: String,
}

/// DTO for profile updates. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        length(min = 4, max = 12, message = "Username must be between 4 and 12 characters"),
        regex(path = *USERNAME_PATTERN, message = "Username may only contain letters, digits and '_'")
    )]
    pub username: Option<String>,

    #[validate(email(message = "E-mail is not valid"))]
    pub email: Option<String>,

    #[validate(length(min = 4, max = 20, message = "Password must be between 4 and 20 characters"))]
    pub password: Option<String>,

    #[validate(length(min = 1, max = 256, message = "Bio must be between 1 and 256 characters"))]
    pub bio: Option<String>,
}

/// Public representation of a user. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            bio: user.bio,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: u64,
    pub id: Uuid,
    pub username: String,
}
