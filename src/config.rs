// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Default bearer token lifetime: two hours.
pub const DEFAULT_JWT_EXPIRATION: u64 = 7200;

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string. When absent the in-process store is used.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    /// Token time-to-live in seconds.
    pub jwt_expiration: u64,
    pub port: u16,
    pub rust_log: String,

    /// Optional explicit admin seed, applied at start-up when all three are set.
    pub admin_username: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .map(|raw| raw.parse().expect("JWT_EXPIRATION must be a number of seconds"))
            .unwrap_or(DEFAULT_JWT_EXPIRATION);

        let port = env::var("PORT")
            .ok()
            .map(|raw| raw.parse().expect("PORT must be a valid port number"))
            .unwrap_or(3000);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            port,
            rust_log,
            admin_username: env::var("ADMIN_USERNAME").ok(),
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        }
    }

    /// Returns the admin seed credentials when the full triple is configured.
    pub fn admin_seed(&self) -> Option<(&str, &str, &str)> {
        match (&self.admin_username, &self.admin_email, &self.admin_password) {
            (Some(username), Some(email), Some(password)) => {
                Some((username.as_str(), email.as_str(), password.as_str()))
            }
            _ => None,
        }
    }
}
