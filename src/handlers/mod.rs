// src/handlers/mod.rs

pub mod auth;
pub mod comments;
pub mod follows;
pub mod likes;
pub mod tweets;
pub mod users;
