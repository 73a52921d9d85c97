// src/models/mod.rs

pub mod comment;
pub mod follow;
pub mod like;
pub mod tweet;
pub mod user;
