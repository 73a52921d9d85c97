// src/auth/mod.rs

pub mod identity;
pub mod policy;

pub use identity::{CurrentUser, IdentityResolver};
pub use policy::{Capability, allow, authorize};
