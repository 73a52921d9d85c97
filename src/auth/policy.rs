// src/auth/policy.rs

//! Authorization decisions as a pure function of the acting user's role
//! and ownership. Evaluated only after identity resolution succeeded.

use uuid::Uuid;

use crate::{error::AppError, models::user::User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Any resolved identity.
    Public,
    /// Only administrators.
    AdminOnly,
    /// The user with this id, or an administrator.
    SelfOrAdmin(Uuid),
    /// Only the owner with this id. Administrators get no override.
    OwnerOnly(Uuid),
}

/// Decides whether `identity` holds `capability`.
///
/// An unresolved identity (`None`) is denied every capability.
pub fn allow(identity: Option<&User>, capability: Capability) -> bool {
    let Some(user) = identity else {
        return false;
    };

    match capability {
        Capability::Public => true,
        Capability::AdminOnly => user.is_admin(),
        Capability::SelfOrAdmin(target_id) => user.is_admin() || user.id == target_id,
        Capability::OwnerOnly(owner_id) => user.id == owner_id,
    }
}

/// `allow` as a `Result`: role denials become `Forbidden`, ownership
/// denials `NotBelongToUser` naming the `resource` kind.
pub fn authorize(
    identity: &User,
    capability: Capability,
    resource: &'static str,
) -> Result<(), AppError> {
    if allow(Some(identity), capability) {
        return Ok(());
    }
    match capability {
        Capability::OwnerOnly(_) => Err(AppError::NotBelongToUser(resource)),
        _ => Err(AppError::Forbidden),
    }
}
