use crate::services::auth::{AuthError, AuthPayload};

/// Require `permission` to be granted in the payload's `permissions` claim.
pub fn check_permissions(permission: &str, payload: &AuthPayload) -> Result<(), AuthError> {
    if payload.permissions.is_none() {
        return Err(AuthError::PermissionsMissing);
    }
    if !payload.has_permission(permission) {
        return Err(AuthError::PermissionDenied);
    }

    Ok(())
}
