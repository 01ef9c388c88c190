//! Well-known role and account-status names.
//!
//! These must match the CHECK constraints on the `users` table.

pub const ROLE_MEMBER: &str = "MEMBER";
pub const ROLE_ORGANIZER: &str = "ORGANIZER";
pub const ROLE_ADMIN: &str = "ADMIN";

/// All valid role values.
pub const VALID_ROLES: &[&str] = &[ROLE_MEMBER, ROLE_ORGANIZER, ROLE_ADMIN];

pub const USER_STATUS_ACTIVE: &str = "ACTIVE";
pub const USER_STATUS_INACTIVE: &str = "INACTIVE";
pub const USER_STATUS_BLOCKED: &str = "BLOCKED";

/// All valid account status values.
pub const VALID_USER_STATUSES: &[&str] =
    &[USER_STATUS_ACTIVE, USER_STATUS_INACTIVE, USER_STATUS_BLOCKED];

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Rôle invalide '{role}'. Valeurs possibles: {}",
            VALID_ROLES.join(", ")
        ))
    }
}

/// Validate that an account status string is one of the accepted values.
pub fn validate_user_status(status: &str) -> Result<(), String> {
    if VALID_USER_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Statut invalide '{status}'. Valeurs possibles: {}",
            VALID_USER_STATUSES.join(", ")
        ))
    }
}

/// Organizers and admins may submit events.
pub fn can_submit_events(role: &str) -> bool {
    role == ROLE_ORGANIZER || role == ROLE_ADMIN
}
