//! Well-known role name constants.
//!
//! These must match the `role` claim issued by the identity provider.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUPERVISOR: &str = "supervisor";

/// All roles accepted by the service.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_SUPERVISOR];

/// Whether `role` is one the service knows about.
pub fn is_known_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

/// Whether `role` may register, (de)activate and delete people.
///
/// Supervisors only record attendance for the people an admin has set up.
pub fn can_manage_people(role: &str) -> bool {
    role == ROLE_ADMIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_accepted() {
        assert!(is_known_role("admin"));
        assert!(is_known_role("supervisor"));
    }

    #[test]
    fn unknown_role_rejected() {
        assert!(!is_known_role("Admin"));
        assert!(!is_known_role(""));
        assert!(!is_known_role("viewer"));
    }

    #[test]
    fn only_admins_manage_people() {
        assert!(can_manage_people(ROLE_ADMIN));
        assert!(!can_manage_people(ROLE_SUPERVISOR));
        assert!(!can_manage_people("viewer"));
    }
}
