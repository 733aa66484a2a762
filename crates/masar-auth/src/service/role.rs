//! Role checks
//!
//! Masar uses a single role column per account rather than a role table:
//! admins satisfy every requirement, other roles only their own.

use masar_api::model::{ROLE_ADMIN, ROLE_INSTRUCTOR, ROLE_STUDENT};

/// Whether `user_role` satisfies an endpoint's `required_role`.
pub fn role_satisfies(user_role: &str, required_role: &str) -> bool {
    if user_role == ROLE_ADMIN {
        return true;
    }

    user_role == required_role
}

pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN
}

pub fn is_instructor(role: &str) -> bool {
    role == ROLE_INSTRUCTOR
}

pub fn is_student(role: &str) -> bool {
    role == ROLE_STUDENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_satisfies_everything() {
        assert!(role_satisfies(ROLE_ADMIN, ROLE_ADMIN));
        assert!(role_satisfies(ROLE_ADMIN, ROLE_INSTRUCTOR));
        assert!(role_satisfies(ROLE_ADMIN, ROLE_STUDENT));
    }

    #[test]
    fn test_exact_match_only_for_non_admin() {
        assert!(role_satisfies(ROLE_STUDENT, ROLE_STUDENT));
        assert!(!role_satisfies(ROLE_STUDENT, ROLE_INSTRUCTOR));
        assert!(!role_satisfies(ROLE_INSTRUCTOR, ROLE_ADMIN));
        assert!(role_satisfies(ROLE_INSTRUCTOR, ROLE_INSTRUCTOR));
    }

    #[test]
    fn test_helpers() {
        assert!(is_admin(ROLE_ADMIN));
        assert!(!is_admin(ROLE_STUDENT));
        assert!(is_instructor(ROLE_INSTRUCTOR));
        assert!(is_student(ROLE_STUDENT));
    }
}
