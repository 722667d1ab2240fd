//! Role configuration module for mapping Discord users to institute roles.
//!
//! Role lists are read from the `.env` file as comma-separated Discord user IDs:
//! `SIMS_SUPERADMIN_IDS`, `SIMS_ADMIN_IDS`, `SIMS_TEACHER_IDS`, and `SIMS_PARENT_IDS`.
//! Anyone not listed is treated as a student.

use crate::core::session::{Role, Session};
use std::collections::HashMap;

/// Lookup table from Discord user ID to role, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct RoleDirectory {
    roles: HashMap<String, Role>,
}

impl RoleDirectory {
    /// Builds the directory from environment variables.
    ///
    /// When a user appears in several lists the most privileged role wins.
    #[must_use]
    pub fn from_env() -> Self {
        let read = |key: &str| std::env::var(key).unwrap_or_default();
        Self::from_lists(&[
            (Role::Parent, read("SIMS_PARENT_IDS")),
            (Role::Teacher, read("SIMS_TEACHER_IDS")),
            (Role::Admin, read("SIMS_ADMIN_IDS")),
            (Role::SuperAdmin, read("SIMS_SUPERADMIN_IDS")),
        ])
    }

    /// Builds the directory from `(role, "id1,id2")` pairs, later pairs
    /// overriding earlier ones.
    #[must_use]
    pub fn from_lists(lists: &[(Role, String)]) -> Self {
        let mut roles = HashMap::new();
        for (role, ids) in lists {
            for id in ids.split(',').map(str::trim).filter(|id| !id.is_empty()) {
                roles.insert(id.to_string(), *role);
            }
        }
        Self { roles }
    }

    /// Role of a user, defaulting to `Student`.
    #[must_use]
    pub fn role_of(&self, user_id: &str) -> Role {
        self.roles.get(user_id).copied().unwrap_or(Role::Student)
    }

    /// Creates the session for a command invocation.
    #[must_use]
    pub fn session_for(&self, user_id: &str) -> Session {
        Session::new(user_id, self.role_of(user_id))
    }

    /// Number of users with an explicit role.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Whether no roles are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_lookup_and_default() {
        let directory = RoleDirectory::from_lists(&[
            (Role::Teacher, "100, 101".to_string()),
            (Role::Admin, "200".to_string()),
        ]);
        assert_eq!(directory.role_of("100"), Role::Teacher);
        assert_eq!(directory.role_of("101"), Role::Teacher);
        assert_eq!(directory.role_of("200"), Role::Admin);
        assert_eq!(directory.role_of("999"), Role::Student);
        assert_eq!(directory.len(), 3);
    }

    #[test]
    fn test_later_lists_override() {
        let directory = RoleDirectory::from_lists(&[
            (Role::Teacher, "1".to_string()),
            (Role::SuperAdmin, "1".to_string()),
        ]);
        let session = directory.session_for("1");
        assert_eq!(session.role, Role::SuperAdmin);
        assert_eq!(session.user_id, "1");
    }

    #[test]
    fn test_empty_lists_are_ignored() {
        let directory = RoleDirectory::from_lists(&[(Role::Admin, " , ,".to_string())]);
        assert!(directory.is_empty());
    }
}
