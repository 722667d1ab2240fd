//! Caller session - who is acting and with which role.
//!
//! A `Session` is built once per command from the caller's user ID and the
//! configured role lists, then passed explicitly into every operation that
//! needs authorisation.

use crate::{
    core::attendance_status::PersonKind,
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Institute roles, from most to least privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full access, including reverting locked payments
    SuperAdmin,
    /// Manages fees and teacher attendance
    Admin,
    /// Marks student attendance
    Teacher,
    /// No access to fee or attendance records; the default for unlisted users
    Student,
    /// No access to fee or attendance records
    Parent,
}

impl Role {
    /// Display form of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "superadmin",
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
            Self::Parent => "parent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roles allowed to manage fee records.
pub const FEE_MANAGERS: &[Role] = &[Role::SuperAdmin, Role::Admin];

/// Roles allowed to view fee records and fee reports.
pub const FEE_VIEWERS: &[Role] = &[Role::SuperAdmin, Role::Admin];

/// Roles allowed to mark student attendance.
pub const STUDENT_ATTENDANCE_MARKERS: &[Role] = &[Role::SuperAdmin, Role::Admin, Role::Teacher];

/// Roles allowed to mark teacher attendance.
pub const TEACHER_ATTENDANCE_MARKERS: &[Role] = &[Role::SuperAdmin, Role::Admin];

/// Roles allowed to mark or view attendance of one kind of person.
#[must_use]
pub const fn attendance_roles(kind: PersonKind) -> &'static [Role] {
    match kind {
        PersonKind::Student => STUDENT_ATTENDANCE_MARKERS,
        PersonKind::Teacher => TEACHER_ATTENDANCE_MARKERS,
    }
}

/// The acting user for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Discord user ID of the caller
    pub user_id: String,
    /// Resolved role
    pub role: Role,
}

impl Session {
    /// Creates a session for a user with a known role.
    #[must_use]
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// Fails with `Unauthorized` unless the session's role is in `allowed`.
    pub fn require(&self, allowed: &[Role], action: &str) -> Result<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            tracing::warn!(
                user_id = %self.user_id,
                role = %self.role,
                action,
                "Rejected unauthorised action"
            );
            Err(Error::Unauthorized {
                role: self.role.to_string(),
                action: action.to_string(),
            })
        }
    }

    /// Whether this session may revert a locked payment.
    #[must_use]
    pub fn is_superadmin(&self) -> bool {
        self.role == Role::SuperAdmin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_allows_listed_roles() {
        let session = Session::new("42", Role::Teacher);
        assert!(session.require(STUDENT_ATTENDANCE_MARKERS, "mark attendance").is_ok());
        assert!(matches!(
            session.require(FEE_MANAGERS, "create fee records"),
            Err(Error::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_students_and_parents_cannot_read_records() {
        for role in [Role::Student, Role::Parent] {
            let session = Session::new("7", role);
            assert!(matches!(
                session.require(FEE_VIEWERS, "view fee records"),
                Err(Error::Unauthorized { .. })
            ));
            for kind in [PersonKind::Student, PersonKind::Teacher] {
                assert!(session.require(attendance_roles(kind), "view attendance").is_err());
            }
        }
    }

    #[test]
    fn test_attendance_roles_by_kind() {
        let teacher = Session::new("3", Role::Teacher);
        assert!(teacher.require(attendance_roles(PersonKind::Student), "view attendance").is_ok());
        assert!(teacher.require(attendance_roles(PersonKind::Teacher), "view attendance").is_err());

        let admin = Session::new("4", Role::Admin);
        assert!(admin.require(FEE_VIEWERS, "view fee records").is_ok());
        assert!(admin.require(attendance_roles(PersonKind::Teacher), "view attendance").is_ok());
    }

    #[test]
    fn test_superadmin_flag() {
        assert!(Session::new("1", Role::SuperAdmin).is_superadmin());
        assert!(!Session::new("2", Role::Admin).is_superadmin());
    }
}
