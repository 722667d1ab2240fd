//! Shared test utilities for `SimsBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        fee::{self, FeeRecordView, NewFeeRecord},
        session::{Role, Session},
    },
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Fixed "today" so due-date logic is deterministic.
#[must_use]
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default()
}

/// Session for an admin user.
#[must_use]
pub fn admin_session() -> Session {
    Session::new("admin-1", Role::Admin)
}

/// Session for a superadmin user.
#[must_use]
pub fn superadmin_session() -> Session {
    Session::new("root-1", Role::SuperAdmin)
}

/// Session for a teacher.
#[must_use]
pub fn teacher_session() -> Session {
    Session::new("teacher-1", Role::Teacher)
}

/// Fee record input with sensible defaults.
///
/// # Defaults
/// * `student_name`: "Test Student"
/// * `class`: "10", `section`: "A"
/// * no explicit term amounts and no due dates
#[must_use]
pub fn test_new_fee_record(student_id: &str, amount: i64) -> NewFeeRecord {
    NewFeeRecord {
        student_id: student_id.to_string(),
        student_name: "Test Student".to_string(),
        class: "10".to_string(),
        section: "A".to_string(),
        amount,
        ..NewFeeRecord::default()
    }
}

/// Creates a fee record as an admin on [`test_today`] with the defaults of
/// [`test_new_fee_record`].
pub async fn create_test_fee_record(
    db: &DatabaseConnection,
    student_id: &str,
    amount: i64,
) -> Result<FeeRecordView> {
    fee::create_fee_record(
        db,
        &admin_session(),
        test_new_fee_record(student_id, amount),
        test_today(),
    )
    .await
}
