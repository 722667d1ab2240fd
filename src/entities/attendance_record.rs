//! Attendance record entity - One person's attendance on one date.
//!
//! Rows are keyed by (`person_kind`, `person_id`, `date`); saving the same key
//! again overwrites the earlier row. Unmarked rows are never stored.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Attendance record database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    /// Unique identifier for the row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// `"student"` or `"teacher"`
    pub person_kind: String,
    /// Student or teacher ID
    pub person_id: String,
    /// Day the attendance applies to
    pub date: Date,
    /// `"Present"`, `"Absent"`, `"Late"`, `"Half Day"`, or `"Leave"`
    pub status: String,
    /// Arrival time for late arrivals
    pub check_in: Option<Time>,
    /// Departure time for half days
    pub check_out: Option<Time>,
    /// Absence reason
    pub comment: Option<String>,
    /// Discord user ID of whoever saved the row
    pub marked_by: String,
    /// When the row was last saved
    pub updated_at: DateTime,
}

/// `AttendanceRecord` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
