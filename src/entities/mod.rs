//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod attendance_record;
pub mod fee_record;
pub mod fee_term;

// Re-export specific types to avoid conflicts
pub use attendance_record::{
    Column as AttendanceRecordColumn, Entity as AttendanceRecord, Model as AttendanceRecordModel,
};
pub use fee_record::{Column as FeeRecordColumn, Entity as FeeRecord, Model as FeeRecordModel};
pub use fee_term::{Column as FeeTermColumn, Entity as FeeTerm, Model as FeeTermModel};
