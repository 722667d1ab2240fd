//! Core business logic - framework-agnostic fee, attendance, and reporting operations.

/// Bulk attendance persistence and lookups
pub mod attendance;
/// Attendance status rules and field resets
pub mod attendance_status;
/// Fee record persistence and term payments
pub mod fee;
/// Fee collection and attendance summaries
pub mod report;
/// Caller identity and role checks
pub mod session;
/// Fee term status derivation
pub mod term_status;
