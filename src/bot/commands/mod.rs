//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Attendance commands
pub mod attendance;

/// Fee record commands
pub mod fee;

/// General utility commands
pub mod general;

// Export commands
pub use attendance::*;
pub use fee::*;
pub use general::*;
