//! Unified error type for `SimsBuddy`.
//!
//! Core operations return these variants as structured results; the bot layer
//! decides how to present them to the user.

use thiserror::Error;

/// Every error the institute bot can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read, parsed, or validated
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// The underlying `SeaORM` call failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Required input missing or malformed
    #[error("Validation error: {message}")]
    Validation {
        /// What was rejected
        message: String,
    },

    /// No fee record exists with this ID
    #[error("Fee record not found: {id}")]
    FeeRecordNotFound {
        /// Fee record ID that was looked up
        id: i64,
    },

    /// The fee record exists but the requested term row is missing
    #[error("Term {term_no} not found for fee record {fee_record_id}")]
    TermNotFound {
        /// Owning fee record
        fee_record_id: i64,
        /// Requested term number
        term_no: i32,
    },

    /// Term numbers run from 1 to 3
    #[error("Invalid term number: {term_no} (expected 1, 2 or 3)")]
    InvalidTerm {
        /// Requested term number
        term_no: i32,
    },

    /// Fee amounts must be non-negative and term splits must add up
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// Offending amount
        amount: i64,
    },

    /// A date that breaks an ordering rule (e.g. a payment in the future)
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// What was rejected
        message: String,
    },

    /// A completed payment cannot be reverted without superadmin rights
    #[error("Term {term_no} of fee record {fee_record_id} is already paid and locked")]
    TermLocked {
        /// Owning fee record
        fee_record_id: i64,
        /// Locked term number
        term_no: i32,
    },

    /// An attendance status or field change that does not apply
    #[error("Invalid attendance: {message}")]
    InvalidAttendance {
        /// What was rejected
        message: String,
    },

    /// The session's role may not perform this action
    #[error("Unauthorized: {role} cannot {action}")]
    Unauthorized {
        /// Role of the caller
        role: String,
        /// Action that was attempted
        action: String,
    },

    /// User input could not be parsed
    #[error("Could not parse {field}: '{value}'")]
    Parse {
        /// Which input was being parsed
        field: String,
        /// Raw input
        value: String,
    },

    /// I/O error (config file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable is missing
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Writing a reply into a buffer failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Whether the error comes from user input or a business rule rather than
    /// from infrastructure. The bot replies to these without logging them as
    /// failures.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::FeeRecordNotFound { .. }
                | Self::TermNotFound { .. }
                | Self::InvalidTerm { .. }
                | Self::InvalidAmount { .. }
                | Self::InvalidDate { .. }
                | Self::TermLocked { .. }
                | Self::InvalidAttendance { .. }
                | Self::Unauthorized { .. }
                | Self::Parse { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_classification() {
        assert!(Error::TermLocked { fee_record_id: 1, term_no: 2 }.is_user_facing());
        assert!(
            Error::Unauthorized {
                role: "student".to_string(),
                action: "delete fee records".to_string(),
            }
            .is_user_facing()
        );
        assert!(!Error::Config { message: "x".to_string() }.is_user_facing());
        assert!(!Error::Database(sea_orm::DbErr::Custom("boom".to_string())).is_user_facing());
    }

    #[test]
    fn test_error_messages() {
        let err = Error::InvalidTerm { term_no: 4 };
        assert_eq!(err.to_string(), "Invalid term number: 4 (expected 1, 2 or 3)");

        let err = Error::Parse {
            field: "date".to_string(),
            value: "tomorrow".to_string(),
        };
        assert_eq!(err.to_string(), "Could not parse date: 'tomorrow'");
    }
}
