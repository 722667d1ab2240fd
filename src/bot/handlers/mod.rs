//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete.

/// Autocomplete handlers for classes, statuses, payment methods, and comments
pub mod autocomplete;
