/// Database configuration and connection management
pub mod database;

/// Institute settings loading from config.toml
pub mod institute;

/// Role assignment from environment variables
pub mod roles;
