//! Database configuration module for `SimsBuddy`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. Creation is idempotent, which lets the
//! bot call it on every start against an existing database file.

use crate::entities::{AttendanceRecord, FeeRecord, FeeTerm, attendance_record};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/sims.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, falling
/// back to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if database_url == DEFAULT_DATABASE_URL {
        std::fs::create_dir_all("data")?;
    }
    tracing::debug!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables (if missing) plus the unique attendance key index.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut fee_record_table = schema.create_table_from_entity(FeeRecord);
    let mut fee_term_table = schema.create_table_from_entity(FeeTerm);
    let mut attendance_table = schema.create_table_from_entity(AttendanceRecord);

    for table in [&mut fee_record_table, &mut fee_term_table, &mut attendance_table] {
        table.if_not_exists();
    }

    db.execute(builder.build(&fee_record_table)).await?;
    db.execute(builder.build(&fee_term_table)).await?;
    db.execute(builder.build(&attendance_table)).await?;

    // One row per person per day
    let attendance_key = Index::create()
        .name("idx_attendance_person_date")
        .table(AttendanceRecord)
        .col(attendance_record::Column::PersonKind)
        .col(attendance_record::Column::PersonId)
        .col(attendance_record::Column::Date)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&attendance_key)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AttendanceRecordModel, FeeRecordModel, FeeTermModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<FeeRecordModel> = FeeRecord::find().limit(1).all(&db).await?;
        let _: Vec<FeeTermModel> = FeeTerm::find().limit(1).all(&db).await?;
        let _: Vec<AttendanceRecordModel> = AttendanceRecord::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
