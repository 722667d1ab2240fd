//! Fee record entity - One student's fee for an academic year.
//!
//! Holds the student identity and total amount. The three installment terms
//! live in `fee_terms`; the overall status is stored for filtering but is
//! recomputed from the terms on every write and read.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fee record database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_records")]
pub struct Model {
    /// Unique identifier for the fee record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Institute student ID (e.g., admission number)
    pub student_id: String,
    /// Student's name at the time the record was created
    pub student_name: String,
    /// Class the fee applies to (e.g., "10")
    pub class: String,
    /// Section within the class (e.g., "A")
    pub section: String,
    /// Total fee in whole currency units
    pub amount: i64,
    /// Overall status: `"Pending"`, `"Paid"`, or `"Overdue"`
    pub status: String,
    /// Discord user ID of the admin who created the record
    pub created_by: String,
    /// When the record was created
    pub created_at: DateTime,
    /// When any term was last changed
    pub updated_at: DateTime,
}

/// Defines relationships between `FeeRecord` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One fee record has three terms
    #[sea_orm(has_many = "super::fee_term::Entity")]
    Terms,
}

impl Related<super::fee_term::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Terms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
