//! Fee term entity - One installment of a fee record.
//!
//! Each fee record owns exactly three rows here, numbered 1 to 3.
//! `payment_date` and `payment_method` are only populated while `paid` is set.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fee term database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_terms")]
pub struct Model {
    /// Unique identifier for the term row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the fee record this term belongs to
    pub fee_record_id: i64,
    /// Term number, 1 to 3
    pub term_no: i32,
    /// Amount owed for this term
    pub amount_due: i64,
    /// Status at last write: `"Pending"`, `"Paid"`, or `"Overdue"`
    pub status: String,
    /// Whether the term has been paid
    pub paid: bool,
    /// Date the payment was made
    pub payment_date: Option<Date>,
    /// `"Cash"`, `"Cheque"`, `"Online"`, or `"Card"`
    pub payment_method: Option<String>,
    /// When the term falls due
    pub due_date: Option<Date>,
}

/// Defines relationships between `FeeTerm` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each term belongs to one fee record
    #[sea_orm(
        belongs_to = "super::fee_record::Entity",
        from = "Column::FeeRecordId",
        to = "super::fee_record::Column::Id",
        on_delete = "Cascade"
    )]
    FeeRecord,
}

impl Related<super::fee_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
