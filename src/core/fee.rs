//! Fee record business logic - Handles creating fee records and recording term payments.
//!
//! Every read builds a [`FeeRecordView`] whose term and overall statuses are
//! derived afresh for the given date, so a term that passes its due date shows
//! as overdue without any write. Writes also store the derived statuses so that
//! the tables stay readable on their own. All writes run inside a database
//! transaction; concurrent edits are last-write-wins.

use crate::{
    core::{
        session::{FEE_MANAGERS, Session},
        term_status::{self, PaymentMethod, TERM_COUNT, Term, TermStatus},
    },
    entities::{FeeRecord, FeeTerm, fee_record, fee_term},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;

/// Input for a new fee record.
#[derive(Debug, Clone, Default)]
pub struct NewFeeRecord {
    /// Institute student ID
    pub student_id: String,
    /// Student's display name
    pub student_name: String,
    /// Class, e.g. "10"
    pub class: String,
    /// Section, e.g. "A"
    pub section: String,
    /// Total fee
    pub amount: i64,
    /// Explicit per-term amounts; defaults to an even split
    pub term_amounts: Option<[i64; TERM_COUNT]>,
    /// Per-term due dates
    pub due_dates: [Option<NaiveDate>; TERM_COUNT],
}

impl NewFeeRecord {
    /// Validates the input and returns the per-term amounts to store.
    pub fn term_amounts(&self) -> Result<[i64; TERM_COUNT]> {
        for (field, value) in [
            ("Student ID", &self.student_id),
            ("Student name", &self.student_name),
            ("Class", &self.class),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Validation {
                    message: format!("{field} cannot be empty"),
                });
            }
        }

        if self.amount < 0 {
            return Err(Error::InvalidAmount {
                amount: self.amount,
            });
        }

        let amounts = match self.term_amounts {
            Some(amounts) => {
                if let Some(negative) = amounts.iter().find(|a| **a < 0) {
                    return Err(Error::InvalidAmount { amount: *negative });
                }
                let total = amounts
                    .iter()
                    .try_fold(0_i64, |sum, amount| sum.checked_add(*amount))
                    .ok_or(Error::InvalidAmount { amount: i64::MAX })?;
                if total != self.amount {
                    return Err(Error::InvalidAmount { amount: total });
                }
                amounts
            }
            None => term_status::split_amount(self.amount)?,
        };

        let mut previous: Option<NaiveDate> = None;
        for due in self.due_dates.iter().flatten() {
            if previous.is_some_and(|prev| *due < prev) {
                return Err(Error::InvalidDate {
                    message: format!("term due date {due} is earlier than the previous term's"),
                });
            }
            previous = Some(*due);
        }

        Ok(amounts)
    }
}

/// Payment details supplied when marking a term paid.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentDetails {
    /// Date of payment; today when omitted
    pub payment_date: Option<NaiveDate>,
    /// Payment method; cash when omitted
    pub payment_method: Option<PaymentMethod>,
}

/// Read model of one fee record with statuses derived for a given date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeRecordView {
    /// Stored record
    pub record: fee_record::Model,
    /// Terms 1 to 3, in order
    pub terms: [Term; TERM_COUNT],
    /// Overall status rolled up from the terms
    pub status: TermStatus,
}

impl FeeRecordView {
    /// Builds the view from stored rows.
    ///
    /// Fails with `TermNotFound` if any of the three term rows is missing.
    pub fn from_models(
        record: fee_record::Model,
        term_models: &[fee_term::Model],
        today: NaiveDate,
    ) -> Result<Self> {
        let fee_record_id = record.id;
        let mut slots: [Option<Term>; TERM_COUNT] = [None, None, None];
        for model in term_models {
            let index = term_status::term_index(model.term_no)?;
            slots[index] = Some(term_from_model(model, today)?);
        }

        let [first, second, third] = slots;
        let missing = |term_no| Error::TermNotFound {
            fee_record_id,
            term_no,
        };
        let terms = [
            first.ok_or_else(|| missing(1))?,
            second.ok_or_else(|| missing(2))?,
            third.ok_or_else(|| missing(3))?,
        ];
        let status = term_status::overall_status(terms.each_ref().map(|t| t.status));

        Ok(Self {
            record,
            terms,
            status,
        })
    }

    /// Term by 1-based number.
    pub fn term(&self, term_no: i32) -> Result<&Term> {
        Ok(&self.terms[term_status::term_index(term_no)?])
    }

    /// Sum of paid terms.
    #[must_use]
    pub fn amount_paid(&self) -> i64 {
        self.sum_where(|t| t.paid)
    }

    /// Sum of unpaid terms.
    #[must_use]
    pub fn amount_outstanding(&self) -> i64 {
        self.sum_where(|t| !t.paid)
    }

    /// Sum of unpaid terms past their due date.
    #[must_use]
    pub fn amount_overdue(&self) -> i64 {
        self.sum_where(|t| t.status == TermStatus::Overdue)
    }

    fn sum_where(&self, predicate: impl Fn(&Term) -> bool) -> i64 {
        self.terms
            .iter()
            .filter(|t| predicate(t))
            .map(|t| t.amount_due)
            .sum()
    }
}

/// Filters for [`list_fee_records`]; `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct FeeFilter {
    /// Only records for this class
    pub class: Option<String>,
    /// Only records for this section
    pub section: Option<String>,
    /// Only records whose derived overall status matches
    pub status: Option<TermStatus>,
}

fn term_from_model(model: &fee_term::Model, today: NaiveDate) -> Result<Term> {
    let payment_method = model
        .payment_method
        .as_deref()
        .map(str::parse::<PaymentMethod>)
        .transpose()?;

    let mut term = Term {
        term_no: model.term_no,
        amount_due: model.amount_due,
        status: TermStatus::Pending,
        paid: model.paid,
        payment_date: model.payment_date,
        payment_method,
        due_date: model.due_date,
    };
    term.refresh(today);
    Ok(term)
}

/// Creates a fee record and its three terms.
///
/// Amounts default to an even split with the remainder in term 3. Only
/// admins and superadmins may create records.
pub async fn create_fee_record(
    db: &DatabaseConnection,
    session: &Session,
    new_record: NewFeeRecord,
    today: NaiveDate,
) -> Result<FeeRecordView> {
    session.require(FEE_MANAGERS, "create fee records")?;
    let amounts = new_record.term_amounts()?;

    let terms: [Term; TERM_COUNT] = std::array::from_fn(|index| {
        let term_no = i32::try_from(index).unwrap_or_default() + 1;
        Term::new(term_no, amounts[index], new_record.due_dates[index], today)
    });
    let status = term_status::overall_status(terms.each_ref().map(|t| t.status));

    let txn = db.begin().await?;

    let now = chrono::Utc::now().naive_utc();
    let record = fee_record::ActiveModel {
        student_id: Set(new_record.student_id.trim().to_string()),
        student_name: Set(new_record.student_name.trim().to_string()),
        class: Set(new_record.class.trim().to_string()),
        section: Set(new_record.section.trim().to_string()),
        amount: Set(new_record.amount),
        status: Set(status.as_str().to_string()),
        created_by: Set(session.user_id.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut term_models = Vec::with_capacity(TERM_COUNT);
    for term in &terms {
        let model = fee_term::ActiveModel {
            fee_record_id: Set(record.id),
            term_no: Set(term.term_no),
            amount_due: Set(term.amount_due),
            status: Set(term.status.as_str().to_string()),
            paid: Set(false),
            payment_date: Set(None),
            payment_method: Set(None),
            due_date: Set(term.due_date),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        term_models.push(model);
    }

    txn.commit().await?;

    tracing::info!(
        fee_record_id = record.id,
        student_id = %record.student_id,
        amount = record.amount,
        created_by = %session.user_id,
        "Created fee record"
    );

    FeeRecordView::from_models(record, &term_models, today)
}

/// Finds a fee record by ID.
pub async fn get_fee_record(
    db: &DatabaseConnection,
    fee_record_id: i64,
    today: NaiveDate,
) -> Result<Option<FeeRecordView>> {
    let Some(record) = FeeRecord::find_by_id(fee_record_id).one(db).await? else {
        return Ok(None);
    };
    let terms = record.find_related(FeeTerm).all(db).await?;
    FeeRecordView::from_models(record, &terms, today).map(Some)
}

/// All fee records of one student, oldest first.
pub async fn get_fee_records_for_student(
    db: &DatabaseConnection,
    student_id: &str,
    today: NaiveDate,
) -> Result<Vec<FeeRecordView>> {
    let records = FeeRecord::find()
        .filter(fee_record::Column::StudentId.eq(student_id.trim()))
        .order_by_asc(fee_record::Column::CreatedAt)
        .order_by_asc(fee_record::Column::Id)
        .all(db)
        .await?;
    load_views(db, records, today).await
}

/// Lists fee records ordered by class, section, and student name.
///
/// Class and section are filtered in the query; the status filter applies to
/// the derived status, since stored statuses go stale as due dates pass.
pub async fn list_fee_records(
    db: &DatabaseConnection,
    filter: &FeeFilter,
    today: NaiveDate,
) -> Result<Vec<FeeRecordView>> {
    let mut query = FeeRecord::find();
    if let Some(class) = &filter.class {
        query = query.filter(fee_record::Column::Class.eq(class.trim()));
    }
    if let Some(section) = &filter.section {
        query = query.filter(fee_record::Column::Section.eq(section.trim()));
    }
    let records = query
        .order_by_asc(fee_record::Column::Class)
        .order_by_asc(fee_record::Column::Section)
        .order_by_asc(fee_record::Column::StudentName)
        .all(db)
        .await?;

    let views = load_views(db, records, today).await?;
    Ok(match filter.status {
        Some(status) => views.into_iter().filter(|v| v.status == status).collect(),
        None => views,
    })
}

async fn load_views(
    db: &DatabaseConnection,
    records: Vec<fee_record::Model>,
    today: NaiveDate,
) -> Result<Vec<FeeRecordView>> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    let term_models = FeeTerm::find()
        .filter(fee_term::Column::FeeRecordId.is_in(ids))
        .all(db)
        .await?;

    let mut by_record: HashMap<i64, Vec<fee_term::Model>> = HashMap::new();
    for model in term_models {
        by_record.entry(model.fee_record_id).or_default().push(model);
    }

    records
        .into_iter()
        .map(|record| {
            let terms = by_record.remove(&record.id).unwrap_or_default();
            FeeRecordView::from_models(record, &terms, today)
        })
        .collect()
}

async fn load_term<C>(
    db: &C,
    fee_record_id: i64,
    term_no: i32,
) -> Result<(fee_record::Model, fee_term::Model)>
where
    C: ConnectionTrait,
{
    term_status::term_index(term_no)?;

    let record = FeeRecord::find_by_id(fee_record_id)
        .one(db)
        .await?
        .ok_or(Error::FeeRecordNotFound { id: fee_record_id })?;

    let term = FeeTerm::find()
        .filter(fee_term::Column::FeeRecordId.eq(fee_record_id))
        .filter(fee_term::Column::TermNo.eq(term_no))
        .one(db)
        .await?
        .ok_or(Error::TermNotFound {
            fee_record_id,
            term_no,
        })?;

    Ok((record, term))
}

async fn save_term<C>(db: &C, model: fee_term::Model, term: &Term) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut active: fee_term::ActiveModel = model.into();
    active.status = Set(term.status.as_str().to_string());
    active.paid = Set(term.paid);
    active.payment_date = Set(term.payment_date);
    active.payment_method = Set(term.payment_method.map(|m| m.as_str().to_string()));
    active.update(db).await?;
    Ok(())
}

/// Re-reads the terms and stores the rolled-up status on the record.
async fn refresh_record<C>(
    db: &C,
    record: fee_record::Model,
    today: NaiveDate,
) -> Result<FeeRecordView>
where
    C: ConnectionTrait,
{
    let terms = record.find_related(FeeTerm).all(db).await?;
    let view = FeeRecordView::from_models(record, &terms, today)?;

    let mut active: fee_record::ActiveModel = view.record.clone().into();
    active.status = Set(view.status.as_str().to_string());
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let record = active.update(db).await?;

    Ok(FeeRecordView { record, ..view })
}

/// Marks a term paid.
///
/// Missing payment details default to today and cash. A term that is already
/// paid with a payment date is locked: only a superadmin may change its
/// details. Payments dated after `today` are rejected.
pub async fn mark_term_paid(
    db: &DatabaseConnection,
    session: &Session,
    fee_record_id: i64,
    term_no: i32,
    details: PaymentDetails,
    today: NaiveDate,
) -> Result<FeeRecordView> {
    session.require(FEE_MANAGERS, "record fee payments")?;
    if let Some(date) = details.payment_date.filter(|date| *date > today) {
        return Err(Error::InvalidDate {
            message: format!("payment date {date} is in the future"),
        });
    }

    let txn = db.begin().await?;
    let (record, model) = load_term(&txn, fee_record_id, term_no).await?;
    let mut term = term_from_model(&model, today)?;

    if term.is_locked() && !session.is_superadmin() {
        tracing::warn!(fee_record_id, term_no, user_id = %session.user_id, "Term already paid");
        return Err(Error::TermLocked {
            fee_record_id,
            term_no,
        });
    }

    if details.payment_date.is_some() {
        term.payment_date = details.payment_date;
    }
    if details.payment_method.is_some() {
        term.payment_method = details.payment_method;
    }
    term.set_paid(true, today);

    save_term(&txn, model, &term).await?;
    let view = refresh_record(&txn, record, today).await?;
    txn.commit().await?;

    tracing::info!(
        fee_record_id,
        term_no,
        amount = term.amount_due,
        method = ?term.payment_method,
        user_id = %session.user_id,
        "Recorded term payment"
    );

    Ok(view)
}

/// Reverts a term to unpaid, clearing its payment details.
///
/// Locked terms (paid with a payment date) can only be reverted by a
/// superadmin. Reverting an unpaid term is a no-op that still refreshes the
/// stored status.
pub async fn mark_term_unpaid(
    db: &DatabaseConnection,
    session: &Session,
    fee_record_id: i64,
    term_no: i32,
    today: NaiveDate,
) -> Result<FeeRecordView> {
    session.require(FEE_MANAGERS, "revert fee payments")?;

    let txn = db.begin().await?;
    let (record, model) = load_term(&txn, fee_record_id, term_no).await?;
    let mut term = term_from_model(&model, today)?;

    if term.is_locked() && !session.is_superadmin() {
        tracing::warn!(
            fee_record_id,
            term_no,
            user_id = %session.user_id,
            "Rejected revert of locked payment"
        );
        return Err(Error::TermLocked {
            fee_record_id,
            term_no,
        });
    }

    let was_paid = term.paid;
    term.set_paid(false, today);
    save_term(&txn, model, &term).await?;
    let view = refresh_record(&txn, record, today).await?;
    txn.commit().await?;

    if was_paid {
        tracing::info!(fee_record_id, term_no, user_id = %session.user_id, "Reverted term payment");
    }

    Ok(view)
}

/// Deletes a fee record and its terms.
pub async fn delete_fee_record(
    db: &DatabaseConnection,
    session: &Session,
    fee_record_id: i64,
) -> Result<()> {
    session.require(FEE_MANAGERS, "delete fee records")?;

    let txn = db.begin().await?;
    let record = FeeRecord::find_by_id(fee_record_id)
        .one(&txn)
        .await?
        .ok_or(Error::FeeRecordNotFound { id: fee_record_id })?;

    FeeTerm::delete_many()
        .filter(fee_term::Column::FeeRecordId.eq(fee_record_id))
        .exec(&txn)
        .await?;
    record.delete(&txn).await?;
    txn.commit().await?;

    tracing::info!(fee_record_id, user_id = %session.user_id, "Deleted fee record");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::session::Role;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_fee_record_default_split() -> Result<()> {
        let db = setup_test_db().await?;
        let today = test_today();

        let view = create_test_fee_record(&db, "S-001", 15000).await?;

        assert_eq!(view.record.amount, 15000);
        assert_eq!(
            view.terms.each_ref().map(|t| t.amount_due),
            [5000, 5000, 5000]
        );
        assert_eq!(view.status, TermStatus::Pending);
        assert!(view.terms.iter().all(|t| !t.paid && t.payment_date.is_none()));

        let reloaded = get_fee_record(&db, view.record.id, today).await?.unwrap();
        assert_eq!(reloaded.terms, view.terms);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_fee_record_remainder_in_term_three() -> Result<()> {
        let db = setup_test_db().await?;
        let view = create_test_fee_record(&db, "S-002", 10000).await?;
        assert_eq!(
            view.terms.each_ref().map(|t| t.amount_due),
            [3333, 3333, 3334]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_create_fee_record_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = admin_session();
        let today = test_today();

        let mut input = test_new_fee_record("S-003", 9000);
        input.student_name = "   ".to_string();
        let result = create_fee_record(&db, &admin, input, today).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let input = test_new_fee_record("S-003", -5);
        let result = create_fee_record(&db, &admin, input, today).await;
        assert!(matches!(result, Err(Error::InvalidAmount { amount: -5 })));

        let mut input = test_new_fee_record("S-003", 9000);
        input.term_amounts = Some([3000, 3000, 2000]);
        let result = create_fee_record(&db, &admin, input, today).await;
        assert!(matches!(result, Err(Error::InvalidAmount { amount: 8000 })));

        let mut input = test_new_fee_record("S-003", 9000);
        input.due_dates = [
            NaiveDate::from_ymd_opt(2024, 9, 1),
            NaiveDate::from_ymd_opt(2024, 5, 1),
            None,
        ];
        let result = create_fee_record(&db, &admin, input, today).await;
        assert!(matches!(result, Err(Error::InvalidDate { .. })));

        let student = Session::new("student-1", Role::Student);
        let result =
            create_fee_record(&db, &student, test_new_fee_record("S-003", 9000), today).await;
        assert!(matches!(result, Err(Error::Unauthorized { .. })));

        assert!(list_fee_records(&db, &FeeFilter::default(), today).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_with_explicit_term_amounts() -> Result<()> {
        let db = setup_test_db().await?;
        let mut input = test_new_fee_record("S-004", 12000);
        input.term_amounts = Some([6000, 4000, 2000]);
        let view = create_fee_record(&db, &admin_session(), input, test_today()).await?;
        assert_eq!(view.term(2)?.amount_due, 4000);
        Ok(())
    }

    #[test]
    fn test_term_amounts_overflow_is_rejected() {
        let mut input = test_new_fee_record("S-005", 0);
        input.term_amounts = Some([i64::MAX, i64::MAX, 0]);
        assert!(matches!(
            input.term_amounts(),
            Err(Error::InvalidAmount { amount: i64::MAX })
        ));
    }

    #[tokio::test]
    async fn test_mark_term_paid_defaults() -> Result<()> {
        let db = setup_test_db().await?;
        let today = test_today();
        let view = create_test_fee_record(&db, "S-010", 15000).await?;

        let view = mark_term_paid(
            &db,
            &admin_session(),
            view.record.id,
            1,
            PaymentDetails::default(),
            today,
        )
        .await?;

        let term = view.term(1)?;
        assert!(term.paid);
        assert_eq!(term.status, TermStatus::Paid);
        assert_eq!(term.payment_date, Some(today));
        assert_eq!(term.payment_method, Some(PaymentMethod::Cash));
        assert_eq!(view.status, TermStatus::Pending);
        assert_eq!(view.amount_paid(), 5000);
        assert_eq!(view.amount_outstanding(), 10000);
        Ok(())
    }

    #[tokio::test]
    async fn test_all_terms_paid_rolls_up_to_paid() -> Result<()> {
        let db = setup_test_db().await?;
        let today = test_today();
        let admin = admin_session();
        let id = create_test_fee_record(&db, "S-011", 3000).await?.record.id;

        let details = PaymentDetails {
            payment_date: NaiveDate::from_ymd_opt(2024, 5, 2),
            payment_method: Some(PaymentMethod::Online),
        };
        for term_no in 1..=3 {
            mark_term_paid(&db, &admin, id, term_no, details, today).await?;
        }

        let view = get_fee_record(&db, id, today).await?.unwrap();
        assert_eq!(view.status, TermStatus::Paid);
        assert_eq!(view.record.status, "Paid");
        assert_eq!(view.term(3)?.payment_method, Some(PaymentMethod::Online));
        Ok(())
    }

    #[tokio::test]
    async fn test_future_payment_date_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let today = test_today();
        let id = create_test_fee_record(&db, "S-012", 3000).await?.record.id;

        let details = PaymentDetails {
            payment_date: today.succ_opt(),
            payment_method: None,
        };
        let result = mark_term_paid(&db, &admin_session(), id, 1, details, today).await;
        assert!(matches!(result, Err(Error::InvalidDate { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_locked_term_needs_superadmin_to_revert() -> Result<()> {
        let db = setup_test_db().await?;
        let today = test_today();
        let admin = admin_session();
        let id = create_test_fee_record(&db, "S-013", 3000).await?.record.id;

        mark_term_paid(&db, &admin, id, 2, PaymentDetails::default(), today).await?;

        let result = mark_term_unpaid(&db, &admin, id, 2, today).await;
        assert!(matches!(
            result,
            Err(Error::TermLocked {
                fee_record_id: _,
                term_no: 2
            })
        ));

        let result = mark_term_paid(&db, &admin, id, 2, PaymentDetails::default(), today).await;
        assert!(matches!(result, Err(Error::TermLocked { .. })));

        let view = mark_term_unpaid(&db, &superadmin_session(), id, 2, today).await?;
        let term = view.term(2)?;
        assert!(!term.paid);
        assert_eq!(term.payment_date, None);
        assert_eq!(term.payment_method, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_overdue_is_derived_on_read() -> Result<()> {
        let db = setup_test_db().await?;
        let created_on = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut input = test_new_fee_record("S-020", 3000);
        input.due_dates = [NaiveDate::from_ymd_opt(2024, 4, 30), None, None];
        let view = create_fee_record(&db, &admin_session(), input, created_on).await?;
        assert_eq!(view.status, TermStatus::Pending);

        let later = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let view = get_fee_record(&db, view.record.id, later).await?.unwrap();
        assert_eq!(view.term(1)?.status, TermStatus::Overdue);
        assert_eq!(view.status, TermStatus::Overdue);
        assert_eq!(view.amount_overdue(), 1000);
        // Stored status is still the one written at creation
        assert_eq!(view.record.status, "Pending");

        let filter = FeeFilter {
            status: Some(TermStatus::Overdue),
            ..FeeFilter::default()
        };
        assert_eq!(list_fee_records(&db, &filter, later).await?.len(), 1);
        assert!(list_fee_records(&db, &filter, created_on).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_filters_and_student_lookup() -> Result<()> {
        let db = setup_test_db().await?;
        let today = test_today();
        let admin = admin_session();

        let mut input = test_new_fee_record("S-030", 3000);
        input.class = "9".to_string();
        create_fee_record(&db, &admin, input, today).await?;
        create_test_fee_record(&db, "S-031", 3000).await?;
        create_test_fee_record(&db, "S-031", 4500).await?;

        let filter = FeeFilter {
            class: Some("10".to_string()),
            ..FeeFilter::default()
        };
        assert_eq!(list_fee_records(&db, &filter, today).await?.len(), 2);

        let filter = FeeFilter {
            section: Some("B".to_string()),
            ..FeeFilter::default()
        };
        assert!(list_fee_records(&db, &filter, today).await?.is_empty());

        let records = get_fee_records_for_student(&db, "S-031", today).await?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].record.amount, 4500);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_fee_record() -> Result<()> {
        let db = setup_test_db().await?;
        let today = test_today();
        let id = create_test_fee_record(&db, "S-040", 3000).await?.record.id;

        let result = delete_fee_record(&db, &Session::new("t", Role::Teacher), id).await;
        assert!(matches!(result, Err(Error::Unauthorized { .. })));

        delete_fee_record(&db, &admin_session(), id).await?;
        assert!(get_fee_record(&db, id, today).await?.is_none());
        assert!(FeeTerm::find().all(&db).await?.is_empty());

        let result = delete_fee_record(&db, &admin_session(), id).await;
        assert!(matches!(result, Err(Error::FeeRecordNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_term_number() -> Result<()> {
        let db = setup_test_db().await?;
        let id = create_test_fee_record(&db, "S-050", 3000).await?.record.id;
        let result = mark_term_paid(
            &db,
            &admin_session(),
            id,
            4,
            PaymentDetails::default(),
            test_today(),
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidTerm { term_no: 4 })));
        Ok(())
    }
}
