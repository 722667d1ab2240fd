//! Fee term status derivation.
//!
//! A fee record is split into three installment terms. Each term's status is a
//! pure function of its `paid` flag, its due date, and the current date, and the
//! record's overall status is rolled up from the three term statuses. Nothing in
//! this module touches the database, so the same rules apply to stored records
//! and to records still being edited.

use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Number of installment terms per fee record.
pub const TERM_COUNT: usize = 3;

/// Payment state of a single term, or of a whole fee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermStatus {
    /// Not paid and not yet past its due date
    Pending,
    /// Paid in full
    Paid,
    /// Not paid and the due date has passed
    Overdue,
}

impl TermStatus {
    /// Display and storage form of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Overdue => "Overdue",
        }
    }

    /// Emoji used when rendering the status in replies.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Pending => "🟡",
            Self::Paid => "🟢",
            Self::Overdue => "🔴",
        }
    }
}

impl fmt::Display for TermStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TermStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            _ => Err(Error::Parse {
                field: "fee status".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// How a term was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Default when a term is marked paid without a method
    #[default]
    Cash,
    /// Bank cheque
    Cheque,
    /// Online transfer
    Online,
    /// Debit or credit card
    Card,
}

impl PaymentMethod {
    /// All accepted methods, in display order.
    pub const ALL: [Self; 4] = [Self::Cash, Self::Cheque, Self::Online, Self::Card];

    /// Display and storage form of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Cheque => "Cheque",
            Self::Online => "Online",
            Self::Card => "Card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Parse {
                field: "payment method".to_string(),
                value: s.to_string(),
            })
    }
}

/// One installment of a fee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Term number, 1 to 3
    pub term_no: i32,
    /// Amount owed for this term
    pub amount_due: i64,
    /// Derived status; kept in sync by [`Term::set_paid`] and [`Term::refresh`]
    pub status: TermStatus,
    /// Whether the term has been paid
    pub paid: bool,
    /// Date of payment, only set while `paid`
    pub payment_date: Option<NaiveDate>,
    /// Payment method, only set while `paid`
    pub payment_method: Option<PaymentMethod>,
    /// When the term falls due
    pub due_date: Option<NaiveDate>,
}

impl Term {
    /// Creates an unpaid term with its status derived for `today`.
    #[must_use]
    pub fn new(term_no: i32, amount_due: i64, due_date: Option<NaiveDate>, today: NaiveDate) -> Self {
        Self {
            term_no,
            amount_due,
            status: derive_term_status(false, due_date, today),
            paid: false,
            payment_date: None,
            payment_method: None,
            due_date,
        }
    }

    /// Toggles the paid flag.
    ///
    /// Marking paid fills in today's date and `Cash` for whichever payment
    /// details are missing. Marking unpaid clears both.
    pub fn set_paid(&mut self, paid: bool, today: NaiveDate) {
        self.paid = paid;
        if paid {
            self.payment_date.get_or_insert(today);
            self.payment_method.get_or_insert(PaymentMethod::Cash);
        } else {
            self.payment_date = None;
            self.payment_method = None;
        }
        self.refresh(today);
    }

    /// Recomputes `status` from the current inputs.
    pub fn refresh(&mut self, today: NaiveDate) {
        self.status = derive_term_status(self.paid, self.due_date, today);
    }

    /// A term paid with a recorded payment date is locked against un-paying.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.paid && self.payment_date.is_some()
    }
}

/// Derives a single term's status.
///
/// `paid` wins outright; an unpaid term is overdue only once its due date is
/// strictly before `today`. A term without a due date is never overdue.
#[must_use]
pub fn derive_term_status(paid: bool, due_date: Option<NaiveDate>, today: NaiveDate) -> TermStatus {
    if paid {
        TermStatus::Paid
    } else if due_date.is_some_and(|due| due < today) {
        TermStatus::Overdue
    } else {
        TermStatus::Pending
    }
}

/// Rolls three term statuses into the record's overall status.
///
/// There is no partially-paid state: two paid terms and one pending term
/// report `Pending`.
#[must_use]
pub fn overall_status(statuses: [TermStatus; TERM_COUNT]) -> TermStatus {
    if statuses.iter().all(|s| *s == TermStatus::Paid) {
        TermStatus::Paid
    } else if statuses.contains(&TermStatus::Overdue) {
        TermStatus::Overdue
    } else {
        TermStatus::Pending
    }
}

/// Splits a total fee into three term amounts, folding the remainder into
/// the third term.
pub fn split_amount(amount: i64) -> Result<[i64; TERM_COUNT]> {
    if amount < 0 {
        return Err(Error::InvalidAmount { amount });
    }
    let base = amount / 3;
    Ok([base, base, amount - base * 2])
}

/// Checks a 1-based term number and returns its index into a term array.
pub fn term_index(term_no: i32) -> Result<usize> {
    match term_no {
        1..=3 => usize::try_from(term_no - 1).map_err(|_| Error::InvalidTerm { term_no }),
        _ => Err(Error::InvalidTerm { term_no }),
    }
}
