//! Report generation business logic.
//!
//! This module summarises fee collection and daily attendance. All functions
//! return structured data; formatting helpers produce plain text that the bot
//! layer wraps in code blocks or embeds.

use crate::{
    core::{
        attendance,
        attendance_status::{AttendanceStatus, PersonKind},
        fee::{self, FeeFilter, FeeRecordView},
        term_status::TermStatus,
    },
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use std::fmt::Write;

/// Fee collection totals across a set of fee records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeSummary {
    /// Number of records included
    pub record_count: usize,
    /// Sum of all record amounts
    pub total_amount: i64,
    /// Sum of paid terms
    pub collected: i64,
    /// Sum of unpaid terms
    pub outstanding: i64,
    /// Sum of unpaid terms past their due date
    pub overdue: i64,
    /// Records whose overall status is Paid
    pub paid_records: usize,
    /// Records whose overall status is Pending
    pub pending_records: usize,
    /// Records whose overall status is Overdue
    pub overdue_records: usize,
}

impl FeeSummary {
    /// Aggregates already-loaded fee record views.
    #[must_use]
    pub fn from_views(views: &[FeeRecordView]) -> Self {
        views.iter().fold(Self::default(), |mut summary, view| {
            summary.record_count += 1;
            summary.total_amount += view.record.amount;
            summary.collected += view.amount_paid();
            summary.outstanding += view.amount_outstanding();
            summary.overdue += view.amount_overdue();
            match view.status {
                TermStatus::Paid => summary.paid_records += 1,
                TermStatus::Pending => summary.pending_records += 1,
                TermStatus::Overdue => summary.overdue_records += 1,
            }
            summary
        })
    }

    /// Share of the total that has been collected, 0-100.
    #[must_use]
    pub fn collection_percent(&self) -> f64 {
        if self.total_amount == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)] // Fee totals are far below 2^52
        let percent = (self.collected as f64 / self.total_amount as f64) * 100.0;
        percent
    }
}

/// Builds the fee summary for records matching `filter`, with statuses as of `today`.
pub async fn fee_summary(
    db: &DatabaseConnection,
    filter: &FeeFilter,
    today: NaiveDate,
) -> Result<FeeSummary> {
    let views = fee::list_fee_records(db, filter, today).await?;
    Ok(FeeSummary::from_views(&views))
}

/// Attendance counts for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSummary {
    /// Students or teachers
    pub kind: PersonKind,
    /// Day summarised
    pub date: NaiveDate,
    /// Count per selectable status, in display order
    pub counts: Vec<(AttendanceStatus, usize)>,
}

impl AttendanceSummary {
    /// Number of marked rows.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }
}

/// Counts one date's attendance per status.
pub async fn attendance_summary(
    db: &DatabaseConnection,
    kind: PersonKind,
    date: NaiveDate,
) -> Result<AttendanceSummary> {
    let counts = attendance::count_by_status(db, kind, date).await?;
    Ok(AttendanceSummary {
        kind,
        date,
        counts: AttendanceStatus::SELECTABLE
            .into_iter()
            .filter(|status| status.allowed_for(kind))
            .map(|status| (status, counts.get(&status).copied().unwrap_or(0)))
            .collect(),
    })
}

/// Formats a fee summary as an aligned text block.
pub fn format_fee_summary(summary: &FeeSummary) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "Records:      {}", summary.record_count)?;
    writeln!(out, "Total fees:   {}", summary.total_amount)?;
    writeln!(
        out,
        "Collected:    {} ({:.1}%)",
        summary.collected,
        summary.collection_percent()
    )?;
    writeln!(out, "Outstanding:  {}", summary.outstanding)?;
    writeln!(out, "Overdue:      {}", summary.overdue)?;
    write!(
        out,
        "Status:       {} paid / {} pending / {} overdue",
        summary.paid_records, summary.pending_records, summary.overdue_records
    )?;
    Ok(out)
}

/// Formats an attendance summary as one line per status.
pub fn format_attendance_summary(summary: &AttendanceSummary) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{} attendance for {}", capitalize(summary.kind.as_str()), summary.date)?;
    for (status, count) in &summary.counts {
        writeln!(out, "{:<10} {count}", status.as_str())?;
    }
    write!(out, "{:<10} {}", "Total", summary.total())?;
    Ok(out)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{
        attendance_status::parse_bulk_entries,
        fee::PaymentDetails,
    };
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_fee_summary_totals() -> Result<()> {
        let db = setup_test_db().await?;
        let today = test_today();
        let admin = admin_session();

        let paid = create_test_fee_record(&db, "S-100", 3000).await?;
        for term_no in 1..=3 {
            fee::mark_term_paid(&db, &admin, paid.record.id, term_no, PaymentDetails::default(), today)
                .await?;
        }
        let partial = create_test_fee_record(&db, "S-101", 6000).await?;
        fee::mark_term_paid(&db, &admin, partial.record.id, 1, PaymentDetails::default(), today)
            .await?;

        let summary = fee_summary(&db, &FeeFilter::default(), today).await?;
        assert_eq!(summary.record_count, 2);
        assert_eq!(summary.total_amount, 9000);
        assert_eq!(summary.collected, 5000);
        assert_eq!(summary.outstanding, 4000);
        assert_eq!(summary.overdue, 0);
        assert_eq!(summary.paid_records, 1);
        assert_eq!(summary.pending_records, 1);

        let text = format_fee_summary(&summary)?;
        assert!(text.contains("Collected:    5000 (55.6%)"));
        Ok(())
    }

    #[test]
    fn test_collection_percent_empty() {
        assert_eq!(FeeSummary::default().collection_percent(), 0.0);
    }

    #[tokio::test]
    async fn test_attendance_summary() -> Result<()> {
        let db = setup_test_db().await?;
        let date = test_today();
        let entries = parse_bulk_entries("t1:present, t2:late, t3:late:09:45", PersonKind::Teacher)?;
        attendance::save_bulk(&db, &admin_session(), PersonKind::Teacher, date, entries).await?;

        let summary = attendance_summary(&db, PersonKind::Teacher, date).await?;
        assert_eq!(summary.total(), 3);
        assert!(summary.counts.contains(&(AttendanceStatus::Late, 2)));

        let text = format_attendance_summary(&summary)?;
        assert!(text.starts_with("Teacher attendance for"));

        // Late is not a student status, so it is not listed
        let student_summary = attendance_summary(&db, PersonKind::Student, date).await?;
        assert_eq!(student_summary.total(), 0);
        assert!(
            !student_summary
                .counts
                .iter()
                .any(|(status, _)| *status == AttendanceStatus::Late)
        );
        Ok(())
    }
}
