//! Parsing and rendering helpers shared by the Discord commands.

use crate::{
    core::{
        attendance_status::{AttendanceEntry, AttendanceStatus},
        fee::FeeRecordView,
        term_status::{TERM_COUNT, Term, TermStatus},
    },
    entities::attendance_record,
    errors::{Error, Result},
};
use chrono::NaiveDate;
use std::fmt::Write;

/// Discord rejects messages over 2000 characters; leave room for wrapping.
pub const MAX_REPLY_LEN: usize = 1800;

/// Current local date, used as "today" for status derivation.
#[must_use]
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| Error::Parse {
        field: "date (expected YYYY-MM-DD)".to_string(),
        value: value.to_string(),
    })
}

/// Parses an optional date argument, falling back to `default`.
pub fn parse_date_or(value: Option<&str>, default: NaiveDate) -> Result<NaiveDate> {
    value.map_or(Ok(default), parse_date)
}

/// Parses `"6000,4000,2000"` into three term amounts.
pub fn parse_term_amounts(value: &str) -> Result<[i64; TERM_COUNT]> {
    let parse_error = || Error::Parse {
        field: "term amounts (expected three comma-separated numbers)".to_string(),
        value: value.to_string(),
    };
    let amounts: Vec<i64> = value
        .split(',')
        .map(|part| part.trim().parse::<i64>().map_err(|_| parse_error()))
        .collect::<Result<_>>()?;
    amounts.try_into().map_err(|_| parse_error())
}

fn format_term(term: &Term) -> String {
    let mut line = format!(
        "Term {}: {} - {} {}",
        term.term_no,
        term.amount_due,
        term.status.emoji(),
        term.status
    );
    match (term.status, term.payment_date, term.payment_method, term.due_date) {
        (TermStatus::Paid, Some(date), method, _) => {
            let method = method.map_or("-", |m| m.as_str());
            line.push_str(&format!(" ({date}, {method})"));
        }
        (_, _, _, Some(due)) if term.status != TermStatus::Paid => {
            line.push_str(&format!(" (due {due})"));
        }
        _ => {}
    }
    line
}

/// Renders a full fee record with one line per term.
pub fn format_fee_view(view: &FeeRecordView) -> Result<String> {
    let record = &view.record;
    let mut out = String::new();
    writeln!(
        out,
        "📋 **Fee Record #{}** - {} ({}), Class {}{}",
        record.id,
        record.student_name,
        record.student_id,
        record.class,
        section_suffix(&record.section)
    )?;
    writeln!(
        out,
        "💰 Total: {} | Paid: {} | Outstanding: {}",
        record.amount,
        view.amount_paid(),
        view.amount_outstanding()
    )?;
    writeln!(out, "📊 Status: {} {}", view.status.emoji(), view.status)?;
    for term in &view.terms {
        writeln!(out, "• {}", format_term(term))?;
    }
    Ok(out)
}

/// One-line summary of a fee record for list output.
#[must_use]
pub fn format_fee_line(view: &FeeRecordView) -> String {
    let record = &view.record;
    format!(
        "{} #{} {} ({}) {}{} - {} / {} paid",
        view.status.emoji(),
        record.id,
        record.student_name,
        record.student_id,
        record.class,
        section_suffix(&record.section),
        view.amount_paid(),
        record.amount
    )
}

fn section_suffix(section: &str) -> String {
    if section.is_empty() {
        String::new()
    } else {
        format!("-{section}")
    }
}

/// One line per stored attendance row.
#[must_use]
pub fn format_attendance_row(row: &attendance_record::Model) -> String {
    let mut line = format!("{} {} - {}", row.date, row.person_id, row.status);
    if let Some(check_in) = row.check_in {
        line.push_str(&format!(" (in {})", check_in.format("%H:%M")));
    }
    if let Some(check_out) = row.check_out {
        line.push_str(&format!(" (out {})", check_out.format("%H:%M")));
    }
    if let Some(comment) = &row.comment {
        line.push_str(&format!(" - {comment}"));
    }
    line
}

/// One line per sheet entry, marking people with no saved status.
#[must_use]
pub fn format_attendance_entry(entry: &AttendanceEntry) -> String {
    if entry.status == AttendanceStatus::Unset {
        return format!("{} - ⬜ not marked", entry.person_id);
    }
    let mut line = format!("{} - {}", entry.person_id, entry.status);
    if let Some(check_in) = entry.check_in {
        line.push_str(&format!(" (in {})", check_in.format("%H:%M")));
    }
    if let Some(check_out) = entry.check_out {
        line.push_str(&format!(" (out {})", check_out.format("%H:%M")));
    }
    if let Some(comment) = &entry.comment {
        line.push_str(&format!(" - {comment}"));
    }
    line
}

/// Joins lines under a header, cutting off once the reply would get too long.
pub fn join_limited(header: &str, lines: &[String]) -> Result<String> {
    let mut out = String::from(header);
    for (shown, line) in lines.iter().enumerate() {
        if out.len() + line.len() + 1 > MAX_REPLY_LEN {
            write!(out, "\n…and {} more", lines.len() - shown)?;
            break;
        }
        write!(out, "\n{line}")?;
    }
    Ok(out)
}
