//! Attendance status rules.
//!
//! Each attendance row carries a status plus three auxiliary fields: check-in
//! time, check-out time, and a comment. Which of those apply depends on the
//! status, and switching status resets the fields to what the new status
//! expects. No history is kept: moving away from a status drops its data.

use crate::errors::{Error, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Fixed comment recorded for absences.
pub const NOT_INFORMED: &str = "Not Informed";

/// Comments selectable for half days and leave.
pub const COMMENT_OPTIONS: [&str; 6] = [
    "Sick Leave",
    "Casual Leave",
    "Family Emergency",
    "Medical Appointment",
    "Personal Work",
    "Other",
];

/// Check-in time assumed for a late arrival when none is given.
#[must_use]
pub fn default_check_in() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()
}

/// Check-out time assumed for a half day when none is given.
#[must_use]
pub fn default_check_out() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()
}

/// Parses an `HH:MM` time.
pub fn parse_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| Error::Parse {
        field: "time".to_string(),
        value: value.to_string(),
    })
}

/// Who an attendance row is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonKind {
    /// Student attendance, marked by teachers and admins
    Student,
    /// Teacher attendance, marked by admins
    Teacher,
}

impl PersonKind {
    /// Storage form of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
        }
    }
}

impl fmt::Display for PersonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersonKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "student" | "students" => Ok(Self::Student),
            "teacher" | "teachers" => Ok(Self::Teacher),
            _ => Err(Error::Parse {
                field: "person kind".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Attendance state for one person on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AttendanceStatus {
    /// Not yet marked; never persisted
    #[default]
    Unset,
    /// Present for the whole day
    Present,
    /// Absent without notice
    Absent,
    /// Arrived late (teachers only)
    Late,
    /// Left early
    HalfDay,
    /// On approved leave
    Leave,
}

/// Which auxiliary fields a status uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRules {
    /// Check-in time applies
    pub check_in: bool,
    /// Check-out time applies
    pub check_out: bool,
    /// A comment is recorded
    pub comment: bool,
    /// The comment can be chosen by the user
    pub comment_editable: bool,
}

impl AttendanceStatus {
    /// Statuses a user can select, in display order.
    pub const SELECTABLE: [Self; 5] = [
        Self::Present,
        Self::Absent,
        Self::Late,
        Self::HalfDay,
        Self::Leave,
    ];

    /// Display and storage form of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Late => "Late",
            Self::HalfDay => "Half Day",
            Self::Leave => "Leave",
        }
    }

    /// Auxiliary fields relevant to this status.
    #[must_use]
    pub const fn fields(self) -> FieldRules {
        match self {
            Self::Unset | Self::Present => FieldRules {
                check_in: false,
                check_out: false,
                comment: false,
                comment_editable: false,
            },
            Self::Absent => FieldRules {
                check_in: false,
                check_out: false,
                comment: true,
                comment_editable: false,
            },
            Self::Late => FieldRules {
                check_in: true,
                check_out: false,
                comment: false,
                comment_editable: false,
            },
            Self::HalfDay => FieldRules {
                check_in: false,
                check_out: true,
                comment: true,
                comment_editable: true,
            },
            Self::Leave => FieldRules {
                check_in: false,
                check_out: false,
                comment: true,
                comment_editable: true,
            },
        }
    }

    /// Late is only tracked for teachers.
    #[must_use]
    pub const fn allowed_for(self, kind: PersonKind) -> bool {
        !matches!((self, kind), (Self::Late, PersonKind::Student))
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match normalized.as_str() {
            "" => Ok(Self::Unset),
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            "late" => Ok(Self::Late),
            "halfday" => Ok(Self::HalfDay),
            "leave" => Ok(Self::Leave),
            _ => Err(Error::Parse {
                field: "attendance status".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// One person's attendance row as edited before saving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    /// ID of the student or teacher
    pub person_id: String,
    /// Selected status
    pub status: AttendanceStatus,
    /// Arrival time, late arrivals only
    pub check_in: Option<NaiveTime>,
    /// Departure time, half days only
    pub check_out: Option<NaiveTime>,
    /// Absence reason
    pub comment: Option<String>,
}

impl AttendanceEntry {
    /// Creates an unmarked row.
    #[must_use]
    pub fn new(person_id: impl Into<String>) -> Self {
        Self {
            person_id: person_id.into(),
            status: AttendanceStatus::Unset,
            check_in: None,
            check_out: None,
            comment: None,
        }
    }

    /// Switches status and resets the auxiliary fields for it.
    ///
    /// Defaults are only filled in where the field is empty, so a late
    /// check-in that was already entered survives re-selecting `Late`.
    pub fn apply_status(&mut self, status: AttendanceStatus, kind: PersonKind) -> Result<()> {
        if !status.allowed_for(kind) {
            return Err(Error::InvalidAttendance {
                message: format!("status '{status}' is not available for a {kind}"),
            });
        }

        let rules = status.fields();
        self.status = status;

        if !rules.check_in {
            self.check_in = None;
        }
        if !rules.check_out {
            self.check_out = None;
        }

        match status {
            AttendanceStatus::Unset | AttendanceStatus::Present => self.comment = None,
            AttendanceStatus::Absent => self.comment = Some(NOT_INFORMED.to_string()),
            AttendanceStatus::Late => {
                self.comment = None;
                self.check_in.get_or_insert_with(default_check_in);
            }
            AttendanceStatus::HalfDay => {
                self.check_out.get_or_insert_with(default_check_out);
                self.retain_selectable_comment();
            }
            AttendanceStatus::Leave => self.retain_selectable_comment(),
        }
        Ok(())
    }

    /// Builder form of [`AttendanceEntry::apply_status`].
    pub fn with_status(mut self, status: AttendanceStatus, kind: PersonKind) -> Result<Self> {
        self.apply_status(status, kind)?;
        Ok(self)
    }

    /// Sets the comment for a status whose comment is user-selectable.
    pub fn set_comment(&mut self, comment: &str) -> Result<()> {
        if !self.status.fields().comment_editable {
            return Err(Error::InvalidAttendance {
                message: format!("comment cannot be changed for status '{}'", self.status),
            });
        }
        let Some(option) = COMMENT_OPTIONS
            .iter()
            .find(|option| option.eq_ignore_ascii_case(comment.trim()))
        else {
            return Err(Error::InvalidAttendance {
                message: format!("'{comment}' is not one of the allowed comments"),
            });
        };
        self.comment = Some((*option).to_string());
        Ok(())
    }

    /// Overrides the check-in time of a late arrival.
    pub fn set_check_in(&mut self, time: NaiveTime) -> Result<()> {
        if !self.status.fields().check_in {
            return Err(Error::InvalidAttendance {
                message: format!("check-in does not apply to status '{}'", self.status),
            });
        }
        self.check_in = Some(time);
        Ok(())
    }

    /// Overrides the check-out time of a half day.
    pub fn set_check_out(&mut self, time: NaiveTime) -> Result<()> {
        if !self.status.fields().check_out {
            return Err(Error::InvalidAttendance {
                message: format!("check-out does not apply to status '{}'", self.status),
            });
        }
        self.check_out = Some(time);
        Ok(())
    }

    fn retain_selectable_comment(&mut self) {
        let keep = self
            .comment
            .as_deref()
            .is_some_and(|c| COMMENT_OPTIONS.contains(&c));
        if !keep {
            self.comment = None;
        }
    }
}

/// Drops rows that were never marked and keeps one row per person.
///
/// When a person appears more than once the last row wins, in the position
/// of their first row.
#[must_use]
pub fn bulk_payload(entries: Vec<AttendanceEntry>) -> Vec<AttendanceEntry> {
    let mut payload: Vec<AttendanceEntry> = Vec::with_capacity(entries.len());
    for entry in entries
        .into_iter()
        .filter(|entry| entry.status != AttendanceStatus::Unset)
    {
        match payload
            .iter_mut()
            .find(|kept| kept.person_id.trim() == entry.person_id.trim())
        {
            Some(kept) => *kept = entry,
            None => payload.push(entry),
        }
    }
    payload
}

/// Parses bulk attendance input of the form `id:status[:comment-or-time]`,
/// entries separated by commas.
///
/// The optional third part is handled by [`build_entry`]. Empty statuses are
/// accepted and produce unmarked rows.
pub fn parse_bulk_entries(input: &str, kind: PersonKind) -> Result<Vec<AttendanceEntry>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| parse_bulk_entry(chunk, kind))
        .collect()
}

fn parse_bulk_entry(chunk: &str, kind: PersonKind) -> Result<AttendanceEntry> {
    let mut parts = chunk.splitn(3, ':').map(str::trim);
    let person_id = parts.next().filter(|id| !id.is_empty()).ok_or_else(|| Error::Parse {
        field: "attendance entry".to_string(),
        value: chunk.to_string(),
    })?;
    let status: AttendanceStatus = parts.next().unwrap_or_default().parse()?;
    build_entry(person_id, status, parts.next(), kind)
}

/// Builds a marked entry from a status plus its optional detail: an `HH:MM`
/// check-in for late arrivals, an `HH:MM` check-out or a comment for half
/// days, and a comment for leave.
pub fn build_entry(
    person_id: &str,
    status: AttendanceStatus,
    detail: Option<&str>,
    kind: PersonKind,
) -> Result<AttendanceEntry> {
    let mut entry = AttendanceEntry::new(person_id.trim()).with_status(status, kind)?;
    let Some(detail) = detail.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(entry);
    };
    match status {
        AttendanceStatus::Late => entry.set_check_in(parse_time(detail)?)?,
        AttendanceStatus::HalfDay => match parse_time(detail) {
            Ok(check_out) => entry.set_check_out(check_out)?,
            Err(_) => entry.set_comment(detail)?,
        },
        AttendanceStatus::Leave => entry.set_comment(detail)?,
        _ => {
            return Err(Error::InvalidAttendance {
                message: format!("'{detail}' does not apply to status '{status}'"),
            });
        }
    }
    Ok(entry)
}
