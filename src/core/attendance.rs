//! Attendance business logic - Bulk saving and reading of daily attendance.
//!
//! A bulk save covers one date and one kind of person. Unmarked rows are dropped
//! before anything is written, and each remaining row replaces whatever was
//! stored for the same person and date.

use crate::{
    core::{
        attendance_status::{AttendanceEntry, AttendanceStatus, PersonKind, bulk_payload},
        session::{Session, attendance_roles},
    },
    entities::{AttendanceRecord, attendance_record},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;

/// Converts a stored row back into an editable entry.
pub fn entry_from_model(model: &attendance_record::Model) -> Result<AttendanceEntry> {
    Ok(AttendanceEntry {
        person_id: model.person_id.clone(),
        status: model.status.parse()?,
        check_in: model.check_in,
        check_out: model.check_out,
        comment: model.comment.clone(),
    })
}

/// Saves one date's attendance for students or teachers.
///
/// Rows with no status are skipped and a person listed twice keeps their
/// last row. Each saved row is normalised through the
/// status rules first, so stale auxiliary fields never reach the database.
/// Returns the number of rows written.
pub async fn save_bulk(
    db: &DatabaseConnection,
    session: &Session,
    kind: PersonKind,
    date: NaiveDate,
    entries: Vec<AttendanceEntry>,
) -> Result<usize> {
    session.require(attendance_roles(kind), &format!("mark {kind} attendance"))?;

    let mut payload = bulk_payload(entries);
    for entry in &mut payload {
        if entry.person_id.trim().is_empty() {
            return Err(Error::Validation {
                message: "attendance row without a person ID".to_string(),
            });
        }
        entry.person_id = entry.person_id.trim().to_string();
        entry.apply_status(entry.status, kind)?;
    }

    if payload.is_empty() {
        tracing::debug!(%kind, %date, "No marked attendance rows to save");
        return Ok(0);
    }

    let txn = db.begin().await?;
    let now = chrono::Utc::now().naive_utc();

    for entry in &payload {
        let existing = AttendanceRecord::find()
            .filter(attendance_record::Column::PersonKind.eq(kind.as_str()))
            .filter(attendance_record::Column::PersonId.eq(entry.person_id.as_str()))
            .filter(attendance_record::Column::Date.eq(date))
            .one(&txn)
            .await?;

        let mut active = existing.map_or_else(
            || attendance_record::ActiveModel {
                person_kind: Set(kind.as_str().to_string()),
                person_id: Set(entry.person_id.clone()),
                date: Set(date),
                ..Default::default()
            },
            Into::into,
        );
        active.status = Set(entry.status.as_str().to_string());
        active.check_in = Set(entry.check_in);
        active.check_out = Set(entry.check_out);
        active.comment = Set(entry.comment.clone());
        active.marked_by = Set(session.user_id.clone());
        active.updated_at = Set(now);
        active.save(&txn).await?;
    }

    txn.commit().await?;

    tracing::info!(
        %kind,
        %date,
        rows = payload.len(),
        user_id = %session.user_id,
        "Saved bulk attendance"
    );
    Ok(payload.len())
}

/// All stored rows for one date, ordered by person ID.
pub async fn get_by_date(
    db: &DatabaseConnection,
    kind: PersonKind,
    date: NaiveDate,
) -> Result<Vec<attendance_record::Model>> {
    AttendanceRecord::find()
        .filter(attendance_record::Column::PersonKind.eq(kind.as_str()))
        .filter(attendance_record::Column::Date.eq(date))
        .order_by_asc(attendance_record::Column::PersonId)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Attendance history of one person, newest first.
pub async fn get_for_person(
    db: &DatabaseConnection,
    kind: PersonKind,
    person_id: &str,
) -> Result<Vec<attendance_record::Model>> {
    AttendanceRecord::find()
        .filter(attendance_record::Column::PersonKind.eq(kind.as_str()))
        .filter(attendance_record::Column::PersonId.eq(person_id.trim()))
        .order_by_desc(attendance_record::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Builds the editable sheet for a date: one entry per listed person, filled
/// from stored rows where they exist and unmarked otherwise.
pub async fn roster_for_date(
    db: &DatabaseConnection,
    kind: PersonKind,
    date: NaiveDate,
    person_ids: &[String],
) -> Result<Vec<AttendanceEntry>> {
    let mut stored: HashMap<String, AttendanceEntry> = HashMap::new();
    for model in get_by_date(db, kind, date).await? {
        let entry = entry_from_model(&model)?;
        stored.insert(entry.person_id.clone(), entry);
    }

    Ok(person_ids
        .iter()
        .map(|id| {
            stored
                .remove(id.trim())
                .unwrap_or_else(|| AttendanceEntry::new(id.trim()))
        })
        .collect())
}

/// Counts the rows of each status for one date.
pub async fn count_by_status(
    db: &DatabaseConnection,
    kind: PersonKind,
    date: NaiveDate,
) -> Result<HashMap<AttendanceStatus, usize>> {
    let mut counts = HashMap::new();
    for model in get_by_date(db, kind, date).await? {
        let status: AttendanceStatus = model.status.parse()?;
        *counts.entry(status).or_insert(0) += 1;
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::attendance_status::{NOT_INFORMED, parse_bulk_entries};
    use crate::core::session::Role;
    use crate::test_utils::*;
    use chrono::NaiveTime;

    fn entry(id: &str, status: AttendanceStatus, kind: PersonKind) -> AttendanceEntry {
        AttendanceEntry::new(id).with_status(status, kind).unwrap()
    }

    #[tokio::test]
    async fn test_save_bulk_skips_unset_rows() -> Result<()> {
        let db = setup_test_db().await?;
        let date = test_today();
        let teacher = teacher_session();

        let saved = save_bulk(
            &db,
            &teacher,
            PersonKind::Student,
            date,
            vec![
                entry("s1", AttendanceStatus::Present, PersonKind::Student),
                AttendanceEntry::new("s2"),
                entry("s3", AttendanceStatus::Absent, PersonKind::Student),
            ],
        )
        .await?;
        assert_eq!(saved, 2);

        let rows = get_by_date(&db, PersonKind::Student, date).await?;
        let ids: Vec<&str> = rows.iter().map(|r| r.person_id.as_str()).collect();
        assert_eq!(ids, ["s1", "s3"]);
        assert_eq!(rows[1].comment.as_deref(), Some(NOT_INFORMED));
        assert_eq!(rows[1].marked_by, teacher.user_id);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_bulk_overwrites_same_day() -> Result<()> {
        let db = setup_test_db().await?;
        let date = test_today();
        let admin = admin_session();

        save_bulk(
            &db,
            &admin,
            PersonKind::Teacher,
            date,
            vec![entry("t1", AttendanceStatus::Late, PersonKind::Teacher)],
        )
        .await?;
        let rows = get_by_date(&db, PersonKind::Teacher, date).await?;
        assert_eq!(rows[0].check_in, NaiveTime::from_hms_opt(9, 0, 0));

        save_bulk(
            &db,
            &admin,
            PersonKind::Teacher,
            date,
            vec![entry("t1", AttendanceStatus::Present, PersonKind::Teacher)],
        )
        .await?;
        let rows = get_by_date(&db, PersonKind::Teacher, date).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, "Present");
        assert_eq!(rows[0].check_in, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_bulk_counts_each_person_once() -> Result<()> {
        let db = setup_test_db().await?;
        let date = test_today();

        let entries = parse_bulk_entries("s1:present, s1:absent", PersonKind::Student)?;
        let saved = save_bulk(&db, &teacher_session(), PersonKind::Student, date, entries).await?;
        assert_eq!(saved, 1);

        let rows = get_by_date(&db, PersonKind::Student, date).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, "Absent");
        Ok(())
    }

    #[tokio::test]
    async fn test_save_bulk_normalises_stale_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let date = test_today();

        let stale = AttendanceEntry {
            person_id: " s9 ".to_string(),
            status: AttendanceStatus::Present,
            check_in: NaiveTime::from_hms_opt(9, 30, 0),
            check_out: None,
            comment: Some("Sick Leave".to_string()),
        };
        save_bulk(&db, &teacher_session(), PersonKind::Student, date, vec![stale]).await?;

        let rows = get_for_person(&db, PersonKind::Student, "s9").await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].check_in, None);
        assert_eq!(rows[0].comment, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_bulk_permissions() -> Result<()> {
        let db = setup_test_db().await?;
        let date = test_today();
        let rows = vec![entry("t1", AttendanceStatus::Present, PersonKind::Teacher)];

        let result = save_bulk(&db, &teacher_session(), PersonKind::Teacher, date, rows).await;
        assert!(matches!(result, Err(Error::Unauthorized { .. })));

        let rows = vec![entry("s1", AttendanceStatus::Present, PersonKind::Student)];
        let student = Session::new("s1", Role::Student);
        let result = save_bulk(&db, &student, PersonKind::Student, date, rows).await;
        assert!(matches!(result, Err(Error::Unauthorized { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_save_bulk_rejects_late_students() -> Result<()> {
        let db = setup_test_db().await?;
        let late = AttendanceEntry {
            status: AttendanceStatus::Late,
            ..AttendanceEntry::new("s1")
        };
        let result = save_bulk(
            &db,
            &admin_session(),
            PersonKind::Student,
            test_today(),
            vec![late],
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidAttendance { .. })));
        assert!(get_by_date(&db, PersonKind::Student, test_today()).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_roster_and_counts() -> Result<()> {
        let db = setup_test_db().await?;
        let date = test_today();
        let entries = parse_bulk_entries(
            "s1:present, s2:absent, s3:leave:Family Emergency",
            PersonKind::Student,
        )?;
        save_bulk(&db, &teacher_session(), PersonKind::Student, date, entries).await?;

        let roster = roster_for_date(
            &db,
            PersonKind::Student,
            date,
            &["s3".to_string(), "s4".to_string()],
        )
        .await?;
        assert_eq!(roster[0].status, AttendanceStatus::Leave);
        assert_eq!(roster[0].comment.as_deref(), Some("Family Emergency"));
        assert_eq!(roster[1].status, AttendanceStatus::Unset);

        let counts = count_by_status(&db, PersonKind::Student, date).await?;
        assert_eq!(counts.get(&AttendanceStatus::Present), Some(&1));
        assert_eq!(counts.get(&AttendanceStatus::Absent), Some(&1));
        assert_eq!(counts.get(&AttendanceStatus::Leave), Some(&1));
        assert_eq!(counts.get(&AttendanceStatus::HalfDay), None);

        // Teacher rows for the same date are kept apart
        assert!(get_by_date(&db, PersonKind::Teacher, date).await?.is_empty());
        Ok(())
    }
}
