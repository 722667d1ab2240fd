//! Attendance Discord commands - marking and viewing daily attendance.
//!
//! Teachers mark student attendance; admins mark teacher attendance. Every save
//! goes through the bulk path, so a single mark and a whole-class sheet follow
//! the same status rules.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, utils},
        core::{
            attendance as attendance_store,
            attendance_status::{self, AttendanceStatus, PersonKind},
            report,
            session::attendance_roles,
        },
        errors::{Error, Result},
    };

    const HISTORY_LIMIT: usize = 10;

    /// Parent command for attendance.
    #[poise::command(
        slash_command,
        subcommands(
            "attendance_mark",
            "attendance_bulk",
            "attendance_show",
            "attendance_sheet",
            "attendance_summary",
            "attendance_history"
        )
    )]
    pub async fn attendance(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Attendance command. Available subcommands:\n\
            `/attendance mark` - Mark one person\n\
            `/attendance bulk` - Mark several people at once\n\
            `/attendance show` - List a day's attendance\n\
            `/attendance sheet` - Show a day's sheet for given people\n\
            `/attendance summary` - Count a day's attendance by status\n\
            `/attendance history` - Recent attendance for one person";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Marks attendance for one student or teacher.
    ///
    /// `detail` is a check-in time (`HH:MM`) for late arrivals, or a reason for
    /// half days and leave. Absences are always recorded as "Not Informed".
    #[poise::command(slash_command, rename = "mark")]
    pub async fn attendance_mark(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "student or teacher"]
        #[autocomplete = "autocomplete::autocomplete_person_kind"]
        kind: String,
        #[description = "Student or teacher ID"] person_id: String,
        #[description = "Attendance status"]
        #[autocomplete = "autocomplete::autocomplete_attendance_status"]
        status: String,
        #[description = "Check-in time (late) or reason (half day / leave)"]
        #[autocomplete = "autocomplete::autocomplete_attendance_comment"]
        detail: Option<String>,
        #[description = "Date (YYYY-MM-DD), defaults to today"] date: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let session = data.session_for(&ctx.author().id);
        let kind: PersonKind = kind.parse()?;
        let status: AttendanceStatus = status.parse()?;
        let date = utils::parse_date_or(date.as_deref(), utils::today())?;

        let entry = attendance_status::build_entry(&person_id, status, detail.as_deref(), kind)?;
        if entry.status == AttendanceStatus::Unset {
            ctx.say("ℹ️ No status selected, nothing saved.").await?;
            return Ok(());
        }
        attendance_store::save_bulk(&data.database, &session, kind, date, vec![entry]).await?;

        let rows = attendance_store::get_by_date(&data.database, kind, date).await?;
        let saved = rows
            .iter()
            .find(|row| row.person_id == person_id.trim())
            .map_or_else(|| person_id.clone(), utils::format_attendance_row);
        ctx.say(format!("✅ Attendance saved: {saved}")).await?;
        Ok(())
    }

    /// Marks attendance for several people on one date.
    ///
    /// Entries look like `s1:present, s2:absent, s3:half day:Sick Leave`.
    /// Entries without a status are skipped; a repeated ID keeps its last entry.
    #[poise::command(slash_command, rename = "bulk")]
    pub async fn attendance_bulk(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "student or teacher"]
        #[autocomplete = "autocomplete::autocomplete_person_kind"]
        kind: String,
        #[description = "Comma-separated id:status[:detail] entries"] entries: String,
        #[description = "Date (YYYY-MM-DD), defaults to today"] date: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let session = data.session_for(&ctx.author().id);
        let kind: PersonKind = kind.parse()?;
        let date = utils::parse_date_or(date.as_deref(), utils::today())?;

        let parsed = attendance_status::parse_bulk_entries(&entries, kind)?;
        let submitted = parsed.len();
        let saved =
            attendance_store::save_bulk(&data.database, &session, kind, date, parsed).await?;

        let skipped = submitted - saved;
        let mut reply = format!("✅ Saved {saved} {kind} attendance row(s) for {date}.");
        if skipped > 0 {
            reply.push_str(&format!(" Skipped {skipped} unmarked or repeated row(s)."));
        }
        ctx.say(reply).await?;
        Ok(())
    }

    /// Lists the saved attendance for one date.
    #[poise::command(slash_command, rename = "show")]
    pub async fn attendance_show(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "student or teacher"]
        #[autocomplete = "autocomplete::autocomplete_person_kind"]
        kind: String,
        #[description = "Date (YYYY-MM-DD), defaults to today"] date: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;
        let kind: PersonKind = kind.parse()?;
        data.session_for(&ctx.author().id)
            .require(attendance_roles(kind), &format!("view {kind} attendance"))?;
        let date = utils::parse_date_or(date.as_deref(), utils::today())?;

        let rows = attendance_store::get_by_date(db, kind, date).await?;
        if rows.is_empty() {
            ctx.say(format!("📭 No {kind} attendance saved for {date}."))
                .await?;
            return Ok(());
        }

        let lines: Vec<String> = rows.iter().map(utils::format_attendance_row).collect();
        ctx.say(utils::join_limited(
            &format!("🗓️ **{kind} attendance for {date}**"),
            &lines,
        )?)
        .await?;
        Ok(())
    }

    /// Shows the attendance sheet for a list of people on one date.
    ///
    /// People with a saved row show its status; everyone else is listed as
    /// not marked, ready for `/attendance bulk`.
    #[poise::command(slash_command, rename = "sheet")]
    pub async fn attendance_sheet(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "student or teacher"]
        #[autocomplete = "autocomplete::autocomplete_person_kind"]
        kind: String,
        #[description = "Comma-separated student or teacher IDs"] people: String,
        #[description = "Date (YYYY-MM-DD), defaults to today"] date: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;
        let kind: PersonKind = kind.parse()?;
        data.session_for(&ctx.author().id)
            .require(attendance_roles(kind), &format!("view {kind} attendance"))?;
        let date = utils::parse_date_or(date.as_deref(), utils::today())?;

        let person_ids: Vec<String> = people
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        if person_ids.is_empty() {
            ctx.say("❌ List at least one ID.").await?;
            return Ok(());
        }

        let sheet = attendance_store::roster_for_date(db, kind, date, &person_ids).await?;
        let marked = sheet
            .iter()
            .filter(|entry| entry.status != AttendanceStatus::Unset)
            .count();
        let lines: Vec<String> = sheet.iter().map(utils::format_attendance_entry).collect();
        ctx.say(utils::join_limited(
            &format!(
                "📝 **{kind} sheet for {date}** ({marked}/{} marked)",
                sheet.len()
            ),
            &lines,
        )?)
        .await?;
        Ok(())
    }

    /// Counts one date's attendance by status.
    #[poise::command(slash_command, rename = "summary")]
    pub async fn attendance_summary(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "student or teacher"]
        #[autocomplete = "autocomplete::autocomplete_person_kind"]
        kind: String,
        #[description = "Date (YYYY-MM-DD), defaults to today"] date: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;
        let kind: PersonKind = kind.parse()?;
        data.session_for(&ctx.author().id)
            .require(attendance_roles(kind), &format!("view {kind} attendance"))?;
        let date = utils::parse_date_or(date.as_deref(), utils::today())?;

        let summary = report::attendance_summary(db, kind, date).await?;
        ctx.say(format!(
            "```\n{}\n```",
            report::format_attendance_summary(&summary)?
        ))
        .await?;
        Ok(())
    }

    /// Shows the most recent attendance rows for one person.
    #[poise::command(slash_command, rename = "history")]
    pub async fn attendance_history(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "student or teacher"]
        #[autocomplete = "autocomplete::autocomplete_person_kind"]
        kind: String,
        #[description = "Student or teacher ID"] person_id: String,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;
        let kind: PersonKind = kind.parse()?;
        data.session_for(&ctx.author().id)
            .require(attendance_roles(kind), &format!("view {kind} attendance"))?;

        let rows = attendance_store::get_for_person(db, kind, &person_id).await?;
        if rows.is_empty() {
            ctx.say(format!("📭 No attendance saved for {kind} '{person_id}'."))
                .await?;
            return Ok(());
        }

        let lines: Vec<String> = rows
            .iter()
            .take(HISTORY_LIMIT)
            .map(utils::format_attendance_row)
            .collect();
        ctx.say(utils::join_limited(
            &format!("🗓️ **Recent attendance for {person_id}**"),
            &lines,
        )?)
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
