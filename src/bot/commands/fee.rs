//! Fee Discord commands - `fee` management subcommands and `fee_report`.
//!
//! These commands create fee records, record term payments, and look records up.
//! Each command builds a session for its author and leaves authorisation to the
//! core operations; rejected actions surface through the framework error hook.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, utils},
        core::{
            fee::{self as fees, FeeFilter, NewFeeRecord, PaymentDetails},
            report,
            session::FEE_VIEWERS,
            term_status::{PaymentMethod, TermStatus},
        },
        errors::{Error, Result},
    };

    /// Parent command for fee records.
    ///
    /// Groups subcommands for creating, paying, listing, and deleting the
    /// three-term fee records kept for each student.
    #[poise::command(
        slash_command,
        subcommands(
            "fee_add",
            "fee_pay",
            "fee_unpay",
            "fee_show",
            "fee_student",
            "fee_list",
            "fee_delete"
        )
    )]
    pub async fn fee(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Fee management command. Available subcommands:\n\
            `/fee add` - Create a fee record\n\
            `/fee pay` - Mark a term paid\n\
            `/fee unpay` - Revert a term payment\n\
            `/fee show` - Show one record\n\
            `/fee student` - Show a student's records\n\
            `/fee list` - List records\n\
            `/fee delete` - Delete a record";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Creates a fee record for a student, split into three terms.
    ///
    /// The amount is split evenly unless `term_amounts` is given; the third
    /// term takes any remainder. Due dates default to the configured term dates.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, rename = "add")]
    pub async fn fee_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student ID (e.g. admission number)"] student_id: String,
        #[description = "Student's full name"] student_name: String,
        #[description = "Class"]
        #[autocomplete = "autocomplete::autocomplete_class"]
        class: String,
        #[description = "Total fee amount"]
        #[min = 0]
        amount: i64,
        #[description = "Section (e.g. A)"] section: Option<String>,
        #[description = "Term 1 due date (YYYY-MM-DD)"] term1_due: Option<String>,
        #[description = "Term 2 due date (YYYY-MM-DD)"] term2_due: Option<String>,
        #[description = "Term 3 due date (YYYY-MM-DD)"] term3_due: Option<String>,
        #[description = "Custom term amounts, e.g. 6000,4000,2000"] term_amounts: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let session = data.session_for(&ctx.author().id);
        let today = utils::today();

        let mut overrides = [None; 3];
        for (slot, raw) in overrides.iter_mut().zip([term1_due, term2_due, term3_due]) {
            *slot = raw.as_deref().map(utils::parse_date).transpose()?;
        }
        let due_dates = data.config.fees.due_dates_with(today, overrides)?;
        let term_amounts = term_amounts
            .as_deref()
            .map(utils::parse_term_amounts)
            .transpose()?;

        let new_record = NewFeeRecord {
            student_id,
            student_name,
            class,
            section: section.unwrap_or_default(),
            amount,
            term_amounts,
            due_dates,
        };
        let view = fees::create_fee_record(&data.database, &session, new_record, today).await?;

        ctx.say(format!(
            "✅ Fee record created.\n\n{}",
            utils::format_fee_view(&view)?
        ))
        .await?;
        Ok(())
    }

    /// Marks one term of a fee record as paid.
    ///
    /// The payment date defaults to today and the method to Cash.
    #[poise::command(slash_command, rename = "pay")]
    pub async fn fee_pay(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Fee record ID"] id: i64,
        #[description = "Term number"]
        #[min = 1]
        #[max = 3]
        term: i32,
        #[description = "Payment date (YYYY-MM-DD), defaults to today"] date: Option<String>,
        #[description = "Payment method"]
        #[autocomplete = "autocomplete::autocomplete_payment_method"]
        method: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let session = data.session_for(&ctx.author().id);

        let details = PaymentDetails {
            payment_date: date.as_deref().map(utils::parse_date).transpose()?,
            payment_method: method
                .as_deref()
                .map(str::parse::<PaymentMethod>)
                .transpose()?,
        };
        let view = fees::mark_term_paid(
            &data.database,
            &session,
            id,
            term,
            details,
            utils::today(),
        )
        .await?;

        ctx.say(format!(
            "✅ Term {term} marked paid.\n\n{}",
            utils::format_fee_view(&view)?
        ))
        .await?;
        Ok(())
    }

    /// Reverts a term to unpaid and clears its payment details.
    ///
    /// Terms paid with a recorded date are locked; only a superadmin can revert them.
    #[poise::command(slash_command, rename = "unpay")]
    pub async fn fee_unpay(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Fee record ID"] id: i64,
        #[description = "Term number"]
        #[min = 1]
        #[max = 3]
        term: i32,
    ) -> Result<()> {
        let data = ctx.data();
        let session = data.session_for(&ctx.author().id);

        let view =
            fees::mark_term_unpaid(&data.database, &session, id, term, utils::today()).await?;

        ctx.say(format!(
            "↩️ Term {term} reverted to unpaid.\n\n{}",
            utils::format_fee_view(&view)?
        ))
        .await?;
        Ok(())
    }

    /// Shows one fee record with the status of each term.
    #[poise::command(slash_command, rename = "show")]
    pub async fn fee_show(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Fee record ID"] id: i64,
    ) -> Result<()> {
        let data = ctx.data();
        data.session_for(&ctx.author().id)
            .require(FEE_VIEWERS, "view fee records")?;

        match fees::get_fee_record(&data.database, id, utils::today()).await? {
            Some(view) => ctx.say(utils::format_fee_view(&view)?).await?,
            None => ctx.say(format!("❌ Fee record #{id} not found.")).await?,
        };
        Ok(())
    }

    /// Shows all fee records for one student.
    #[poise::command(slash_command, rename = "student")]
    pub async fn fee_student(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student ID"] student_id: String,
    ) -> Result<()> {
        let data = ctx.data();
        data.session_for(&ctx.author().id)
            .require(FEE_VIEWERS, "view fee records")?;

        let views =
            fees::get_fee_records_for_student(&data.database, &student_id, utils::today()).await?;

        if views.is_empty() {
            ctx.say(format!("📭 No fee records for student '{student_id}'."))
                .await?;
            return Ok(());
        }

        let blocks = views
            .iter()
            .map(utils::format_fee_view)
            .collect::<Result<Vec<_>>>()?;
        ctx.say(utils::join_limited(
            &format!("🎓 **Fee records for {student_id}**"),
            &blocks,
        )?)
        .await?;
        Ok(())
    }

    /// Lists fee records, optionally filtered by class, section, and status.
    #[poise::command(slash_command, rename = "list")]
    pub async fn fee_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Class"]
        #[autocomplete = "autocomplete::autocomplete_class"]
        class: Option<String>,
        #[description = "Section"] section: Option<String>,
        #[description = "Overall status"]
        #[autocomplete = "autocomplete::autocomplete_fee_status"]
        status: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        data.session_for(&ctx.author().id)
            .require(FEE_VIEWERS, "list fee records")?;

        let filter = FeeFilter {
            class,
            section,
            status: status
                .as_deref()
                .map(str::parse::<TermStatus>)
                .transpose()?,
        };
        let views = fees::list_fee_records(&data.database, &filter, utils::today()).await?;

        if views.is_empty() {
            ctx.say("📭 No fee records match.").await?;
            return Ok(());
        }

        let lines: Vec<String> = views.iter().map(utils::format_fee_line).collect();
        ctx.say(utils::join_limited(
            &format!("📚 **Fee records** ({})", views.len()),
            &lines,
        )?)
        .await?;
        Ok(())
    }

    /// Deletes a fee record and all of its terms.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn fee_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Fee record ID"] id: i64,
    ) -> Result<()> {
        let data = ctx.data();
        let session = data.session_for(&ctx.author().id);

        fees::delete_fee_record(&data.database, &session, id).await?;
        ctx.say(format!("🗑️ Fee record #{id} deleted.")).await?;
        Ok(())
    }

    /// Shows fee collection totals, optionally for one class.
    #[poise::command(slash_command, prefix_command)]
    pub async fn fee_report(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Class"]
        #[autocomplete = "autocomplete::autocomplete_class"]
        class: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        data.session_for(&ctx.author().id)
            .require(FEE_VIEWERS, "view fee reports")?;

        let title = class.as_ref().map_or_else(
            || format!("📊 **{} fee report**", data.config.institute.name),
            |class| format!("📊 **{} fee report - Class {class}**", data.config.institute.name),
        );
        let filter = FeeFilter {
            class,
            ..FeeFilter::default()
        };
        let summary = report::fee_summary(&data.database, &filter, utils::today()).await?;

        ctx.say(format!(
            "{title}\n```\n{}\n```",
            report::format_fee_summary(&summary)?
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
