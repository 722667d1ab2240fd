//! General Discord commands - ping, help, and whoami.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Shows the role the bot has assigned to you.
    #[poise::command(slash_command, prefix_command)]
    pub async fn whoami(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = ctx.data().session_for(&ctx.author().id);
        ctx.say(format!(
            "👤 You are signed in to **{}** as **{}**.",
            ctx.data().config.institute.name,
            session.role
        ))
        .await?;
        Ok(())
    }

    /// Displays help information about available commands.
    ///
    /// This command provides users with information about all available bot commands
    /// and their usage, helping them understand the bot's capabilities.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**SimsBuddy Help**\n\
        Here is a summary of all available commands.\n\n\
        **Fee Commands** (admins)\n\
        • `/fee add <student_id> <name> <class> <amount> [section] [due dates] [term_amounts]` - Creates a fee record split into three terms.\n\
        • `/fee pay <id> <term> [date] [method]` - Marks a term paid (defaults: today, Cash).\n\
        • `/fee unpay <id> <term>` - Reverts a term to unpaid (paid terms are locked to superadmins).\n\
        • `/fee delete <id>` - Deletes a fee record.\n\
        • `/fee list [class] [section] [status]` - Lists fee records.\n\
        • `/fee_report [class]` - Shows collection totals.\n\n\
        **Lookup Commands** (admins)\n\
        • `/fee show <id>` - Shows one fee record.\n\
        • `/fee student <student_id>` - Shows a student's fee records.\n\n\
        **Attendance Commands** (teachers for students, admins for teachers)\n\
        • `/attendance mark <kind> <id> <status> [detail] [date]` - Marks one person.\n\
        • `/attendance bulk <kind> <entries> [date]` - Marks many, e.g. `s1:present,s2:absent,s3:leave:Sick Leave`.\n\
        • `/attendance show <kind> [date]` - Lists a day's attendance.\n\
        • `/attendance sheet <kind> <ids> [date]` - Shows who is marked and who is not.\n\
        • `/attendance summary <kind> [date]` - Counts per status.\n\
        • `/attendance history <kind> <id>` - Recent attendance for one person.\n\n\
        **Utility Commands**\n\
        • `/whoami` - Shows your role.\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
