//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for SimsBuddy, including all
//! slash commands, autocomplete handlers, and bot context management. Core
//! operations return structured errors; the framework error hook here decides
//! how each one is shown to the user.

/// Discord command implementations (fees, attendance, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;
/// Parsing and rendering helpers shared by commands
pub mod utils;

use crate::{
    config::{institute::Config, roles::RoleDirectory},
    core::session::Session,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info};

/// Shared data available to all bot commands.
/// This structure holds the database connection, institute settings, and the
/// role directory used to build each command's session.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Institute settings from config.toml
    pub config: Arc<Config>,
    /// Discord user ID to role mapping
    pub roles: RoleDirectory,
}

impl BotData {
    /// Creates a new `BotData` instance.
    #[must_use]
    pub const fn new(database: DatabaseConnection, config: Arc<Config>, roles: RoleDirectory) -> Self {
        Self {
            database,
            config,
            roles,
        }
    }

    /// Session for the author of a command.
    #[must_use]
    pub fn session_for(&self, user_id: &serenity::UserId) -> Session {
        self.roles.session_for(&user_id.to_string())
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            let reply = if error.is_user_facing() {
                tracing::debug!("Command `{}` rejected: {}", ctx.command().name, error);
                format!("❌ {error}")
            } else {
                error!("Error in command `{}`: {:?}", ctx.command().name, error);
                "❌ Something went wrong. Please try again later.".to_string()
            };
            if let Err(e) = ctx.say(reply).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Starts the Discord client and blocks until it stops.
pub async fn run_bot(
    token: String,
    config: Arc<Config>,
    roles: RoleDirectory,
    database: DatabaseConnection,
) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::whoami(),
                commands::fee(),
                commands::fee_report(),
                commands::attendance(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(database, config, roles))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;
