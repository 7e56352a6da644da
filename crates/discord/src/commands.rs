use serde::Serialize;
use thiserror::Error;

use modebot_db::StorageError;

use crate::{components::InteractionResponse, settings::BotSettings, views};

pub const COMMAND_GROUP: &str = "bot";

const CHAT_INPUT_COMMAND: u8 = 1;
const SUB_COMMAND_OPTION: u8 = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlashCommandPayload {
    pub command: String,
    pub subcommand: Option<String>,
    pub user_id: String,
    pub channel_id: String,
    pub guild_id: Option<String>,
    pub request_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BotCommand {
    Info,
    Config,
    Unknown { name: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("unsupported slash command: /{0}")]
    UnsupportedCommand(String),
    #[error("slash command /{0} was invoked without a subcommand")]
    MissingSubcommand(String),
}

#[derive(Debug, Error)]
pub enum CommandRouteError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub fn parse_bot_command(payload: &SlashCommandPayload) -> Result<BotCommand, CommandParseError> {
    if payload.command != COMMAND_GROUP {
        return Err(CommandParseError::UnsupportedCommand(payload.command.clone()));
    }

    let subcommand = payload
        .subcommand
        .as_deref()
        .ok_or_else(|| CommandParseError::MissingSubcommand(payload.command.clone()))?;

    Ok(match subcommand {
        "info" => BotCommand::Info,
        "config" => BotCommand::Config,
        other => BotCommand::Unknown { name: other.to_owned() },
    })
}

/// Renders the view for a `/bot` subcommand. Commands never write settings.
pub struct CommandRouter {
    settings: BotSettings,
}

impl CommandRouter {
    pub fn new(settings: BotSettings) -> Self {
        Self { settings }
    }

    pub async fn route(
        &self,
        command: BotCommand,
        payload: &SlashCommandPayload,
    ) -> Result<InteractionResponse, CommandRouteError> {
        let view = match command {
            BotCommand::Info => views::info_view(&self.settings.current_mode().await?),
            BotCommand::Config => views::config_view(&self.settings.current_mode().await?),
            BotCommand::Unknown { name } => views::error_view(
                &format!("Unsupported command `/{COMMAND_GROUP} {name}`. Try `/{COMMAND_GROUP} info`."),
                &payload.request_id,
            ),
        };

        Ok(InteractionResponse::ephemeral(view))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ApplicationCommand {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: u8,
    pub options: Vec<CommandOption>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommandOption {
    #[serde(rename = "type")]
    pub kind: u8,
    pub name: String,
    pub description: String,
}

impl CommandOption {
    fn subcommand(name: &str, description: &str) -> Self {
        Self {
            kind: SUB_COMMAND_OPTION,
            name: name.to_owned(),
            description: description.to_owned(),
        }
    }
}

/// The `/bot` command group as registered with the platform.
pub fn command_definitions() -> Vec<ApplicationCommand> {
    vec![ApplicationCommand {
        name: COMMAND_GROUP.to_owned(),
        description: "Bot commands".to_owned(),
        kind: CHAT_INPUT_COMMAND,
        options: vec![
            CommandOption::subcommand("info", "Show information about the bot"),
            CommandOption::subcommand("config", "Open the bot configuration"),
        ],
    }]
}
