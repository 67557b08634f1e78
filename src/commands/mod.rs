//! Bot commands, and the menu screens they share with inline buttons.

pub(crate) mod settings;
pub(crate) mod tasks;


use crate::{keyboards, texts};
use butler_core::{error::ButlerError, message::Keyboard, traits::WeatherProvider};
use butler_memory::Store;
use tracing::warn;

/// Text plus optional buttons, before it is addressed to a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

/// Grouped context for command execution.
pub struct CommandContext<'a> {
    pub store: &'a Store,
    pub weather: &'a dyn WeatherProvider,
    pub sender_id: &'a str,
    pub sender_name: &'a str,
}

/// Known bot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Weather,
    AddDaily,
    AddReminder,
    MyTasks,
    Settings,
}

impl Command {
    /// Parse a command from message text. Returns `None` for unknown `/` prefixes.
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        // Strip @botname suffix (e.g. "/help@butler_bot" → "/help").
        let cmd = first.split('@').next().unwrap_or(first);
        match cmd {
            "/start" => Some(Self::Start),
            "/help" => Some(Self::Help),
            "/weather" => Some(Self::Weather),
            "/add_daily" => Some(Self::AddDaily),
            "/add_reminder" => Some(Self::AddReminder),
            "/my_tasks" | "/tasks" => Some(Self::MyTasks),
            "/settings" => Some(Self::Settings),
            _ => None,
        }
    }
}

/// Handle a command and return the reply.
pub async fn handle(cmd: Command, ctx: &CommandContext<'_>) -> Result<Reply, ButlerError> {
    match cmd {
        Command::Start => Ok(welcome(ctx.sender_name)),
        Command::Help => Ok(help()),
        Command::Weather => Ok(weather(ctx.weather).await),
        Command::AddDaily => Ok(add_daily_prompt()),
        Command::AddReminder => Ok(add_reminder_prompt()),
        Command::MyTasks => tasks::overview(ctx.store, ctx.sender_id).await,
        Command::Settings => settings::show(ctx.store, ctx.sender_id, None).await,
    }
}

pub fn welcome(first_name: &str) -> Reply {
    Reply::with(texts::welcome(first_name), keyboards::main_menu())
}

pub fn main_menu() -> Reply {
    Reply::with(texts::MAIN_MENU, keyboards::main_menu())
}

pub fn help() -> Reply {
    Reply::with(texts::HELP, keyboards::back_to_menu())
}

pub fn add_daily_prompt() -> Reply {
    Reply::text(texts::ADD_DAILY_PROMPT)
}

pub fn add_reminder_prompt() -> Reply {
    Reply::text(texts::ADD_REMINDER_PROMPT)
}

/// Current weather with clothing advice; a failure text when the provider errors.
pub async fn weather(provider: &dyn WeatherProvider) -> Reply {
    let text = match provider.current().await {
        Ok(report) => butler_weather::weather_message(&report),
        Err(e) => {
            warn!("weather fetch via {} failed: {e}", provider.name());
            butler_weather::FETCH_FAILED.to_string()
        }
    };
    Reply::with(text, keyboards::back_to_menu())
}

/// Shown when a storage call fails during an interactive request.
pub fn storage_failure() -> Reply {
    Reply::with(texts::STORAGE_FAILURE, keyboards::back_to_menu())
}
