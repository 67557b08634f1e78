//! Row types returned by the store.

use butler_core::error::ButlerError;
use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;

/// Weather time assigned to users who never picked one.
pub const DEFAULT_WEATHER_TIME: &str = "08:30";

/// On-disk format of every stored local timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Which task table a reminder refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Daily,
    OneTime,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::OneTime => "one_time",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = ButlerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "one_time" => Ok(Self::OneTime),
            other => Err(ButlerError::Storage(format!("unknown task kind '{other}'"))),
        }
    }
}

/// Per-user weather notification preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherSettings {
    pub enabled: bool,
    /// `HH:MM`, 24h.
    pub time: String,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            time: DEFAULT_WEATHER_TIME.to_string(),
        }
    }
}

/// A user due for a weather notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRecipient {
    pub user_id: String,
    pub display_name: Option<String>,
}

/// An active recurring task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTask {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    /// `HH:MM`, 24h.
    pub time: String,
    pub created_at: String,
}

/// An active, not yet completed one-off task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneTimeTask {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub scheduled_at: NaiveDateTime,
    pub created_at: String,
}

/// A task whose notification time is the current minute, joined with its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueTask {
    pub kind: TaskKind,
    pub task_id: i64,
    pub user_id: String,
    pub name: String,
    pub display_name: Option<String>,
}

/// One escalation record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRecord {
    pub id: i64,
    pub user_id: String,
    pub kind: TaskKind,
    pub task_id: i64,
    pub reminder_time: NaiveDateTime,
    /// `None` means no further retry is scheduled.
    pub next_reminder: Option<NaiveDateTime>,
    pub attempt_count: i64,
    pub completed: bool,
}

/// Format a local timestamp for storage.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored local timestamp.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, ButlerError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .map_err(|e| ButlerError::Storage(format!("bad stored timestamp '{raw}': {e}")))
}
