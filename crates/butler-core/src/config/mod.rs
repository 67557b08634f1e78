mod channels;
mod defaults;

#[cfg(test)]
mod tests;

pub use channels::*;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::ButlerError;
use defaults::*;

/// Environment variable that supplies or overrides the Telegram bot token.
pub const TELEGRAM_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
/// Environment variable that supplies or overrides the weather API key.
pub const WEATHER_TOKEN_ENV: &str = "WEATHER_API_TOKEN";

/// Top-level Butler configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub butler: ButlerConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButlerConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// IANA timezone used for every wall-clock decision (e.g. "Europe/Moscow").
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for ButlerConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            timezone: default_timezone(),
        }
    }
}

impl ButlerConfig {
    /// Parse the configured timezone.
    pub fn tz(&self) -> Result<Tz, ButlerError> {
        Tz::from_str(&self.timezone).map_err(|_| {
            ButlerError::Config(format!(
                "invalid timezone '{}': use an IANA name like 'Europe/Moscow'",
                self.timezone
            ))
        })
    }
}

/// Weather provider config (WeatherAPI.com).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// `lat,lon` or any location query the API accepts.
    #[serde(default = "default_weather_location")]
    pub location: String,
    /// Language for condition text.
    #[serde(default = "default_weather_lang")]
    pub lang: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_weather_base_url(),
            location: default_weather_location(),
            lang: default_weather_lang(),
        }
    }
}

/// Memory config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Scheduler configuration -- weather notifications, task reminders, retries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_secs: default_poll_interval(),
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Fill credentials from the environment. A non-empty variable wins over the file.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = lookup(TELEGRAM_TOKEN_ENV).filter(|v| !v.trim().is_empty()) {
        config
            .channel
            .telegram
            .get_or_insert_with(TelegramConfig::default)
            .bot_token = token.trim().to_string();
    }
    if let Some(key) = lookup(WEATHER_TOKEN_ENV).filter(|v| !v.trim().is_empty()) {
        config.weather.api_key = key.trim().to_string();
    }
}

/// Load configuration from a TOML file, then apply environment overrides.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, ButlerError> {
    let mut config = parse_file(Path::new(path))?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config.butler.tz()?;
    Ok(config)
}

fn parse_file(path: &Path) -> Result<Config, ButlerError> {
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ButlerError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    toml::from_str(&content).map_err(|e| ButlerError::Config(format!("failed to parse config: {e}")))
}
