mod callbacks;
mod commands;
mod gateway;
mod keyboards;
mod reminders;
mod texts;

use butler_channels::telegram::TelegramChannel;
use butler_core::{
    config::{self, shellexpand},
    traits::{Channel, WeatherProvider},
};
use butler_memory::Store;
use butler_weather::WeatherApiProvider;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "butler",
    version,
    about = "Butler: daily weather, daily tasks, and reminders that don't give up"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot.
    Start,
    /// Check configuration and credentials.
    Status,
    /// Fetch the current weather once and print it.
    Weather,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;

    match cli.command {
        Commands::Start => {
            let _log_guard = init_logging(&cfg.butler.log_level, Some(&cfg.butler.data_dir))?;
            let tz = cfg.butler.tz()?;

            let tg = match cfg.channel.telegram {
                Some(ref tg) if tg.enabled => tg.clone(),
                _ => anyhow::bail!(
                    "Telegram is not enabled. Add a [channel.telegram] section to {}.",
                    cli.config
                ),
            };
            if tg.bot_token.is_empty() {
                anyhow::bail!(
                    "Telegram is enabled but bot_token is empty. \
                     Set it in {} or the {} env var.",
                    cli.config,
                    config::TELEGRAM_TOKEN_ENV
                );
            }
            if cfg.weather.api_key.is_empty() {
                tracing::warn!(
                    "weather api_key is empty; weather messages will report a fetch failure"
                );
            }

            let channel: Arc<dyn Channel> = Arc::new(TelegramChannel::new(tg));
            let weather: Arc<dyn WeatherProvider> =
                Arc::new(WeatherApiProvider::from_config(&cfg.weather));
            let store = Store::new(&cfg.memory).await?;

            println!("{} starting...", cfg.butler.name);
            let gw = gateway::Gateway::new(channel, weather, store, tz, cfg.scheduler.clone());
            gw.run().await?;
        }
        Commands::Status => {
            println!("{} status\n", cfg.butler.name);
            println!("Config:   {}", cli.config);
            println!("Timezone: {}", cfg.butler.timezone);
            let db_path = shellexpand(&cfg.memory.db_path);
            let db_size = if std::path::Path::new(&db_path).exists() {
                match Store::new(&cfg.memory).await {
                    Ok(store) => store
                        .db_size()
                        .await
                        .map(format_bytes)
                        .unwrap_or_else(|_| "unknown size".to_string()),
                    Err(e) => format!("unreadable: {e}"),
                }
            } else {
                "not created yet".to_string()
            };
            println!("Database: {db_path} ({db_size})");
            println!(
                "Scheduler: {} (every {}s)",
                if cfg.scheduler.enabled {
                    "enabled"
                } else {
                    "disabled"
                },
                cfg.scheduler.poll_interval_secs
            );
            println!();

            match cfg.channel.telegram {
                Some(ref tg) => println!(
                    "  telegram: {}",
                    if tg.enabled && !tg.bot_token.is_empty() {
                        "configured"
                    } else if tg.enabled {
                        "enabled but missing bot_token"
                    } else {
                        "disabled"
                    }
                ),
                None => println!("  telegram: not configured"),
            }
            println!(
                "  weather:  {} ({})",
                if cfg.weather.api_key.is_empty() {
                    "missing api_key"
                } else {
                    "configured"
                },
                cfg.weather.location
            );
        }
        Commands::Weather => {
            let _log_guard = init_logging(&cfg.butler.log_level, None)?;
            let provider = WeatherApiProvider::from_config(&cfg.weather);
            let report = provider.current().await?;
            println!("{}", butler_weather::weather_message(&report));
        }
    }

    Ok(())
}

/// Human-readable byte count.
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Install the tracing subscriber: stdout, plus a daily log file under `data_dir/logs`.
///
/// `RUST_LOG` wins over the configured level. The returned guard flushes the file
/// writer on drop.
fn init_logging(level: &str, data_dir: Option<&str>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let Some(data_dir) = data_dir else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
        return Ok(None);
    };

    let log_dir = PathBuf::from(shellexpand(data_dir)).join("logs");
    std::fs::create_dir_all(&log_dir)?;
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, "butler.log"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();
    Ok(Some(guard))
}
