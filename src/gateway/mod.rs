//! Gateway: the event loop connecting the channel, the store, and the weather provider.
//!
//! Incoming events and dispatch ticks are handled one at a time from a single
//! `select!` loop, so no two units of work overlap.

mod dialog;
mod routing;
mod scheduler;
mod session;


use crate::commands::Reply;
use butler_core::{
    config::SchedulerConfig,
    message::{IncomingMessage, OutgoingMessage},
    traits::{Channel, WeatherProvider},
};
use butler_memory::Store;
use chrono::{NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use session::SessionStore;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{error, info, warn};

/// Added to every tick sleep so the wakeup lands inside the target second.
const TICK_SLACK_MS: u64 = 500;

/// The central gateway.
pub struct Gateway {
    pub(super) channel: Arc<dyn Channel>,
    pub(super) weather: Arc<dyn WeatherProvider>,
    pub(super) store: Store,
    sessions: SessionStore,
    pub(super) tz: Tz,
    pub(super) scheduler_config: SchedulerConfig,
    /// Last calendar minute the dispatch pass ran for.
    pub(super) last_minute: Mutex<Option<NaiveDateTime>>,
}

impl Gateway {
    pub fn new(
        channel: Arc<dyn Channel>,
        weather: Arc<dyn WeatherProvider>,
        store: Store,
        tz: Tz,
        scheduler_config: SchedulerConfig,
    ) -> Self {
        Self {
            channel,
            weather,
            store,
            sessions: SessionStore::default(),
            tz,
            scheduler_config,
            last_minute: Mutex::new(None),
        }
    }

    /// Run the main event loop until Ctrl-C or the channel closes.
    pub async fn run(&self) -> anyhow::Result<()> {
        info!(
            "Butler gateway running | channel: {} | weather: {} | timezone: {} | scheduler: {}",
            self.channel.name(),
            self.weather.name(),
            self.tz.name(),
            if self.scheduler_config.enabled {
                "enabled"
            } else {
                "disabled"
            },
        );

        let mut rx = self
            .channel
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("failed to start channel {}: {e}", self.channel.name()))?;

        let ticking = self.scheduler_config.enabled;
        let sleep = tokio::time::sleep(self.until_next_tick());
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                incoming = rx.recv() => match incoming {
                    Some(incoming) => self.handle(incoming).await,
                    None => {
                        warn!("channel {} closed its stream", self.channel.name());
                        break;
                    }
                },
                () = &mut sleep, if ticking => {
                    self.tick(self.local_now()).await;
                    sleep.as_mut().reset(tokio::time::Instant::now() + self.until_next_tick());
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        if let Err(e) = self.channel.stop().await {
            warn!("failed to stop channel {}: {e}", self.channel.name());
        }
        info!("Butler gateway stopped");
        Ok(())
    }

    /// Handle one incoming event at the current local time.
    pub async fn handle(&self, incoming: IncomingMessage) {
        self.handle_at(incoming, self.local_now()).await;
    }

    pub(super) async fn handle_at(&self, incoming: IncomingMessage, now: NaiveDateTime) {
        if let Err(e) = self
            .store
            .upsert_user(
                &incoming.sender_id,
                incoming.sender_name.as_deref(),
                incoming.sender_username.as_deref(),
            )
            .await
        {
            error!("failed to upsert user {}: {e}", incoming.sender_id);
        }

        if let Some(query) = incoming.callback.clone() {
            self.handle_callback(&incoming, &query, now).await;
        } else if incoming.is_command() {
            self.handle_command(&incoming).await;
        } else {
            self.handle_text(&incoming, now).await;
        }
    }

    /// Send `reply` back to where `incoming` came from, editing `edit` if given.
    pub(super) async fn reply(&self, incoming: &IncomingMessage, reply: Reply, edit: Option<i64>) {
        let target = incoming
            .reply_target
            .clone()
            .unwrap_or_else(|| incoming.sender_id.clone());
        let msg = OutgoingMessage::to(target, reply.text)
            .with_keyboard(reply.keyboard)
            .editing(edit);
        if let Err(e) = self.channel.send(msg).await {
            error!("failed to send reply to {}: {e}", incoming.sender_id);
        }
    }

    /// Wall clock in the configured timezone.
    pub(super) fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local()
    }

    /// Sleep until the next clock-aligned tick boundary.
    fn until_next_tick(&self) -> Duration {
        let interval = self.scheduler_config.poll_interval_secs.clamp(1, 60);
        let now = self.local_now();
        let into_ms = (u64::from(now.second()) % interval) * 1000
            + u64::from(now.nanosecond() / 1_000_000).min(999);
        Duration::from_millis(interval * 1000 - into_ms + TICK_SLACK_MS)
    }
}
