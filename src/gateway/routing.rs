//! Command and button-press routing.

use super::dialog::DialogState;
use super::Gateway;
use crate::callbacks::{Callback, MenuAction};
use crate::commands::{self, settings, tasks, Command, CommandContext, Reply};
use crate::reminders::{next_retry_time, MAX_REMINDERS};
use crate::texts;
use butler_core::{
    error::ButlerError,
    message::{CallbackQuery, IncomingMessage},
};
use butler_memory::{ReminderRecord, TaskKind};
use chrono::NaiveDateTime;
use tracing::{error, info, warn};

impl Gateway {
    /// Slash commands. Unknown commands get the generic reply and leave any dialog alone.
    pub(super) async fn handle_command(&self, incoming: &IncomingMessage) {
        let Some(cmd) = Command::parse(&incoming.text) else {
            info!(
                "unrecognized command from {}: {}",
                incoming.sender_id,
                incoming.text.trim()
            );
            self.reply(incoming, Reply::text(texts::UNRECOGNIZED), None)
                .await;
            return;
        };

        let user_id = incoming.sender_id.as_str();
        match cmd {
            Command::Start => self.sessions.clear(user_id),
            Command::AddDaily => self.sessions.set(user_id, DialogState::DailyName),
            Command::AddReminder => self.sessions.set(user_id, DialogState::OneTimeName),
            _ => {}
        }

        let ctx = CommandContext {
            store: &self.store,
            weather: self.weather.as_ref(),
            sender_id: user_id,
            sender_name: incoming.sender_name.as_deref().unwrap_or("there"),
        };
        let reply = commands::handle(cmd, &ctx).await.unwrap_or_else(|e| {
            error!("command {cmd:?} failed for {user_id}: {e}");
            commands::storage_failure()
        });
        self.reply(incoming, reply, None).await;
    }

    /// Button presses: acknowledge, decode, act, then edit the message that carried the button.
    pub(super) async fn handle_callback(
        &self,
        incoming: &IncomingMessage,
        query: &CallbackQuery,
        now: NaiveDateTime,
    ) {
        if let Err(e) = self.channel.answer_callback(&query.id).await {
            warn!("failed to answer callback {}: {e}", query.id);
        }

        let reply = match Callback::parse(&query.data) {
            Some(callback) => self
                .route_callback(&callback, incoming, now)
                .await
                .unwrap_or_else(|e| {
                    error!(
                        "callback '{}' failed for {}: {e}",
                        query.data, incoming.sender_id
                    );
                    commands::storage_failure()
                }),
            None => {
                warn!(
                    "rejected malformed callback '{}' from {}",
                    query.data, incoming.sender_id
                );
                Reply::text(texts::UNKNOWN_COMMAND)
            }
        };

        self.reply(incoming, reply, query.message_id).await;
    }

    async fn route_callback(
        &self,
        callback: &Callback,
        incoming: &IncomingMessage,
        now: NaiveDateTime,
    ) -> Result<Reply, ButlerError> {
        let user_id = incoming.sender_id.as_str();
        let store = &self.store;

        match callback {
            Callback::Action(action) => match action {
                MenuAction::MainMenu => Ok(commands::main_menu()),
                MenuAction::Weather => Ok(commands::weather(self.weather.as_ref()).await),
                MenuAction::MyTasks => tasks::overview(store, user_id).await,
                MenuAction::AddDaily => {
                    self.sessions.set(user_id, DialogState::DailyName);
                    Ok(commands::add_daily_prompt())
                }
                MenuAction::AddReminder => {
                    self.sessions.set(user_id, DialogState::OneTimeName);
                    Ok(commands::add_reminder_prompt())
                }
                MenuAction::Help => Ok(commands::help()),
                MenuAction::Settings => settings::show(store, user_id, None).await,
            },
            Callback::Manage(kind) => tasks::manage_list(store, user_id, *kind).await,
            Callback::View(kind, id) => tasks::view(store, user_id, *kind, *id).await,
            Callback::Delete(kind, id) => tasks::delete_prompt(store, user_id, *kind, *id).await,
            Callback::ConfirmDelete(kind, id) => {
                let reply = tasks::confirm_delete(store, user_id, *kind, *id).await?;
                info!("{user_id} deleted {kind} task {id}");
                Ok(reply)
            }
            Callback::ToggleWeather => settings::toggle_weather(store, user_id).await,
            Callback::SetWeatherTime => Ok(settings::time_menu()),
            Callback::SetTime(time) => settings::set_time(store, user_id, time).await,
            Callback::Complete {
                kind,
                task_id,
                reminder_id,
            } => {
                self.complete_reminder(user_id, *kind, *task_id, *reminder_id)
                    .await
            }
            Callback::Snooze {
                kind,
                task_id,
                reminder_id,
            } => {
                self.snooze_reminder(user_id, *kind, *task_id, *reminder_id, now)
                    .await
            }
        }
    }

    /// "Done": close the reminder, and a one-time task with it.
    async fn complete_reminder(
        &self,
        user_id: &str,
        kind: TaskKind,
        task_id: i64,
        reminder_id: i64,
    ) -> Result<Reply, ButlerError> {
        let Some(record) = self
            .owned_reminder(user_id, kind, task_id, reminder_id)
            .await?
        else {
            return Ok(Reply::text(texts::UNKNOWN_COMMAND));
        };

        self.store.complete_reminder(record.id).await?;
        if kind == TaskKind::OneTime {
            self.store.complete_one_time_task(task_id).await?;
        }

        let name = self
            .store
            .reminder_task(kind, task_id)
            .await?
            .map(|(name, _)| name)
            .unwrap_or_else(|| "Task".to_string());
        info!("{user_id} completed reminder {reminder_id} ({kind} task {task_id})");
        Ok(Reply::text(texts::task_completed(&name)))
    }

    /// "Remind me later": push the next retry an hour out, within the attempt cap.
    async fn snooze_reminder(
        &self,
        user_id: &str,
        kind: TaskKind,
        task_id: i64,
        reminder_id: i64,
        now: NaiveDateTime,
    ) -> Result<Reply, ButlerError> {
        let Some(record) = self
            .owned_reminder(user_id, kind, task_id, reminder_id)
            .await?
        else {
            return Ok(Reply::text(texts::UNKNOWN_COMMAND));
        };

        if record.completed {
            return Ok(Reply::text(texts::REMINDER_CLOSED));
        }
        if record.attempt_count + 1 >= MAX_REMINDERS {
            return Ok(Reply::text(texts::SNOOZE_EXHAUSTED));
        }
        let Some(until) = next_retry_time(1, now) else {
            return Ok(Reply::text(texts::SNOOZE_EXHAUSTED));
        };

        self.store.reschedule_reminder(record.id, Some(until)).await?;
        info!("{user_id} snoozed reminder {reminder_id} until {until}");
        Ok(Reply::text(texts::snoozed(until)))
    }

    /// The reminder, only if it belongs to `user_id` and matches the pressed button.
    async fn owned_reminder(
        &self,
        user_id: &str,
        kind: TaskKind,
        task_id: i64,
        reminder_id: i64,
    ) -> Result<Option<ReminderRecord>, ButlerError> {
        let record = self.store.get_reminder(reminder_id).await?;
        Ok(record.filter(|r| r.user_id == user_id && r.kind == kind && r.task_id == task_id))
    }
}
