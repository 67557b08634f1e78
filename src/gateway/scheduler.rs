//! Periodic dispatch: weather notifications, task notifications, and reminder retries.

use super::Gateway;
use crate::keyboards;
use crate::reminders::{format_message, next_retry_time, MAX_REMINDERS};
use crate::texts;
use butler_core::message::OutgoingMessage;
use butler_memory::{DueTask, ReminderRecord};
use chrono::{Duration, NaiveDateTime, Timelike};
use tracing::{debug, error, info, warn};

impl Gateway {
    /// One dispatch pass for the calendar minute containing `now`.
    ///
    /// A minute is processed at most once; a second tick within it is a no-op.
    /// Minutes skipped since the previous pass (a handler that ran long) are
    /// replayed first, up to `MAX_CATCH_UP_MINUTES`.
    pub(super) async fn tick(&self, now: NaiveDateTime) {
        let minute = truncate_to_minute(now);
        let pending = {
            let mut last = self.last_minute.lock().unwrap_or_else(|e| e.into_inner());
            let pending = minutes_to_process(*last, minute);
            if pending.is_empty() {
                debug!("scheduler: minute {minute} already processed");
                return;
            }
            *last = Some(minute);
            pending
        };
        if pending.len() > 1 {
            warn!(
                "scheduler: catching up {} minute(s) ending at {minute}",
                pending.len() - 1
            );
        }

        for due in &pending {
            self.check_weather(*due).await;
            self.check_daily_tasks(*due).await;
            self.check_one_time_tasks(*due).await;
        }
        self.check_retries(now, minute).await;
    }

    async fn check_weather(&self, minute: NaiveDateTime) {
        let time = minute.format("%H:%M").to_string();
        let recipients = match self.store.users_for_weather_time(&time).await {
            Ok(r) => r,
            Err(e) => {
                error!("scheduler: weather recipients lookup failed: {e}");
                return;
            }
        };
        if recipients.is_empty() {
            return;
        }

        let body = match self.weather.current().await {
            Ok(report) => butler_weather::weather_message(&report),
            Err(e) => {
                warn!("scheduler: weather fetch via {} failed: {e}", self.weather.name());
                butler_weather::FETCH_FAILED.to_string()
            }
        };
        let text = format!("{}\n\n{body}", texts::greeting(minute.hour()));

        for recipient in &recipients {
            match self
                .channel
                .send(OutgoingMessage::to(&recipient.user_id, text.as_str()))
                .await
            {
                Ok(()) => info!("scheduler: weather sent to {}", recipient.user_id),
                Err(e) => error!(
                    "scheduler: weather send to {} failed: {e}",
                    recipient.user_id
                ),
            }
        }
    }

    async fn check_daily_tasks(&self, minute: NaiveDateTime) {
        let time = minute.format("%H:%M").to_string();
        match self.store.daily_tasks_at(&time).await {
            Ok(due) => {
                for task in &due {
                    self.notify_task(task, minute).await;
                }
            }
            Err(e) => error!("scheduler: daily task lookup failed: {e}"),
        }
    }

    async fn check_one_time_tasks(&self, minute: NaiveDateTime) {
        match self.store.one_time_tasks_at(minute).await {
            Ok(due) => {
                for task in &due {
                    self.notify_task(task, minute).await;
                }
            }
            Err(e) => error!("scheduler: one-time task lookup failed: {e}"),
        }
    }

    /// First notification of a task: open a reminder record, then send with buttons.
    async fn notify_task(&self, task: &DueTask, minute: NaiveDateTime) {
        let next = next_retry_time(1, minute);
        let reminder_id = match self
            .store
            .create_reminder(&task.user_id, task.kind, task.task_id, minute, next)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                error!(
                    "scheduler: could not open reminder for {} task {}: {e}",
                    task.kind, task.task_id
                );
                return;
            }
        };

        let msg = OutgoingMessage::to(&task.user_id, format_message(&task.name, 1))
            .with_keyboard(Some(keyboards::reminder(task.kind, task.task_id, reminder_id)));
        match self.channel.send(msg).await {
            Ok(()) => info!(
                "scheduler: {} task {} sent to {} (reminder {reminder_id})",
                task.kind, task.task_id, task.user_id
            ),
            Err(e) => error!(
                "scheduler: {} task {} send to {} failed: {e}",
                task.kind, task.task_id, task.user_id
            ),
        }
    }

    async fn check_retries(&self, now: NaiveDateTime, minute: NaiveDateTime) {
        match self.store.due_reminders(now).await {
            Ok(due) => {
                for record in due {
                    self.retry(record, minute).await;
                }
            }
            Err(e) => error!("scheduler: due reminders lookup failed: {e}"),
        }
    }

    /// Re-send an unacknowledged reminder and schedule the one after it.
    async fn retry(&self, record: ReminderRecord, minute: NaiveDateTime) {
        if record.attempt_count >= MAX_REMINDERS {
            self.finalize(&record, "attempt cap reached").await;
            return;
        }

        let name = match self.store.reminder_task(record.kind, record.task_id).await {
            Ok(Some((name, true))) => name,
            Ok(_) => {
                self.finalize(&record, "task no longer active").await;
                return;
            }
            Err(e) => {
                error!("scheduler: task lookup for reminder {} failed: {e}", record.id);
                return;
            }
        };

        let text = format_message(&name, record.attempt_count);
        let next = next_retry_time(record.attempt_count + 1, minute);
        if let Err(e) = self.store.reschedule_reminder(record.id, next).await {
            error!("scheduler: reschedule of reminder {} failed: {e}", record.id);
            return;
        }

        let msg = OutgoingMessage::to(&record.user_id, text).with_keyboard(Some(
            keyboards::reminder(record.kind, record.task_id, record.id),
        ));
        match self.channel.send(msg).await {
            Ok(()) => info!(
                "scheduler: reminder {} re-sent to {} (attempt {})",
                record.id, record.user_id, record.attempt_count
            ),
            Err(e) => error!(
                "scheduler: reminder {} send to {} failed: {e}",
                record.id, record.user_id
            ),
        }
        if next.is_none() {
            info!("scheduler: reminder {} exhausted its retries", record.id);
        }
    }

    async fn finalize(&self, record: &ReminderRecord, reason: &str) {
        match self.store.complete_reminder(record.id).await {
            Ok(()) => info!("scheduler: reminder {} closed: {reason}", record.id),
            Err(e) => error!("scheduler: closing reminder {} failed: {e}", record.id),
        }
    }
}

/// Longest run of missed minutes replayed by a single tick.
const MAX_CATCH_UP_MINUTES: i64 = 15;

/// Minutes a tick at `minute` must dispatch, oldest first.
///
/// Empty when `minute` was already handled. A clock that moved backwards
/// dispatches just `minute`.
fn minutes_to_process(last: Option<NaiveDateTime>, minute: NaiveDateTime) -> Vec<NaiveDateTime> {
    let Some(last) = last else {
        return vec![minute];
    };
    if minute == last {
        return Vec::new();
    }
    if minute < last {
        return vec![minute];
    }
    let missed = (minute - last).num_minutes();
    if missed > MAX_CATCH_UP_MINUTES {
        warn!(
            "scheduler: {} missed minute(s) before {minute} dropped",
            missed - MAX_CATCH_UP_MINUTES
        );
    }
    (0..missed.min(MAX_CATCH_UP_MINUTES))
        .rev()
        .map(|back| minute - Duration::minutes(back))
        .collect()
}

/// Drop seconds and sub-seconds.
fn truncate_to_minute(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}
