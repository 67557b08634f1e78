//! Reminder escalation history.

use super::Store;
use crate::models::{format_timestamp, parse_timestamp, ReminderRecord, TaskKind};
use butler_core::error::ButlerError;
use chrono::NaiveDateTime;
use std::str::FromStr;

type ReminderRow = (i64, String, String, i64, String, Option<String>, i64, bool);

const REMINDER_COLUMNS: &str = "id, user_id, task_type, task_id, reminder_time, next_reminder, \
                                reminder_count, is_completed";

impl Store {
    /// Record the first notification of a task. Attempt count starts at 1.
    pub async fn create_reminder(
        &self,
        user_id: &str,
        kind: TaskKind,
        task_id: i64,
        reminder_time: NaiveDateTime,
        next_reminder: Option<NaiveDateTime>,
    ) -> Result<i64, ButlerError> {
        let result = sqlx::query(
            "INSERT INTO reminder_history \
             (user_id, task_type, task_id, reminder_time, next_reminder, reminder_count) \
             VALUES (?, ?, ?, ?, ?, 1)",
        )
        .bind(user_id)
        .bind(kind.as_str())
        .bind(task_id)
        .bind(format_timestamp(reminder_time))
        .bind(next_reminder.map(format_timestamp))
        .execute(&self.pool)
        .await
        .map_err(|e| ButlerError::Storage(format!("create reminder failed: {e}")))?;
        Ok(result.last_insert_rowid())
    }

    /// Increment the attempt count and set the next retry time.
    ///
    /// `None` means retries are exhausted; the row is finalized in the same statement.
    pub async fn reschedule_reminder(
        &self,
        id: i64,
        next_reminder: Option<NaiveDateTime>,
    ) -> Result<(), ButlerError> {
        let next = next_reminder.map(format_timestamp);
        sqlx::query(
            "UPDATE reminder_history SET \
                 reminder_count = reminder_count + 1, \
                 next_reminder = ?, \
                 is_completed = CASE WHEN ? IS NULL THEN 1 ELSE is_completed END \
             WHERE id = ?",
        )
        .bind(&next)
        .bind(&next)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| ButlerError::Storage(format!("reschedule reminder failed: {e}")))?;
        Ok(())
    }

    /// Finalize a reminder: completed, no next time.
    pub async fn complete_reminder(&self, id: i64) -> Result<(), ButlerError> {
        sqlx::query(
            "UPDATE reminder_history SET is_completed = 1, next_reminder = NULL WHERE id = ?",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| ButlerError::Storage(format!("complete reminder failed: {e}")))?;
        Ok(())
    }

    /// Open reminders whose next time is at or before `now`.
    pub async fn due_reminders(
        &self,
        now: NaiveDateTime,
    ) -> Result<Vec<ReminderRecord>, ButlerError> {
        let sql = format!(
            "SELECT {REMINDER_COLUMNS} FROM reminder_history \
             WHERE is_completed = 0 AND next_reminder IS NOT NULL AND next_reminder <= ? \
             ORDER BY next_reminder ASC, id ASC"
        );
        let rows: Vec<ReminderRow> = sqlx::query_as(&sql)
            .bind(format_timestamp(now))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ButlerError::Storage(format!("due reminders failed: {e}")))?;

        rows.into_iter().map(reminder_from_row).collect()
    }

    /// Look up one reminder by id.
    pub async fn get_reminder(&self, id: i64) -> Result<Option<ReminderRecord>, ButlerError> {
        let sql = format!("SELECT {REMINDER_COLUMNS} FROM reminder_history WHERE id = ?");
        let row: Option<ReminderRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ButlerError::Storage(format!("get reminder failed: {e}")))?;

        row.map(reminder_from_row).transpose()
    }
}

fn reminder_from_row(row: ReminderRow) -> Result<ReminderRecord, ButlerError> {
    let (id, user_id, kind, task_id, reminder_time, next, attempt_count, completed) = row;
    Ok(ReminderRecord {
        id,
        user_id,
        kind: TaskKind::from_str(&kind)?,
        task_id,
        reminder_time: parse_timestamp(&reminder_time)?,
        next_reminder: next.as_deref().map(parse_timestamp).transpose()?,
        attempt_count,
        completed,
    })
}
