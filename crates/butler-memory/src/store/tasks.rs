//! Daily and one-time task CRUD, soft-delete, and due lookups.

use super::Store;
use crate::models::{
    format_timestamp, parse_timestamp, DailyTask, DueTask, OneTimeTask, TaskKind,
};
use butler_core::error::ButlerError;
use chrono::NaiveDateTime;

impl Store {
    /// Create a recurring task at `time` (`HH:MM`). Returns the new id.
    pub async fn create_daily_task(
        &self,
        user_id: &str,
        name: &str,
        time: &str,
    ) -> Result<i64, ButlerError> {
        let result =
            sqlx::query("INSERT INTO daily_tasks (user_id, task_name, time) VALUES (?, ?, ?)")
                .bind(user_id)
                .bind(name)
                .bind(time)
                .execute(&self.pool)
                .await
                .map_err(|e| ButlerError::Storage(format!("create daily task failed: {e}")))?;
        Ok(result.last_insert_rowid())
    }

    /// Create a one-off task. Returns the new id.
    pub async fn create_one_time_task(
        &self,
        user_id: &str,
        name: &str,
        scheduled_at: NaiveDateTime,
    ) -> Result<i64, ButlerError> {
        let result = sqlx::query(
            "INSERT INTO one_time_tasks (user_id, task_name, scheduled_datetime) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(name)
        .bind(format_timestamp(scheduled_at))
        .execute(&self.pool)
        .await
        .map_err(|e| ButlerError::Storage(format!("create one-time task failed: {e}")))?;
        Ok(result.last_insert_rowid())
    }

    /// Active daily tasks for a user, earliest time of day first.
    pub async fn list_daily_tasks(&self, user_id: &str) -> Result<Vec<DailyTask>, ButlerError> {
        let rows: Vec<(i64, String, String, String, String)> = sqlx::query_as(
            "SELECT id, user_id, task_name, time, created_at FROM daily_tasks \
             WHERE user_id = ? AND is_active = 1 \
             ORDER BY time ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ButlerError::Storage(format!("list daily tasks failed: {e}")))?;

        Ok(rows.into_iter().map(daily_from_row).collect())
    }

    /// Active, not completed one-time tasks for a user, soonest first.
    pub async fn list_one_time_tasks(
        &self,
        user_id: &str,
    ) -> Result<Vec<OneTimeTask>, ButlerError> {
        let rows: Vec<(i64, String, String, String, String)> = sqlx::query_as(
            "SELECT id, user_id, task_name, scheduled_datetime, created_at FROM one_time_tasks \
             WHERE user_id = ? AND is_active = 1 AND is_completed = 0 \
             ORDER BY scheduled_datetime ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ButlerError::Storage(format!("list one-time tasks failed: {e}")))?;

        rows.into_iter().map(one_time_from_row).collect()
    }

    /// A single active daily task owned by `user_id`.
    pub async fn get_daily_task(
        &self,
        user_id: &str,
        id: i64,
    ) -> Result<Option<DailyTask>, ButlerError> {
        let row: Option<(i64, String, String, String, String)> = sqlx::query_as(
            "SELECT id, user_id, task_name, time, created_at FROM daily_tasks \
             WHERE id = ? AND user_id = ? AND is_active = 1",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ButlerError::Storage(format!("get daily task failed: {e}")))?;

        Ok(row.map(daily_from_row))
    }

    /// A single active, not completed one-time task owned by `user_id`.
    pub async fn get_one_time_task(
        &self,
        user_id: &str,
        id: i64,
    ) -> Result<Option<OneTimeTask>, ButlerError> {
        let row: Option<(i64, String, String, String, String)> = sqlx::query_as(
            "SELECT id, user_id, task_name, scheduled_datetime, created_at FROM one_time_tasks \
             WHERE id = ? AND user_id = ? AND is_active = 1 AND is_completed = 0",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ButlerError::Storage(format!("get one-time task failed: {e}")))?;

        row.map(one_time_from_row).transpose()
    }

    /// Soft-delete a daily task. Returns `false` if nothing matched.
    pub async fn deactivate_daily_task(&self, user_id: &str, id: i64) -> Result<bool, ButlerError> {
        let result = sqlx::query(
            "UPDATE daily_tasks SET is_active = 0 WHERE id = ? AND user_id = ? AND is_active = 1",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| ButlerError::Storage(format!("delete daily task failed: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete a one-time task. Returns `false` if nothing matched.
    pub async fn deactivate_one_time_task(
        &self,
        user_id: &str,
        id: i64,
    ) -> Result<bool, ButlerError> {
        let result = sqlx::query(
            "UPDATE one_time_tasks SET is_active = 0 \
             WHERE id = ? AND user_id = ? AND is_active = 1",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| ButlerError::Storage(format!("delete one-time task failed: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Active daily tasks whose time equals `time` (`HH:MM`), with owner names.
    pub async fn daily_tasks_at(&self, time: &str) -> Result<Vec<DueTask>, ButlerError> {
        let rows: Vec<(i64, String, String, Option<String>)> = sqlx::query_as(
            "SELECT t.id, t.user_id, t.task_name, u.display_name \
             FROM daily_tasks t JOIN users u ON u.user_id = t.user_id \
             WHERE t.time = ? AND t.is_active = 1 \
             ORDER BY t.id",
        )
        .bind(time)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ButlerError::Storage(format!("due daily tasks failed: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(task_id, user_id, name, display_name)| DueTask {
                kind: TaskKind::Daily,
                task_id,
                user_id,
                name,
                display_name,
            })
            .collect())
    }

    /// Live one-time tasks scheduled within the same minute as `minute` (seconds ignored).
    pub async fn one_time_tasks_at(
        &self,
        minute: NaiveDateTime,
    ) -> Result<Vec<DueTask>, ButlerError> {
        let key = minute.format("%Y-%m-%d %H:%M").to_string();
        let rows: Vec<(i64, String, String, Option<String>)> = sqlx::query_as(
            "SELECT t.id, t.user_id, t.task_name, u.display_name \
             FROM one_time_tasks t JOIN users u ON u.user_id = t.user_id \
             WHERE strftime('%Y-%m-%d %H:%M', t.scheduled_datetime) = ? \
               AND t.is_active = 1 AND t.is_completed = 0 \
             ORDER BY t.id",
        )
        .bind(&key)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ButlerError::Storage(format!("due one-time tasks failed: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(task_id, user_id, name, display_name)| DueTask {
                kind: TaskKind::OneTime,
                task_id,
                user_id,
                name,
                display_name,
            })
            .collect())
    }

    /// Mark a one-time task completed. Idempotent.
    pub async fn complete_one_time_task(&self, id: i64) -> Result<(), ButlerError> {
        sqlx::query("UPDATE one_time_tasks SET is_completed = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| ButlerError::Storage(format!("complete one-time task failed: {e}")))?;
        Ok(())
    }

    /// Name of the task a reminder points at and whether it is still live.
    ///
    /// `None` if the row does not exist at all.
    pub async fn reminder_task(
        &self,
        kind: TaskKind,
        task_id: i64,
    ) -> Result<Option<(String, bool)>, ButlerError> {
        let sql = match kind {
            TaskKind::Daily => "SELECT task_name, is_active FROM daily_tasks WHERE id = ?",
            TaskKind::OneTime => {
                "SELECT task_name, is_active AND NOT is_completed FROM one_time_tasks WHERE id = ?"
            }
        };
        let row: Option<(String, bool)> = sqlx::query_as(sql)
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ButlerError::Storage(format!("reminder task lookup failed: {e}")))?;
        Ok(row)
    }
}

fn daily_from_row(row: (i64, String, String, String, String)) -> DailyTask {
    let (id, user_id, name, time, created_at) = row;
    DailyTask {
        id,
        user_id,
        name,
        time,
        created_at,
    }
}

fn one_time_from_row(
    row: (i64, String, String, String, String),
) -> Result<OneTimeTask, ButlerError> {
    let (id, user_id, name, scheduled, created_at) = row;
    Ok(OneTimeTask {
        id,
        user_id,
        name,
        scheduled_at: parse_timestamp(&scheduled)?,
        created_at,
    })
}
