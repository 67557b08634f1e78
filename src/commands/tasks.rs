//! Task screens: overview, per-kind lists, detail view, and two-phase deletion.

use super::Reply;
use crate::{keyboards, texts};
use butler_core::error::ButlerError;
use butler_memory::{Store, TaskKind};

/// `/my_tasks`: every active task, grouped by kind.
pub(crate) async fn overview(store: &Store, user_id: &str) -> Result<Reply, ButlerError> {
    let daily = store.list_daily_tasks(user_id).await?;
    let one_time = store.list_one_time_tasks(user_id).await?;

    let mut out = String::from("📋 *Your tasks:*\n\n");

    if !daily.is_empty() {
        out.push_str("📅 *Daily tasks:*\n");
        for task in &daily {
            out.push_str(&format!("• {} - {}\n", task.name, task.time));
        }
        out.push('\n');
    }

    if !one_time.is_empty() {
        out.push_str("⏰ *One-time reminders:*\n");
        for task in &one_time {
            out.push_str(&format!(
                "• {} - {}\n",
                task.name,
                texts::long_datetime(task.scheduled_at)
            ));
        }
        out.push('\n');
    }

    if daily.is_empty() && one_time.is_empty() {
        out.push_str(texts::NO_TASKS);
    }

    Ok(Reply::with(
        out,
        keyboards::tasks_menu(!daily.is_empty(), !one_time.is_empty()),
    ))
}

/// One button per task of `kind`.
pub(crate) async fn manage_list(
    store: &Store,
    user_id: &str,
    kind: TaskKind,
) -> Result<Reply, ButlerError> {
    let reply = match kind {
        TaskKind::Daily => {
            let tasks = store.list_daily_tasks(user_id).await?;
            if tasks.is_empty() {
                Reply::with(texts::NO_DAILY_TASKS, keyboards::back_to_menu())
            } else {
                Reply::with(
                    "📅 *Daily tasks*\n\nPick a task to view or delete:",
                    keyboards::daily_tasks_list(&tasks),
                )
            }
        }
        TaskKind::OneTime => {
            let tasks = store.list_one_time_tasks(user_id).await?;
            if tasks.is_empty() {
                Reply::with(texts::NO_ONE_TIME_TASKS, keyboards::back_to_menu())
            } else {
                Reply::with(
                    "⏰ *Reminders*\n\nPick a reminder to view or delete:",
                    keyboards::one_time_tasks_list(&tasks),
                )
            }
        }
    };
    Ok(reply)
}

/// Detail card for one task.
pub(crate) async fn view(
    store: &Store,
    user_id: &str,
    kind: TaskKind,
    id: i64,
) -> Result<Reply, ButlerError> {
    let text = match kind {
        TaskKind::Daily => match store.get_daily_task(user_id, id).await? {
            Some(task) => format!(
                "📅 *Daily task*\n\n📝 *Name:* {}\n⏰ *Time:* {}\n📅 *Created:* {} UTC",
                task.name, task.time, task.created_at
            ),
            None => texts::DAILY_NOT_FOUND.to_string(),
        },
        TaskKind::OneTime => match store.get_one_time_task(user_id, id).await? {
            Some(task) => format!(
                "⏰ *One-time reminder*\n\n📝 *Name:* {}\n📅 *When:* {}\n📅 *Created:* {} UTC",
                task.name,
                texts::long_datetime(task.scheduled_at),
                task.created_at
            ),
            None => texts::ONE_TIME_NOT_FOUND.to_string(),
        },
    };
    Ok(Reply::with(text, keyboards::task_detail(kind, id)))
}

/// First phase of deletion: ask for confirmation. Nothing is changed yet.
pub(crate) async fn delete_prompt(
    store: &Store,
    user_id: &str,
    kind: TaskKind,
    id: i64,
) -> Result<Reply, ButlerError> {
    let (name, what) = match kind {
        TaskKind::Daily => (
            store
                .get_daily_task(user_id, id)
                .await?
                .map(|t| t.name)
                .unwrap_or_else(|| "Unknown task".to_string()),
            "daily task",
        ),
        TaskKind::OneTime => (
            store
                .get_one_time_task(user_id, id)
                .await?
                .map(|t| t.name)
                .unwrap_or_else(|| "Unknown reminder".to_string()),
            "one-time reminder",
        ),
    };
    Ok(Reply::with(
        format!("🗑️ *Delete*\n\nAre you sure you want to delete this {what}?\n\n📝 *{name}*"),
        keyboards::confirm_delete(kind, id),
    ))
}

/// Second phase: soft-delete the task if the user owns it.
pub(crate) async fn confirm_delete(
    store: &Store,
    user_id: &str,
    kind: TaskKind,
    id: i64,
) -> Result<Reply, ButlerError> {
    let (deleted, done) = match kind {
        TaskKind::Daily => (
            store.deactivate_daily_task(user_id, id).await?,
            "✅ Daily task deleted!",
        ),
        TaskKind::OneTime => (
            store.deactivate_one_time_task(user_id, id).await?,
            "✅ One-time reminder deleted!",
        ),
    };
    let text = if deleted {
        done
    } else if kind == TaskKind::Daily {
        texts::DAILY_NOT_FOUND
    } else {
        texts::ONE_TIME_NOT_FOUND
    };
    Ok(Reply::with(text, keyboards::back_to_menu()))
}
