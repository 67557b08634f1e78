use super::Store;
use crate::models::{TaskKind, DEFAULT_WEATHER_TIME};
use chrono::{NaiveDate, NaiveDateTime};

/// Create an in-memory store for testing.
async fn test_store() -> Store {
    Store::open_in_memory().await.unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let store = test_store().await;
    Store::run_migrations(store.pool()).await.unwrap();
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM _migrations")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_unknown_user_gets_default_weather_settings() {
    let store = test_store().await;
    let settings = store.get_weather_settings("nobody").await.unwrap();
    assert!(settings.enabled);
    assert_eq!(settings.time, DEFAULT_WEATHER_TIME);
}

#[tokio::test]
async fn test_upsert_keeps_weather_settings_and_known_name() {
    let store = test_store().await;
    store.upsert_user("u1", Some("Ann"), Some("ann")).await.unwrap();
    assert!(store.set_weather_time("u1", "07:30").await.unwrap());
    assert!(!store.toggle_weather_notifications("u1").await.unwrap());

    store.upsert_user("u1", None, None).await.unwrap();

    let settings = store.get_weather_settings("u1").await.unwrap();
    assert!(!settings.enabled);
    assert_eq!(settings.time, "07:30");

    let (name,): (Option<String>,) =
        sqlx::query_as("SELECT display_name FROM users WHERE user_id = 'u1'")
            .fetch_one(store.pool())
            .await
            .unwrap();
    assert_eq!(name.as_deref(), Some("Ann"));
}

#[tokio::test]
async fn test_set_weather_time_unknown_user() {
    let store = test_store().await;
    assert!(!store.set_weather_time("ghost", "09:00").await.unwrap());
}

#[tokio::test]
async fn test_toggle_twice_restores_original() {
    let store = test_store().await;
    store.upsert_user("u1", Some("Ann"), None).await.unwrap();
    let original = store.get_weather_settings("u1").await.unwrap().enabled;

    let first = store.toggle_weather_notifications("u1").await.unwrap();
    let second = store.toggle_weather_notifications("u1").await.unwrap();

    assert_eq!(first, !original);
    assert_eq!(second, original);
    assert_eq!(
        store.get_weather_settings("u1").await.unwrap().enabled,
        original
    );
}

#[tokio::test]
async fn test_toggle_unknown_user_treated_as_enabled() {
    let store = test_store().await;
    assert!(!store.toggle_weather_notifications("fresh").await.unwrap());
    assert!(!store.get_weather_settings("fresh").await.unwrap().enabled);
}

#[tokio::test]
async fn test_users_for_weather_time_exact_match() {
    let store = test_store().await;
    store.upsert_user("a", Some("A"), None).await.unwrap();
    store.upsert_user("b", Some("B"), None).await.unwrap();
    store.upsert_user("c", Some("C"), None).await.unwrap();
    store.set_weather_time("b", "07:00").await.unwrap();
    store.toggle_weather_notifications("c").await.unwrap();

    let due = store.users_for_weather_time("08:30").await.unwrap();
    let ids: Vec<&str> = due.iter().map(|r| r.user_id.as_str()).collect();
    assert_eq!(ids, vec!["a"]);
    assert_eq!(due[0].display_name.as_deref(), Some("A"));

    assert!(store.users_for_weather_time("8:30").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_daily_task_round_trip_and_soft_delete() {
    let store = test_store().await;
    store.upsert_user("u1", Some("Ann"), None).await.unwrap();
    let late = store.create_daily_task("u1", "Stretch", "21:00").await.unwrap();
    let early = store.create_daily_task("u1", "Pills", "08:00").await.unwrap();

    let tasks = store.list_daily_tasks("u1").await.unwrap();
    let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Pills", "Stretch"]);
    assert_eq!(tasks[0].time, "08:00");

    assert!(store.deactivate_daily_task("u1", early).await.unwrap());
    assert!(!store.deactivate_daily_task("u1", early).await.unwrap());

    let tasks = store.list_daily_tasks("u1").await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, late);
    assert!(store.get_daily_task("u1", early).await.unwrap().is_none());

    // Still stored, just inactive.
    let (active,): (bool,) = sqlx::query_as("SELECT is_active FROM daily_tasks WHERE id = ?")
        .bind(early)
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert!(!active);
}

#[tokio::test]
async fn test_soft_delete_scoped_to_owner() {
    let store = test_store().await;
    store.upsert_user("u1", None, None).await.unwrap();
    store.upsert_user("u2", None, None).await.unwrap();
    let id = store.create_daily_task("u1", "Mine", "10:00").await.unwrap();
    let one = store
        .create_one_time_task("u1", "Call", at(2030, 1, 1, 9, 0, 0))
        .await
        .unwrap();

    assert!(!store.deactivate_daily_task("u2", id).await.unwrap());
    assert!(!store.deactivate_one_time_task("u2", one).await.unwrap());
    assert!(store.get_daily_task("u2", id).await.unwrap().is_none());
    assert!(store.get_daily_task("u1", id).await.unwrap().is_some());
    assert_eq!(store.list_one_time_tasks("u1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_one_time_tasks_ordering_and_completion() {
    let store = test_store().await;
    store.upsert_user("u1", None, None).await.unwrap();
    let later = store
        .create_one_time_task("u1", "Dentist", at(2030, 5, 2, 10, 0, 0))
        .await
        .unwrap();
    let sooner = store
        .create_one_time_task("u1", "Taxes", at(2030, 4, 30, 18, 0, 0))
        .await
        .unwrap();

    let tasks = store.list_one_time_tasks("u1").await.unwrap();
    assert_eq!(
        tasks.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![sooner, later]
    );
    assert_eq!(tasks[0].scheduled_at, at(2030, 4, 30, 18, 0, 0));

    store.complete_one_time_task(sooner).await.unwrap();
    store.complete_one_time_task(sooner).await.unwrap();

    let tasks = store.list_one_time_tasks("u1").await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, later);
    assert!(store.get_one_time_task("u1", sooner).await.unwrap().is_none());
}

#[tokio::test]
async fn test_daily_tasks_at_joins_owner_name() {
    let store = test_store().await;
    store.upsert_user("u1", Some("Ann"), None).await.unwrap();
    store.upsert_user("u2", None, None).await.unwrap();
    store.create_daily_task("u1", "Pills", "09:15").await.unwrap();
    let gone = store.create_daily_task("u2", "Walk", "09:15").await.unwrap();
    store.create_daily_task("u2", "Read", "09:16").await.unwrap();
    store.deactivate_daily_task("u2", gone).await.unwrap();

    let due = store.daily_tasks_at("09:15").await.unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].kind, TaskKind::Daily);
    assert_eq!(due[0].name, "Pills");
    assert_eq!(due[0].display_name.as_deref(), Some("Ann"));
}

#[tokio::test]
async fn test_one_time_tasks_at_ignores_seconds() {
    let store = test_store().await;
    store.upsert_user("u1", Some("Ann"), None).await.unwrap();
    let id = store
        .create_one_time_task("u1", "Call mom", at(2030, 3, 1, 14, 0, 0))
        .await
        .unwrap();
    let done = store
        .create_one_time_task("u1", "Done already", at(2030, 3, 1, 14, 0, 0))
        .await
        .unwrap();
    store.complete_one_time_task(done).await.unwrap();

    let due = store
        .one_time_tasks_at(at(2030, 3, 1, 14, 0, 42))
        .await
        .unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].task_id, id);
    assert_eq!(due[0].kind, TaskKind::OneTime);

    assert!(store
        .one_time_tasks_at(at(2030, 3, 1, 14, 1, 0))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_reminder_lifecycle() {
    let store = test_store().await;
    store.upsert_user("u1", None, None).await.unwrap();
    let task = store.create_daily_task("u1", "Pills", "08:00").await.unwrap();
    let sent = at(2030, 1, 1, 8, 0, 0);

    let id = store
        .create_reminder("u1", TaskKind::Daily, task, sent, Some(at(2030, 1, 1, 9, 0, 0)))
        .await
        .unwrap();

    let rec = store.get_reminder(id).await.unwrap().unwrap();
    assert_eq!(rec.attempt_count, 1);
    assert_eq!(rec.kind, TaskKind::Daily);
    assert_eq!(rec.reminder_time, sent);
    assert!(!rec.completed);

    assert!(store
        .due_reminders(at(2030, 1, 1, 8, 59, 59))
        .await
        .unwrap()
        .is_empty());
    let due = store.due_reminders(at(2030, 1, 1, 9, 0, 0)).await.unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, id);

    store
        .reschedule_reminder(id, Some(at(2030, 1, 1, 9, 30, 0)))
        .await
        .unwrap();
    let rec = store.get_reminder(id).await.unwrap().unwrap();
    assert_eq!(rec.attempt_count, 2);
    assert_eq!(rec.next_reminder, Some(at(2030, 1, 1, 9, 30, 0)));

    store.complete_reminder(id).await.unwrap();
    let rec = store.get_reminder(id).await.unwrap().unwrap();
    assert!(rec.completed);
    assert_eq!(rec.next_reminder, None);
    assert!(store
        .due_reminders(at(2031, 1, 1, 0, 0, 0))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_reschedule_without_next_finalizes() {
    let store = test_store().await;
    store.upsert_user("u1", None, None).await.unwrap();
    let id = store
        .create_reminder(
            "u1",
            TaskKind::OneTime,
            7,
            at(2030, 1, 1, 8, 0, 0),
            Some(at(2030, 1, 1, 9, 0, 0)),
        )
        .await
        .unwrap();

    store.reschedule_reminder(id, None).await.unwrap();

    let rec = store.get_reminder(id).await.unwrap().unwrap();
    assert!(rec.completed);
    assert_eq!(rec.next_reminder, None);
    assert_eq!(rec.attempt_count, 2);
}

#[tokio::test]
async fn test_reminder_task_liveness() {
    let store = test_store().await;
    store.upsert_user("u1", None, None).await.unwrap();
    let daily = store.create_daily_task("u1", "Pills", "08:00").await.unwrap();
    let once = store
        .create_one_time_task("u1", "Call", at(2030, 1, 1, 9, 0, 0))
        .await
        .unwrap();

    assert_eq!(
        store.reminder_task(TaskKind::Daily, daily).await.unwrap(),
        Some(("Pills".to_string(), true))
    );
    store.deactivate_daily_task("u1", daily).await.unwrap();
    assert_eq!(
        store.reminder_task(TaskKind::Daily, daily).await.unwrap(),
        Some(("Pills".to_string(), false))
    );

    store.complete_one_time_task(once).await.unwrap();
    assert_eq!(
        store.reminder_task(TaskKind::OneTime, once).await.unwrap(),
        Some(("Call".to_string(), false))
    );
    assert_eq!(store.reminder_task(TaskKind::OneTime, 999).await.unwrap(), None);
}

#[tokio::test]
async fn test_task_for_unknown_user_is_rejected() {
    let store = test_store().await;
    let err = store.create_daily_task("ghost", "x", "08:00").await;
    assert!(matches!(
        err,
        Err(butler_core::error::ButlerError::Storage(_))
    ));
}

#[tokio::test]
async fn test_db_size_counts_whole_pages() {
    let store = test_store().await;
    let size = store.db_size().await.unwrap();
    let (page_size,): (i64,) = sqlx::query_as("PRAGMA page_size")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert!(size > 0);
    assert_eq!(size % page_size as u64, 0);
}
