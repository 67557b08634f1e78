//! Inline keyboard layouts.

use crate::callbacks::{Callback, MenuAction, WEATHER_TIME_CHOICES};
use crate::texts::short_datetime;
use butler_core::message::{Button, Keyboard};
use butler_memory::{DailyTask, OneTimeTask, TaskKind, WeatherSettings};

fn button(label: impl Into<String>, callback: Callback) -> Button {
    Button::new(label, callback.to_string())
}

fn home_row() -> Vec<Button> {
    vec![button("🏠 Main menu", Callback::Action(MenuAction::MainMenu))]
}

pub fn main_menu() -> Keyboard {
    Keyboard::new(vec![
        vec![
            button("🌤️ Weather", Callback::Action(MenuAction::Weather)),
            button("📋 My tasks", Callback::Action(MenuAction::MyTasks)),
        ],
        vec![button("➕ Daily task", Callback::Action(MenuAction::AddDaily))],
        vec![button(
            "⏰ One-time reminder",
            Callback::Action(MenuAction::AddReminder),
        )],
        vec![
            button("❓ Help", Callback::Action(MenuAction::Help)),
            button("⚙️ Settings", Callback::Action(MenuAction::Settings)),
        ],
    ])
}

pub fn back_to_menu() -> Keyboard {
    Keyboard::new(vec![home_row()])
}

/// Task overview: manage buttons per non-empty kind, add buttons when there is nothing.
pub fn tasks_menu(has_daily: bool, has_one_time: bool) -> Keyboard {
    let mut rows = Vec::new();
    if has_daily {
        rows.push(vec![button(
            "📅 Manage daily tasks",
            Callback::Manage(TaskKind::Daily),
        )]);
    }
    if has_one_time {
        rows.push(vec![button(
            "⏰ Manage reminders",
            Callback::Manage(TaskKind::OneTime),
        )]);
    }
    if !has_daily && !has_one_time {
        rows.push(vec![button(
            "➕ Daily task",
            Callback::Action(MenuAction::AddDaily),
        )]);
        rows.push(vec![button(
            "⏰ One-time reminder",
            Callback::Action(MenuAction::AddReminder),
        )]);
    }
    rows.push(home_row());
    Keyboard::new(rows)
}

pub fn daily_tasks_list(tasks: &[DailyTask]) -> Keyboard {
    let mut rows: Vec<Vec<Button>> = tasks
        .iter()
        .map(|t| {
            vec![button(
                format!("📝 {} ({})", truncate(&t.name, 20, 17), t.time),
                Callback::View(TaskKind::Daily, t.id),
            )]
        })
        .collect();
    rows.push(vec![button(
        "➕ Add another",
        Callback::Action(MenuAction::AddDaily),
    )]);
    rows.push(vec![button(
        "◀️ Back to tasks",
        Callback::Action(MenuAction::MyTasks),
    )]);
    Keyboard::new(rows)
}

pub fn one_time_tasks_list(tasks: &[OneTimeTask]) -> Keyboard {
    let mut rows: Vec<Vec<Button>> = tasks
        .iter()
        .map(|t| {
            vec![button(
                format!(
                    "⏰ {} ({})",
                    truncate(&t.name, 15, 12),
                    short_datetime(t.scheduled_at)
                ),
                Callback::View(TaskKind::OneTime, t.id),
            )]
        })
        .collect();
    rows.push(vec![button(
        "➕ Add another",
        Callback::Action(MenuAction::AddReminder),
    )]);
    rows.push(vec![button(
        "◀️ Back to tasks",
        Callback::Action(MenuAction::MyTasks),
    )]);
    Keyboard::new(rows)
}

pub fn task_detail(kind: TaskKind, id: i64) -> Keyboard {
    Keyboard::new(vec![
        vec![button("🗑️ Delete", Callback::Delete(kind, id))],
        vec![button("◀️ Back to list", Callback::Manage(kind))],
    ])
}

pub fn confirm_delete(kind: TaskKind, id: i64) -> Keyboard {
    Keyboard::new(vec![vec![
        button("✅ Yes, delete", Callback::ConfirmDelete(kind, id)),
        button("❌ Cancel", Callback::View(kind, id)),
    ]])
}

pub fn settings_menu(settings: &WeatherSettings) -> Keyboard {
    let status = if settings.enabled {
        "🔔 On"
    } else {
        "🔕 Off"
    };
    Keyboard::new(vec![
        vec![button(
            format!("🌤️ Weather: {status}"),
            Callback::ToggleWeather,
        )],
        vec![button(
            format!("⏰ Weather time: {}", settings.time),
            Callback::SetWeatherTime,
        )],
        home_row(),
    ])
}

/// Weather time choices, two per row.
pub fn weather_time_menu() -> Keyboard {
    let mut rows: Vec<Vec<Button>> = WEATHER_TIME_CHOICES
        .chunks(2)
        .map(|pair| {
            pair.iter()
                .map(|t| button(*t, Callback::SetTime((*t).to_string())))
                .collect()
        })
        .collect();
    rows.push(vec![button(
        "◀️ Back to settings",
        Callback::Action(MenuAction::Settings),
    )]);
    Keyboard::new(rows)
}

/// "Done" / "Remind me later" under a reminder message.
pub fn reminder(kind: TaskKind, task_id: i64, reminder_id: i64) -> Keyboard {
    Keyboard::new(vec![vec![
        button(
            "✅ Done",
            Callback::Complete {
                kind,
                task_id,
                reminder_id,
            },
        ),
        button(
            "⏱️ Remind me later",
            Callback::Snooze {
                kind,
                task_id,
                reminder_id,
            },
        ),
    ]])
}

/// Shorten `name` to `keep` chars plus "..." when it is longer than `max` chars.
fn truncate(name: &str, max: usize, keep: usize) -> String {
    if name.chars().count() > max {
        let head: String = name.chars().take(keep).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_truncate_by_chars() {
        assert_eq!(truncate("short", 20, 17), "short");
        assert_eq!(truncate(&"a".repeat(20), 20, 17), "a".repeat(20));
        assert_eq!(truncate(&"a".repeat(21), 20, 17), format!("{}...", "a".repeat(17)));
        assert_eq!(truncate("позвонить в спортзал", 15, 12), "позвонить в ...");
    }

    #[test]
    fn test_every_payload_round_trips() {
        let daily = vec![DailyTask {
            id: 3,
            user_id: "u".into(),
            name: "A very long daily task name".into(),
            time: "08:00".into(),
            created_at: String::new(),
        }];
        let once = vec![OneTimeTask {
            id: 4,
            user_id: "u".into(),
            name: "Call".into(),
            scheduled_at: NaiveDate::from_ymd_opt(2030, 8, 10)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap(),
            created_at: String::new(),
        }];
        let keyboards = [
            main_menu(),
            back_to_menu(),
            tasks_menu(true, true),
            tasks_menu(false, false),
            daily_tasks_list(&daily),
            one_time_tasks_list(&once),
            task_detail(TaskKind::OneTime, 4),
            confirm_delete(TaskKind::Daily, 3),
            settings_menu(&WeatherSettings::default()),
            weather_time_menu(),
            reminder(TaskKind::Daily, 3, 9),
        ];
        for kb in &keyboards {
            for payload in kb.payloads() {
                assert!(Callback::parse(payload).is_some(), "{payload}");
                assert!(payload.len() <= 64, "telegram limit: {payload}");
            }
        }
    }

    #[test]
    fn test_list_labels() {
        let once = vec![OneTimeTask {
            id: 4,
            user_id: "u".into(),
            name: "Call".into(),
            scheduled_at: NaiveDate::from_ymd_opt(2030, 8, 10)
                .unwrap()
                .and_hms_opt(14, 5, 0)
                .unwrap(),
            created_at: String::new(),
        }];
        let kb = one_time_tasks_list(&once);
        assert_eq!(kb.rows[0][0].label, "⏰ Call (10.08 14:05)");
        assert_eq!(kb.rows[0][0].data, "view_one_time|4");
    }

    #[test]
    fn test_tasks_menu_variants() {
        let empty = tasks_menu(false, false);
        let payloads: Vec<&str> = empty.payloads().collect();
        assert_eq!(
            payloads,
            vec!["action|add_daily", "action|add_reminder", "action|main_menu"]
        );
        let daily_only = tasks_menu(true, false);
        let payloads: Vec<&str> = daily_only.payloads().collect();
        assert_eq!(payloads, vec!["manage|daily_tasks", "action|main_menu"]);
    }

    #[test]
    fn test_weather_time_menu_layout() {
        let kb = weather_time_menu();
        assert_eq!(kb.rows.len(), 5);
        assert_eq!(kb.rows[3].len(), 1);
        assert_eq!(kb.rows[0][0].data, "set_time|07:00");
    }
}
