//! Inline button payloads: `|`-delimited tokens, e.g. `delete|daily|7`.

use butler_memory::TaskKind;
use std::fmt;

/// Times offered in the weather time menu.
pub const WEATHER_TIME_CHOICES: [&str; 7] =
    ["07:00", "07:30", "08:00", "08:30", "09:00", "09:30", "10:00"];

/// Top-level menu navigation (`action|...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    MainMenu,
    Weather,
    MyTasks,
    AddDaily,
    AddReminder,
    Help,
    Settings,
}

impl MenuAction {
    fn as_str(&self) -> &'static str {
        match self {
            Self::MainMenu => "main_menu",
            Self::Weather => "weather",
            Self::MyTasks => "my_tasks",
            Self::AddDaily => "add_daily",
            Self::AddReminder => "add_reminder",
            Self::Help => "help",
            Self::Settings => "settings",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "main_menu" => Some(Self::MainMenu),
            "weather" => Some(Self::Weather),
            "my_tasks" => Some(Self::MyTasks),
            "add_daily" => Some(Self::AddDaily),
            "add_reminder" => Some(Self::AddReminder),
            "help" => Some(Self::Help),
            "settings" => Some(Self::Settings),
            _ => None,
        }
    }
}

/// A decoded button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    Action(MenuAction),
    /// Open the per-kind task list.
    Manage(TaskKind),
    View(TaskKind, i64),
    /// First phase of deletion: ask for confirmation.
    Delete(TaskKind, i64),
    ConfirmDelete(TaskKind, i64),
    ToggleWeather,
    /// Open the weather time menu.
    SetWeatherTime,
    /// Pick a weather time; always one of [`WEATHER_TIME_CHOICES`].
    SetTime(String),
    Complete {
        kind: TaskKind,
        task_id: i64,
        reminder_id: i64,
    },
    Snooze {
        kind: TaskKind,
        task_id: i64,
        reminder_id: i64,
    },
}

impl Callback {
    /// Decode a payload. Returns `None` for anything malformed: unknown verbs,
    /// wrong token counts, non-numeric ids, unknown kinds, off-menu times.
    pub fn parse(data: &str) -> Option<Self> {
        let parts: Vec<&str> = data.split('|').collect();
        match parts.as_slice() {
            ["action", action] => MenuAction::parse(action).map(Self::Action),
            ["manage", "daily_tasks"] => Some(Self::Manage(TaskKind::Daily)),
            ["manage", "one_time_tasks"] => Some(Self::Manage(TaskKind::OneTime)),
            ["view_daily", id] => Some(Self::View(TaskKind::Daily, parse_id(id)?)),
            ["view_one_time", id] => Some(Self::View(TaskKind::OneTime, parse_id(id)?)),
            ["delete", kind, id] => Some(Self::Delete(parse_kind(kind)?, parse_id(id)?)),
            ["confirm_delete", kind, id] => {
                Some(Self::ConfirmDelete(parse_kind(kind)?, parse_id(id)?))
            }
            ["toggle", "weather_notifications"] => Some(Self::ToggleWeather),
            ["set", "weather_time"] => Some(Self::SetWeatherTime),
            ["set_time", time] => WEATHER_TIME_CHOICES
                .contains(time)
                .then(|| Self::SetTime((*time).to_string())),
            [verb @ ("complete" | "snooze"), kind, task_id, reminder_id] => {
                let kind = parse_kind(kind)?;
                let task_id = parse_id(task_id)?;
                let reminder_id = parse_id(reminder_id)?;
                Some(if *verb == "complete" {
                    Self::Complete {
                        kind,
                        task_id,
                        reminder_id,
                    }
                } else {
                    Self::Snooze {
                        kind,
                        task_id,
                        reminder_id,
                    }
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Action(action) => write!(f, "action|{}", action.as_str()),
            Self::Manage(kind) => write!(f, "manage|{kind}_tasks"),
            Self::View(kind, id) => write!(f, "view_{kind}|{id}"),
            Self::Delete(kind, id) => write!(f, "delete|{kind}|{id}"),
            Self::ConfirmDelete(kind, id) => write!(f, "confirm_delete|{kind}|{id}"),
            Self::ToggleWeather => f.write_str("toggle|weather_notifications"),
            Self::SetWeatherTime => f.write_str("set|weather_time"),
            Self::SetTime(time) => write!(f, "set_time|{time}"),
            Self::Complete {
                kind,
                task_id,
                reminder_id,
            } => write!(f, "complete|{kind}|{task_id}|{reminder_id}"),
            Self::Snooze {
                kind,
                task_id,
                reminder_id,
            } => write!(f, "snooze|{kind}|{task_id}|{reminder_id}"),
        }
    }
}

fn parse_kind(s: &str) -> Option<TaskKind> {
    s.parse().ok()
}

fn parse_id(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_payloads() {
        assert_eq!(
            Callback::parse("action|main_menu"),
            Some(Callback::Action(MenuAction::MainMenu))
        );
        assert_eq!(
            Callback::parse("manage|one_time_tasks"),
            Some(Callback::Manage(TaskKind::OneTime))
        );
        assert_eq!(
            Callback::parse("view_daily|12"),
            Some(Callback::View(TaskKind::Daily, 12))
        );
        assert_eq!(
            Callback::parse("delete|daily|3"),
            Some(Callback::Delete(TaskKind::Daily, 3))
        );
        assert_eq!(
            Callback::parse("confirm_delete|one_time|4"),
            Some(Callback::ConfirmDelete(TaskKind::OneTime, 4))
        );
        assert_eq!(
            Callback::parse("complete|one_time|4|9"),
            Some(Callback::Complete {
                kind: TaskKind::OneTime,
                task_id: 4,
                reminder_id: 9
            })
        );
        assert_eq!(
            Callback::parse("snooze|daily|1|2"),
            Some(Callback::Snooze {
                kind: TaskKind::Daily,
                task_id: 1,
                reminder_id: 2
            })
        );
        assert_eq!(
            Callback::parse("set_time|09:30"),
            Some(Callback::SetTime("09:30".into()))
        );
        assert_eq!(
            Callback::parse("toggle|weather_notifications"),
            Some(Callback::ToggleWeather)
        );
        assert_eq!(Callback::parse("set|weather_time"), Some(Callback::SetWeatherTime));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "",
            "action",
            "action|nope",
            "action|main_menu|extra",
            "delete|daily",
            "delete|weekly|3",
            "delete|daily|x",
            "delete|daily|-3",
            "confirm_delete|daily|3|4",
            "complete|daily|1",
            "complete|daily|1|two",
            "snooze|monthly|1|2",
            "set_time|06:00",
            "set_time|9:30",
            "view_weekly|1",
            "manage|all",
            "toggle|sound",
        ] {
            assert_eq!(Callback::parse(bad), None, "{bad:?}");
        }
    }

    #[test]
    fn test_display_matches_wire_format() {
        let cases = [
            (Callback::Action(MenuAction::AddReminder), "action|add_reminder"),
            (Callback::Manage(TaskKind::Daily), "manage|daily_tasks"),
            (Callback::View(TaskKind::OneTime, 5), "view_one_time|5"),
            (Callback::Delete(TaskKind::OneTime, 5), "delete|one_time|5"),
            (
                Callback::Snooze {
                    kind: TaskKind::Daily,
                    task_id: 1,
                    reminder_id: 22,
                },
                "snooze|daily|1|22",
            ),
        ];
        for (cb, wire) in cases {
            assert_eq!(cb.to_string(), wire);
            assert_eq!(Callback::parse(wire), Some(cb));
        }
    }

    #[test]
    fn test_every_menu_time_parses() {
        for time in WEATHER_TIME_CHOICES {
            assert!(Callback::parse(&format!("set_time|{time}")).is_some());
        }
    }
}
