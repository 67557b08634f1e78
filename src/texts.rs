//! User-facing message texts (Telegram Markdown).

use chrono::NaiveDateTime;

pub const MAIN_MENU: &str = "🏠 *Main menu*\n\nChoose an action:";

pub const HELP: &str = "🆘 *Help*

*🌤️ Weather:*
/weather - current weather

*📅 Tasks:*
/add\\_daily - add a daily task
/add\\_reminder - add a one-time reminder
/my\\_tasks - list your tasks

*⚙️ Other:*
/settings - weather notification settings
/help - show this help
/start - restart the bot

*📝 How reminders work:*
• If you don't mark a task as done, I'll remind you again
• Intervals: 1 hour → 30 min → 15 min → 10 min → 5 min
• At most 10 reminders

*Examples:*
• Daily task: \"Brush teeth\" at 22:00
• One-time reminder: \"Call the gym\" on 10.08.2025 at 14:00";

pub const UNRECOGNIZED: &str =
    "I don't understand that 🤔\n\nUse /help to see the available commands.";

pub const UNKNOWN_COMMAND: &str = "❌ Unknown command.";

pub const STORAGE_FAILURE: &str = "❌ Something went wrong while saving. Please try again.";

pub const ADD_DAILY_PROMPT: &str =
    "📅 *New daily task*\n\nEnter the task name (for example: 'Brush teeth'):";

pub const ADD_REMINDER_PROMPT: &str =
    "⏰ *New one-time reminder*\n\nEnter the task name (for example: 'Call the gym'):";

pub const EMPTY_NAME: &str = "❌ The name can't be empty. Enter the task name:";

pub const BAD_TIME: &str = "❌ Invalid time format. Try again (for example: 22:00 or 8.30):";

pub const BAD_DATE_TIME: &str =
    "❌ Invalid time format or the date has already passed. Try again (for example: 14:00):";

pub const NO_TASKS: &str = "You have no tasks yet.\n\nUse the buttons below to add one!";

pub const NO_DAILY_TASKS: &str = "📅 You have no daily tasks.";

pub const NO_ONE_TIME_TASKS: &str = "⏰ You have no one-time reminders.";

pub const DAILY_NOT_FOUND: &str = "❌ Task not found.";

pub const ONE_TIME_NOT_FOUND: &str = "❌ Reminder not found.";

pub const SETTINGS_FOOTER: &str = "Configure your weather notifications here:";

pub const WEATHER_TIME_PROMPT: &str =
    "⏰ *Choose when to get the weather:*\n\nIt will arrive every day at the chosen time.";

pub const SNOOZE_EXHAUSTED: &str = "❌ This reminder can't be postponed any more.";

pub const REMINDER_CLOSED: &str = "✅ This reminder is already closed.";

pub fn welcome(first_name: &str) -> String {
    format!(
        "🤖 *Hi, {first_name}!*

I'm your personal Butler. Here's what I can do:

🌤️ *Weather*
• Every morning I send the forecast (08:30 unless you pick another time)
• I suggest what to wear

📅 *Daily tasks*
• I remind you about recurring tasks at a time you choose

⏰ *One-time reminders*
• I remind you about events on a specific date and time
• If you forget, I keep reminding you

Use the buttons below or /help to get started! 😊"
    )
}

/// Greeting for a scheduled weather message, by local hour.
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        5..=11 => "🌅 *Good morning!*",
        12..=16 => "☀️ *Good afternoon!*",
        17..=21 => "🌆 *Good evening!*",
        _ => "🌙 *Good night!*",
    }
}

pub fn daily_name_ack(name: &str) -> String {
    format!("✅ Task: '{name}'\n\nNow enter the reminder time (for example: 22:00 or 8.30):")
}

pub fn daily_created(name: &str, time: &str) -> String {
    format!(
        "✅ *Daily task added!*\n\n📝 {name}\n⏰ Every day at {time}\n\n\
         I'll remind you about it every day!"
    )
}

pub fn one_time_name_ack(name: &str) -> String {
    format!("✅ Task: '{name}'\n\nEnter the date (for example: 10.08.2025 or 15/12/2024):")
}

pub fn one_time_date_ack(date: &str) -> String {
    format!("✅ Date: {date}\n\nEnter the time (for example: 14:00 or 9.30):")
}

pub fn one_time_created(name: &str, at: NaiveDateTime) -> String {
    format!(
        "✅ *Reminder added!*\n\n📝 {name}\n📅 {}\n\nI'll remind you at that time!",
        long_datetime(at)
    )
}

/// `10.08.2025 at 14:00`
pub fn long_datetime(at: NaiveDateTime) -> String {
    at.format("%d.%m.%Y at %H:%M").to_string()
}

/// `10.08 14:00`
pub fn short_datetime(at: NaiveDateTime) -> String {
    at.format("%d.%m %H:%M").to_string()
}

pub fn task_completed(name: &str) -> String {
    format!("✅ *Great!* Task marked as done.\n\n📝 {name}")
}

pub fn snoozed(until: NaiveDateTime) -> String {
    format!(
        "⏱️ *Reminder postponed*\n\nI'll remind you again at {}",
        until.format("%H:%M")
    )
}

pub fn settings(notice: Option<&str>) -> String {
    match notice {
        Some(n) => format!("⚙️ *Settings*\n\n{n}\n\n{SETTINGS_FOOTER}"),
        None => format!("⚙️ *Settings*\n\n{SETTINGS_FOOTER}"),
    }
}

pub fn weather_toggled(enabled: bool) -> String {
    format!(
        "🌤️ Weather notifications {}!",
        if enabled { "enabled" } else { "disabled" }
    )
}

pub fn weather_time_changed(time: &str) -> String {
    format!("✅ Weather time changed to {time}!")
}
