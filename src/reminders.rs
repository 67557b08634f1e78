//! Reminder escalation rules and user input parsing for times and dates.
//!
//! Everything here is pure: callers pass "now" in.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Hard cap on notifications per task firing. Reaching this count schedules nothing further.
pub const MAX_REMINDERS: i64 = 10;

/// Minutes until the next retry, indexed by `attempt - 1`.
const RETRY_INTERVALS_MINUTES: [i64; 5] = [60, 30, 15, 10, 5];

/// Interval once the table is exhausted.
const RETRY_FLOOR_MINUTES: i64 = 5;

/// Delay before the retry following `attempt`, or `None` when no further retry is due.
pub fn next_retry_delay(attempt: i64) -> Option<Duration> {
    if attempt <= 0 || attempt >= MAX_REMINDERS {
        return None;
    }
    let minutes = usize::try_from(attempt - 1)
        .ok()
        .and_then(|i| RETRY_INTERVALS_MINUTES.get(i))
        .copied()
        .unwrap_or(RETRY_FLOOR_MINUTES);
    Some(Duration::minutes(minutes))
}

/// `now + next_retry_delay(attempt)`.
pub fn next_retry_time(attempt: i64, now: NaiveDateTime) -> Option<NaiveDateTime> {
    next_retry_delay(attempt).map(|d| now + d)
}

/// Reminder text for the given attempt (Markdown).
pub fn format_message(task_name: &str, attempt: i64) -> String {
    let header = match attempt {
        i64::MIN..=1 => "⏰ *Reminder:*".to_string(),
        2..=3 => format!("⏰ *Repeated reminder ({attempt}):*"),
        _ => format!("🔔 *Urgent reminder ({attempt}):*"),
    };

    let mut message = format!("{header}\n\n📝 {task_name}");
    if attempt >= 5 {
        message.push_str(&format!(
            "\n\n❗ This is the {} reminder!",
            ordinal(attempt)
        ));
    }
    message
}

/// Parse `HH:MM`, `HH.MM` or a bare hour into normalized `HH:MM`.
pub fn parse_time_of_day(text: &str) -> Option<String> {
    let (hour, minute) = parse_hour_minute(text)?;
    Some(format!("{hour:02}:{minute:02}"))
}

/// Combine a user-typed date and time into a local timestamp strictly after `now`.
///
/// Dates are tried as `dd.mm.yyyy`, `dd/mm/yyyy`, `dd-mm-yyyy`, then the same with
/// two-digit years.
pub fn parse_date_and_time(
    date_text: &str,
    time_text: &str,
    now: NaiveDateTime,
) -> Option<NaiveDateTime> {
    let (hour, minute) = parse_hour_minute(time_text)?;
    let date = parse_date(date_text)?;
    let at = date.and_time(NaiveTime::from_hms_opt(hour, minute, 0)?);
    (at > now).then_some(at)
}

fn parse_hour_minute(text: &str) -> Option<(u32, u32)> {
    let normalized = text.trim().replace('.', ":");
    let (hour, minute) = match normalized.split_once(':') {
        Some((h, m)) => {
            if m.contains(':') {
                return None;
            }
            (parse_number(h)?, parse_number(m)?)
        }
        None => (parse_number(&normalized)?, 0),
    };
    if (0..=23).contains(&hour) && (0..=59).contains(&minute) {
        Some((hour as u32, minute as u32))
    } else {
        None
    }
}

fn parse_number(s: &str) -> Option<i64> {
    s.trim().parse().ok()
}

const DATE_SEPARATORS: [char; 3] = ['.', '/', '-'];

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    for four_digit_year in [true, false] {
        for sep in DATE_SEPARATORS {
            if let Some(date) = parse_date_with(text, sep, four_digit_year) {
                return Some(date);
            }
        }
    }
    None
}

fn parse_date_with(text: &str, sep: char, four_digit_year: bool) -> Option<NaiveDate> {
    let mut parts = text.split(sep);
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let is_digits = |s: &str, lens: &[usize]| {
        lens.contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
    };
    if !is_digits(day, &[1, 2]) || !is_digits(month, &[1, 2]) {
        return None;
    }

    let year: i32 = if four_digit_year {
        if !is_digits(year, &[4]) {
            return None;
        }
        year.parse().ok()?
    } else {
        if !is_digits(year, &[2]) {
            return None;
        }
        // POSIX pivot: 69-99 are 19xx, 00-68 are 20xx.
        let yy: i32 = year.parse().ok()?;
        if yy >= 69 {
            1900 + yy
        } else {
            2000 + yy
        }
    };

    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}

fn ordinal(n: i64) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
