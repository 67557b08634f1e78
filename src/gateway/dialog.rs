//! Multi-step text dialogs for adding tasks.

use super::Gateway;
use crate::commands::{self, Reply};
use crate::reminders::{parse_date_and_time, parse_time_of_day};
use crate::{keyboards, texts};
use butler_core::message::IncomingMessage;
use chrono::NaiveDateTime;
use tracing::{error, info};

/// Where a user is in a dialog. Pending input travels inside the state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) enum DialogState {
    #[default]
    Idle,
    DailyName,
    DailyTime {
        name: String,
    },
    OneTimeName,
    OneTimeDate {
        name: String,
    },
    /// `date` is the raw user text; it is only validated together with the time.
    OneTimeTime {
        name: String,
        date: String,
    },
}

/// Outcome of feeding one line of text to the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Transition {
    /// Move to the next state and send the prompt.
    Next(DialogState, String),
    /// Stay put and send a re-prompt.
    Retry(String),
    CreateDaily { name: String, time: String },
    CreateOneTime { name: String, at: NaiveDateTime },
    /// Text outside any dialog.
    Unrecognized,
}

/// Pure transition function.
pub(super) fn advance(state: &DialogState, text: &str, now: NaiveDateTime) -> Transition {
    let input = text.trim();
    match state {
        DialogState::Idle => Transition::Unrecognized,
        DialogState::DailyName | DialogState::OneTimeName if input.is_empty() => {
            Transition::Retry(texts::EMPTY_NAME.to_string())
        }
        DialogState::DailyName => Transition::Next(
            DialogState::DailyTime {
                name: input.to_string(),
            },
            texts::daily_name_ack(input),
        ),
        DialogState::DailyTime { name } => match parse_time_of_day(input) {
            Some(time) => Transition::CreateDaily {
                name: name.clone(),
                time,
            },
            None => Transition::Retry(texts::BAD_TIME.to_string()),
        },
        DialogState::OneTimeName => Transition::Next(
            DialogState::OneTimeDate {
                name: input.to_string(),
            },
            texts::one_time_name_ack(input),
        ),
        DialogState::OneTimeDate { name } => Transition::Next(
            DialogState::OneTimeTime {
                name: name.clone(),
                date: input.to_string(),
            },
            texts::one_time_date_ack(input),
        ),
        DialogState::OneTimeTime { name, date } => match parse_date_and_time(date, input, now) {
            Some(at) => Transition::CreateOneTime {
                name: name.clone(),
                at,
            },
            None => Transition::Retry(texts::BAD_DATE_TIME.to_string()),
        },
    }
}

impl Gateway {
    /// Free text: advance the sender's dialog, persisting a task when it completes.
    pub(super) async fn handle_text(&self, incoming: &IncomingMessage, now: NaiveDateTime) {
        let user_id = incoming.sender_id.as_str();
        let state = self.sessions.get(user_id);

        let reply = match advance(&state, &incoming.text, now) {
            Transition::Unrecognized => Reply::text(texts::UNRECOGNIZED),
            Transition::Retry(prompt) => Reply::text(prompt),
            Transition::Next(next, prompt) => {
                self.sessions.set(user_id, next);
                Reply::text(prompt)
            }
            Transition::CreateDaily { name, time } => {
                match self.store.create_daily_task(user_id, &name, &time).await {
                    Ok(id) => {
                        info!("daily task {id} created for {user_id} at {time}");
                        self.sessions.clear(user_id);
                        Reply::with(texts::daily_created(&name, &time), keyboards::back_to_menu())
                    }
                    Err(e) => {
                        error!("failed to create daily task for {user_id}: {e}");
                        commands::storage_failure()
                    }
                }
            }
            Transition::CreateOneTime { name, at } => {
                match self.store.create_one_time_task(user_id, &name, at).await {
                    Ok(id) => {
                        info!("one-time task {id} created for {user_id} at {at}");
                        self.sessions.clear(user_id);
                        Reply::with(texts::one_time_created(&name, at), keyboards::back_to_menu())
                    }
                    Err(e) => {
                        error!("failed to create one-time task for {user_id}: {e}");
                        commands::storage_failure()
                    }
                }
            }
        };

        self.reply(incoming, reply, None).await;
    }
}
