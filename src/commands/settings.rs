//! Weather notification settings screens.

use super::Reply;
use crate::{keyboards, texts};
use butler_core::error::ButlerError;
use butler_memory::Store;

/// Settings card with the current values on the buttons.
pub(crate) async fn show(
    store: &Store,
    user_id: &str,
    notice: Option<&str>,
) -> Result<Reply, ButlerError> {
    let settings = store.get_weather_settings(user_id).await?;
    Ok(Reply::with(
        texts::settings(notice),
        keyboards::settings_menu(&settings),
    ))
}

pub(crate) async fn toggle_weather(store: &Store, user_id: &str) -> Result<Reply, ButlerError> {
    let enabled = store.toggle_weather_notifications(user_id).await?;
    show(store, user_id, Some(&texts::weather_toggled(enabled))).await
}

pub(crate) fn time_menu() -> Reply {
    Reply::with(texts::WEATHER_TIME_PROMPT, keyboards::weather_time_menu())
}

/// Store a weather time already validated against the menu choices.
pub(crate) async fn set_time(
    store: &Store,
    user_id: &str,
    time: &str,
) -> Result<Reply, ButlerError> {
    if !store.set_weather_time(user_id, time).await? {
        return Err(ButlerError::Storage(format!(
            "no user row for {user_id} while setting weather time"
        )));
    }
    show(store, user_id, Some(&texts::weather_time_changed(time))).await
}
