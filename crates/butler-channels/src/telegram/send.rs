//! Message sending: text with inline keyboards, edits, callback answers, and command registration.

use super::TelegramChannel;
use crate::utils::split_message;
use butler_core::{error::ButlerError, message::Keyboard};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Telegram's per-message character limit.
const MAX_MESSAGE_LEN: usize = 4096;

/// Outcome of a Bot API call that did not fail at the transport level.
enum ApiOutcome {
    Ok,
    Rejected(String),
}

impl TelegramChannel {
    /// Send a text message to a specific chat. The keyboard goes on the last chunk.
    pub(crate) async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), ButlerError> {
        let chunks = split_message(text, MAX_MESSAGE_LEN);
        let last = chunks.len().saturating_sub(1);

        for (i, chunk) in chunks.into_iter().enumerate() {
            let mut body = json!({
                "chat_id": chat_id,
                "text": chunk,
            });
            if i == last {
                if let Some(kb) = keyboard {
                    body["reply_markup"] = inline_keyboard(kb);
                }
            }
            self.call_with_markdown_fallback("sendMessage", body).await?;
        }

        Ok(())
    }

    /// Replace the text and buttons of a message the bot sent earlier.
    ///
    /// Falls back to a fresh message when Telegram refuses the edit (too old, deleted).
    pub(crate) async fn edit_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), ButlerError> {
        let mut body = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
        });
        if let Some(kb) = keyboard {
            body["reply_markup"] = inline_keyboard(kb);
        }

        match self.call_with_markdown_fallback("editMessageText", body).await {
            Ok(()) => Ok(()),
            Err(ButlerError::Channel(e)) if e.contains("message is not modified") => {
                debug!("telegram edit skipped, message unchanged");
                Ok(())
            }
            Err(e) => {
                warn!("telegram edit failed, sending new message: {e}");
                self.send_text(chat_id, text, keyboard).await
            }
        }
    }

    /// Acknowledge a button press.
    pub(crate) async fn answer_callback_query(&self, callback_id: &str) -> Result<(), ButlerError> {
        let body = json!({ "callback_query_id": callback_id });
        match self.call("answerCallbackQuery", &body).await? {
            ApiOutcome::Ok => Ok(()),
            ApiOutcome::Rejected(e) => Err(ButlerError::Channel(format!(
                "telegram answerCallbackQuery failed: {e}"
            ))),
        }
    }

    /// Register bot commands with Telegram so users see an autocomplete menu.
    /// Best-effort: logs failures but does not propagate errors.
    pub(crate) async fn register_commands(&self) {
        let commands = json!({
            "commands": [
                { "command": "start", "description": "Main menu" },
                { "command": "weather", "description": "Current weather and what to wear" },
                { "command": "add_daily", "description": "Add a daily task" },
                { "command": "add_reminder", "description": "Add a one-time reminder" },
                { "command": "my_tasks", "description": "List your tasks" },
                { "command": "settings", "description": "Weather notification settings" },
                { "command": "help", "description": "Show available commands" },
            ]
        });

        match self.call("setMyCommands", &commands).await {
            Ok(ApiOutcome::Ok) => info!("registered Telegram bot commands"),
            Ok(ApiOutcome::Rejected(body)) => {
                warn!("failed to register Telegram bot commands: {body}")
            }
            Err(e) => warn!("failed to register Telegram bot commands: {e}"),
        }
    }

    /// Call with Markdown parsing; on an entity parse error retry once as plain text.
    async fn call_with_markdown_fallback(
        &self,
        method: &str,
        mut body: Value,
    ) -> Result<(), ButlerError> {
        body["parse_mode"] = json!("Markdown");
        match self.call(method, &body).await? {
            ApiOutcome::Ok => Ok(()),
            ApiOutcome::Rejected(error_text) if error_text.contains("can't parse entities") => {
                warn!("Markdown parse failed, retrying as plain text: {error_text}");
                if let Some(obj) = body.as_object_mut() {
                    obj.remove("parse_mode");
                }
                match self.call(method, &body).await? {
                    ApiOutcome::Ok => Ok(()),
                    ApiOutcome::Rejected(plain_err) => Err(ButlerError::Channel(format!(
                        "telegram {method} (plain fallback) failed: {plain_err}"
                    ))),
                }
            }
            ApiOutcome::Rejected(error_text) => Err(ButlerError::Channel(format!(
                "telegram {method} failed: {error_text}"
            ))),
        }
    }

    async fn call(&self, method: &str, body: &Value) -> Result<ApiOutcome, ButlerError> {
        let url = format!("{}/{method}", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ButlerError::Channel(format!("telegram {method} failed: {e}")))?;

        let status = resp.status();
        if status.is_success() {
            Ok(ApiOutcome::Ok)
        } else {
            let error_text = resp.text().await.unwrap_or_default();
            Ok(ApiOutcome::Rejected(format!("{status}: {error_text}")))
        }
    }
}

/// Render a keyboard as a Telegram `InlineKeyboardMarkup`.
pub(crate) fn inline_keyboard(keyboard: &Keyboard) -> Value {
    let rows: Vec<Vec<Value>> = keyboard
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|b| json!({ "text": b.label, "callback_data": b.data }))
                .collect()
        })
        .collect();
    json!({ "inline_keyboard": rows })
}
