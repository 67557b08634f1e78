use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An incoming event from a channel: a text message or a button press.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub id: Uuid,
    /// Channel name (e.g. "telegram").
    pub channel: String,
    /// Platform-specific user ID.
    pub sender_id: String,
    /// Human-readable sender name (first name on Telegram).
    pub sender_name: Option<String>,
    /// Platform username, without the leading `@`.
    #[serde(default)]
    pub sender_username: Option<String>,
    /// Message text content. Empty for button presses.
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Platform-specific target for routing the response (e.g. Telegram chat_id).
    #[serde(default)]
    pub reply_target: Option<String>,
    /// Set when the event is an inline button press.
    #[serde(default)]
    pub callback: Option<CallbackQuery>,
}

impl IncomingMessage {
    /// Whether this event is a slash command.
    pub fn is_command(&self) -> bool {
        self.callback.is_none() && self.text.trim_start().starts_with('/')
    }
}

/// An inline button press.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackQuery {
    /// Platform id used to acknowledge the press.
    pub id: String,
    /// The `|`-delimited payload attached to the pressed button.
    pub data: String,
    /// The message that carried the button, if still available.
    pub message_id: Option<i64>,
    /// Text of that message.
    #[serde(default)]
    pub message_text: Option<String>,
}

/// An outgoing message to send back through a channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub text: String,
    /// Inline buttons rendered under the text.
    #[serde(default)]
    pub keyboard: Option<Keyboard>,
    /// Platform-specific target for routing (e.g. Telegram chat_id).
    #[serde(default)]
    pub reply_target: Option<String>,
    /// When set, edit this existing message instead of sending a new one.
    #[serde(default)]
    pub edit_message_id: Option<i64>,
}

impl OutgoingMessage {
    /// A new message for `target`.
    pub fn to(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reply_target: Some(target.into()),
            ..Default::default()
        }
    }

    /// Attach inline buttons.
    pub fn with_keyboard(mut self, keyboard: Option<Keyboard>) -> Self {
        self.keyboard = keyboard;
        self
    }

    /// Edit `message_id` in place instead of sending a new message.
    pub fn editing(mut self, message_id: Option<i64>) -> Self {
        self.edit_message_id = message_id;
        self
    }
}

/// Rows of inline buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new(rows: Vec<Vec<Button>>) -> Self {
        Self { rows }
    }

    /// All button payloads, row by row.
    pub fn payloads(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(|b| b.data.as_str())
    }
}

/// A single inline button: visible label plus opaque payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub data: String,
}

impl Button {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}
