use crate::{
    error::ButlerError,
    message::{IncomingMessage, OutgoingMessage},
    weather::WeatherReport,
};
use async_trait::async_trait;

/// Messaging Channel trait.
///
/// Every messaging platform implements this trait to receive events
/// (text and button presses) and to send or edit messages.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming events.
    /// Returns a receiver that yields incoming messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, ButlerError>;

    /// Send (or edit, see [`OutgoingMessage::edit_message_id`]) a message.
    async fn send(&self, message: OutgoingMessage) -> Result<(), ButlerError>;

    /// Acknowledge a button press so the client stops its spinner.
    async fn answer_callback(&self, _callback_id: &str) -> Result<(), ButlerError> {
        Ok(())
    }

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), ButlerError>;
}

/// Source of current weather conditions for the configured location.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Fetch current conditions.
    async fn current(&self) -> Result<WeatherReport, ButlerError>;
}
