use async_trait::async_trait;
use thiserror::Error;

use super::models::{ChannelConfig, ChannelKind};

pub mod bark;
pub mod telegram;

#[derive(Error, Debug)]
pub enum SenderError {
    #[error("Failed to send notification: {0}")]
    SendFailed(String),
    #[error("Invalid configuration for sender: {0}")]
    InvalidConfiguration(String),
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// A trait for sending notifications to a specific channel type.
/// All concrete sender implementations (Telegram, Bark) implement this trait.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// The channel whose configuration this sender expects.
    fn kind(&self) -> ChannelKind;

    /// Delivers `message` under `title` with exactly one request. Only an
    /// HTTP 200 response counts as delivered.
    async fn send(&self, config: &ChannelConfig, title: &str, message: &str) -> Result<(), SenderError>;
}

/// Turns a non-200 response into a [`SenderError::SendFailed`] carrying the body.
pub(crate) async fn ensure_ok(channel: ChannelKind, response: reqwest::Response) -> Result<(), SenderError> {
    let status = response.status();
    if status == reqwest::StatusCode::OK {
        return Ok(());
    }
    let error_body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error body".to_string());
    Err(SenderError::SendFailed(format!(
        "{channel} returned non-success status: {status}. Body: {error_body}"
    )))
}
