use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{NotificationSender, SenderError, ensure_ok};
use crate::notifications::models::{ChannelConfig, ChannelKind};

/// A sender for pushing notifications via the Telegram Bot API.
pub struct TelegramSender {
    client: Client,
}

impl Default for TelegramSender {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl TelegramSender {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[derive(Serialize)]
struct TelegramMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// The chat text: title, a blank line, then the listing descriptions.
pub fn message_text(title: &str, message: &str) -> String {
    format!("{title}\n\n{message}")
}

#[async_trait]
impl NotificationSender for TelegramSender {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Telegram
    }

    async fn send(&self, config: &ChannelConfig, title: &str, message: &str) -> Result<(), SenderError> {
        let (api_base, bot_token, chat_id) = match config {
            ChannelConfig::Telegram { api_base, bot_token, chat_id } => (api_base, bot_token, chat_id),
            _ => {
                return Err(SenderError::InvalidConfiguration(
                    "Expected Telegram config, but found a different type.".to_string(),
                ));
            }
        };

        let api_url = format!("{}/bot{bot_token}/sendMessage", api_base.trim_end_matches('/'));
        let text = message_text(title, message);
        let payload = TelegramMessage { chat_id, text: &text };

        let response = self.client.post(&api_url).json(&payload).send().await?;
        ensure_ok(ChannelKind::Telegram, response).await
    }
}
