use async_trait::async_trait;
use reqwest::{Client, header};
use serde::Serialize;

use super::{NotificationSender, SenderError, ensure_ok};
use crate::notifications::models::{ChannelConfig, ChannelKind};

/// A sender for Bark push notifications (`POST` to the Bark server's push endpoint).
pub struct BarkSender {
    client: Client,
}

impl Default for BarkSender {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl BarkSender {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[derive(Serialize)]
struct BarkPush<'a> {
    title: &'a str,
    body: &'a str,
    device_key: &'a str,
}

#[async_trait]
impl NotificationSender for BarkSender {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Bark
    }

    async fn send(&self, config: &ChannelConfig, title: &str, message: &str) -> Result<(), SenderError> {
        let (url, device_key) = match config {
            ChannelConfig::Bark { url, device_key } => (url, device_key),
            _ => {
                return Err(SenderError::InvalidConfiguration(
                    "Expected Bark config, but found a different type.".to_string(),
                ));
            }
        };

        let payload = BarkPush {
            title,
            body: message,
            device_key,
        };
        let body = serde_json::to_vec(&payload)
            .map_err(|e| SenderError::InvalidConfiguration(format!("Unserialisable Bark payload: {e}")))?;

        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
            .header(header::ACCEPT, "*/*")
            .body(body)
            .send()
            .await?;
        ensure_ok(ChannelKind::Bark, response).await
    }
}
