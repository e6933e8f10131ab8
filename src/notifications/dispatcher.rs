use reqwest::Client;
use std::fmt;
use tracing::{error, info};

use super::models::{ChannelKind, NotificationConfig};
use super::senders::{NotificationSender, SenderError, bark::BarkSender, telegram::TelegramSender};
use crate::version::user_agent;

/// What happened to one channel during a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// Credentials missing: nothing to do, counts as success.
    Skipped,
    Delivered,
    Failed(String),
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryStatus::Skipped => f.write_str("skipped"),
            DeliveryStatus::Delivered => f.write_str("delivered"),
            DeliveryStatus::Failed(_) => f.write_str("failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOutcome {
    pub channel: ChannelKind,
    pub status: DeliveryStatus,
}

impl ChannelOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self.status, DeliveryStatus::Failed(_))
    }
}

/// Per-channel results of one dispatch, in attempt order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    outcomes: Vec<ChannelOutcome>,
}

impl DispatchReport {
    pub fn outcomes(&self) -> &[ChannelOutcome] {
        &self.outcomes
    }

    pub fn status_of(&self, channel: ChannelKind) -> Option<&DeliveryStatus> {
        self.outcomes
            .iter()
            .find(|o| o.channel == channel)
            .map(|o| &o.status)
    }

    /// Logical AND over the channels; skipped channels count as successful.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(ChannelOutcome::is_success)
    }
}

impl fmt::Display for DispatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .outcomes
            .iter()
            .map(|o| format!("{}={}", o.channel, o.status))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// Sends one composed message through every configured channel, one after
/// another. A failing channel never stops the next one from being tried.
pub struct NotificationDispatcher {
    senders: Vec<Box<dyn NotificationSender>>,
}

impl NotificationDispatcher {
    /// Telegram then Bark, sharing one HTTP client.
    pub fn new() -> Result<Self, SenderError> {
        let client = Client::builder().user_agent(user_agent()).build()?;
        let senders: Vec<Box<dyn NotificationSender>> = vec![
            Box::new(TelegramSender::new(client.clone())),
            Box::new(BarkSender::new(client)),
        ];
        Ok(Self::with_senders(senders))
    }

    pub fn with_senders(senders: Vec<Box<dyn NotificationSender>>) -> Self {
        Self { senders }
    }

    pub async fn dispatch(&self, message: &str, config: &NotificationConfig) -> DispatchReport {
        let mut outcomes = Vec::with_capacity(self.senders.len());

        for sender in &self.senders {
            let channel = sender.kind();
            let status = match config.channel(channel) {
                None => {
                    info!(%channel, "Channel not configured, skipping.");
                    DeliveryStatus::Skipped
                }
                Some(channel_config) => match sender.send(&channel_config, &config.title, message).await {
                    Ok(()) => {
                        info!(%channel, "Notification delivered.");
                        DeliveryStatus::Delivered
                    }
                    Err(e) => {
                        error!(%channel, error = %e, "Failed to deliver notification.");
                        DeliveryStatus::Failed(e.to_string())
                    }
                },
            };
            outcomes.push(ChannelOutcome { channel, status });
        }

        DispatchReport { outcomes }
    }
}
