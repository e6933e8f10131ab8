use std::fmt;

pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// The delivery channels, in the order the dispatcher attempts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Telegram,
    Bark,
}

impl ChannelKind {
    pub const DISPATCH_ORDER: [ChannelKind; 2] = [ChannelKind::Telegram, ChannelKind::Bark];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Telegram => "telegram",
            ChannelKind::Bark => "bark",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved credentials for one channel, handed to its sender.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelConfig {
    Telegram {
        api_base: String,
        bot_token: String,
        chat_id: String,
    },
    Bark {
        url: String,
        device_key: String,
    },
}

impl ChannelConfig {
    pub fn kind(&self) -> ChannelKind {
        match self {
            ChannelConfig::Telegram { .. } => ChannelKind::Telegram,
            ChannelConfig::Bark { .. } => ChannelKind::Bark,
        }
    }
}

/// Notification settings for a run. Every credential is optional; a channel
/// missing any of its credentials is not configured and gets skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationConfig {
    pub title: String,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_api_base: String,
    pub bark_url: Option<String>,
    pub bark_device_key: Option<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            telegram_bot_token: None,
            telegram_chat_id: None,
            telegram_api_base: DEFAULT_TELEGRAM_API_BASE.to_string(),
            bark_url: None,
            bark_device_key: None,
        }
    }
}

impl NotificationConfig {
    /// Credentials for `kind`, or `None` when the channel is not configured.
    pub fn channel(&self, kind: ChannelKind) -> Option<ChannelConfig> {
        match kind {
            ChannelKind::Telegram => Some(ChannelConfig::Telegram {
                api_base: self.telegram_api_base.clone(),
                bot_token: non_empty(&self.telegram_bot_token)?.to_string(),
                chat_id: non_empty(&self.telegram_chat_id)?.to_string(),
            }),
            ChannelKind::Bark => Some(ChannelConfig::Bark {
                url: non_empty(&self.bark_url)?.to_string(),
                device_key: non_empty(&self.bark_device_key)?.to_string(),
            }),
        }
    }

    /// Names of credentials that are set while their channel still lacks
    /// another one; such a channel is skipped, which is usually a typo.
    pub fn partially_configured(&self) -> Vec<&'static str> {
        let mut incomplete = Vec::new();
        let tg_token = non_empty(&self.telegram_bot_token).is_some();
        let tg_chat = non_empty(&self.telegram_chat_id).is_some();
        if tg_token != tg_chat {
            incomplete.push(if tg_token { "telegram chat id" } else { "telegram bot token" });
        }
        let bark_url = non_empty(&self.bark_url).is_some();
        let bark_key = non_empty(&self.bark_device_key).is_some();
        if bark_url != bark_key {
            incomplete.push(if bark_url { "bark device key" } else { "bark url" });
        }
        incomplete
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_requires_all_credentials() {
        let mut config = NotificationConfig {
            title: "match".into(),
            telegram_bot_token: Some("123:abc".into()),
            bark_url: Some("https://api.day.app/push".into()),
            bark_device_key: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(config.channel(ChannelKind::Telegram), None);
        assert_eq!(config.channel(ChannelKind::Bark), None);
        assert_eq!(config.partially_configured(), vec!["telegram chat id", "bark device key"]);

        config.telegram_chat_id = Some("-100200300".into());
        assert_eq!(
            config.channel(ChannelKind::Telegram),
            Some(ChannelConfig::Telegram {
                api_base: DEFAULT_TELEGRAM_API_BASE.into(),
                bot_token: "123:abc".into(),
                chat_id: "-100200300".into(),
            })
        );
        assert_eq!(config.partially_configured(), vec!["bark device key"]);
    }

    #[test]
    fn test_telegram_token_without_chat_id_is_skipped() {
        let config = NotificationConfig {
            telegram_bot_token: Some("123:abc".into()),
            ..Default::default()
        };
        assert_eq!(config.channel(ChannelKind::Telegram), None);
        assert_eq!(config.partially_configured(), vec!["telegram chat id"]);
    }

    #[test]
    fn test_unconfigured_channels_are_not_partial() {
        let config = NotificationConfig::default();
        assert!(config.partially_configured().is_empty());
        for kind in ChannelKind::DISPATCH_ORDER {
            assert_eq!(config.channel(kind), None);
        }
    }
}
