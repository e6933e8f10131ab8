pub mod dispatcher;
pub mod models;
pub mod senders;

pub use dispatcher::{ChannelOutcome, DeliveryStatus, DispatchReport, NotificationDispatcher};
pub use models::{ChannelConfig, ChannelKind, NotificationConfig};
pub use senders::{NotificationSender, SenderError};

#[cfg(test)]
pub(crate) mod test_support;
