//! Outbound channel publishers.
//!
//! One publisher per supported channel; [`Publisher`] routes a publish call
//! to the right one based on the gate's resolved channel. Adding a channel
//! means a new [`crate::gate::ResolvedChannel`] variant and a field here.

pub mod telegram;

pub use telegram::TelegramPublisher;

use crate::error::PublishError;
use crate::gate::ResolvedChannel;

#[derive(Debug, Clone)]
pub struct Publisher {
    telegram: TelegramPublisher,
}

impl Publisher {
    pub fn new(telegram: TelegramPublisher) -> Self {
        Self { telegram }
    }

    pub async fn publish(
        &self,
        message: &str,
        channel: &ResolvedChannel,
    ) -> Result<(), PublishError> {
        match channel {
            ResolvedChannel::Telegram(credentials) => {
                self.telegram.publish(message, credentials).await
            }
            ResolvedChannel::Unsupported(kind) => Err(PublishError::UnsupportedChannel(*kind)),
        }
    }
}
