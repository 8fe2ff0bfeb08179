use crate::gate::ChannelKind;
use hyper::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single recipient delivery.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Timeout after {0:?} while calling the chat API")]
    Timeout(Duration),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Chat API error {status}: {context}")]
    Api { status: StatusCode, context: String },
}

/// One failed recipient within a publish call. The chat id is stored masked;
/// full recipient identifiers never leave the credential bundle.
#[derive(Debug)]
pub struct DeliveryFailure {
    pub chat_id: String,
    pub reason: DeliveryError,
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("No recipient chat ids configured")]
    NoRecipients,
    #[error("No publisher available for channel '{0}'")]
    UnsupportedChannel(ChannelKind),
    #[error("Delivery failed for {}/{} recipients: {}", .failed.len(), .attempted, summarize(.failed))]
    Delivery {
        failed: Vec<DeliveryFailure>,
        attempted: usize,
    },
}

fn summarize(failures: &[DeliveryFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.chat_id, f.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Alert record '{0}' not found")]
    RecordNotFound(String),
    #[error(transparent)]
    Publish(#[from] PublishError),
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}
