//! Telegram channel publisher.
//!
//! Delivers one message to every configured chat via the Bot API's
//! `sendMessage` call. Recipient deliveries run concurrently; the publish
//! succeeds only if every recipient accepted. There is no internal retry:
//! a failed publish surfaces to the orchestrator, whose resend path is the
//! retry mechanism.

use crate::error::{DeliveryError, DeliveryFailure, PublishError};
use crate::gate::TelegramCredentials;
use crate::template::MESSAGE_MARKER;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Serialize)]
struct SendMessageBody<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

/// Error shape of a non-2xx Bot API response.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TelegramPublisher {
    client: reqwest::Client,
    api_base_url: String,
    request_timeout: Duration,
}

impl TelegramPublisher {
    pub fn new(api_base_url: impl Into<String>, request_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        let mut api_base_url = api_base_url.into();
        while api_base_url.ends_with('/') {
            api_base_url.pop();
        }
        Self {
            client,
            api_base_url,
            request_timeout,
        }
    }

    /// Deliver `message` to every configured chat concurrently.
    ///
    /// Already-delivered messages are not recalled when another recipient
    /// fails; the whole call still reports failure.
    #[tracing::instrument(
        skip(self, message, credentials),
        fields(chat_count = credentials.chat_ids.len(), message_length = message.len())
    )]
    pub async fn publish(
        &self,
        message: &str,
        credentials: &TelegramCredentials,
    ) -> Result<(), PublishError> {
        if credentials.chat_ids.is_empty() {
            return Err(PublishError::NoRecipients);
        }

        let text = enveloped(message);
        info!(
            "Sending Telegram message to {} chat(s)",
            credentials.chat_ids.len()
        );

        let attempted = credentials.chat_ids.len();
        let sends = credentials
            .chat_ids
            .iter()
            .map(|chat_id| self.send_to_chat(&text, chat_id, &credentials.bot_token));
        let failed: Vec<DeliveryFailure> = join_all(sends)
            .await
            .into_iter()
            .filter_map(Result::err)
            .collect();

        if failed.is_empty() {
            debug!("Telegram message(s) sent successfully");
            Ok(())
        } else {
            tracing::error!(
                name = "publisher.telegram.delivery_failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                failed = failed.len(),
                attempted,
                message = "Telegram delivery failed for at least one chat"
            );
            Err(PublishError::Delivery { failed, attempted })
        }
    }

    async fn send_to_chat(
        &self,
        text: &str,
        chat_id: &str,
        bot_token: &str,
    ) -> Result<(), DeliveryFailure> {
        let url = format!("{}/bot{}/sendMessage", self.api_base_url, bot_token);
        let body = SendMessageBody {
            chat_id,
            text,
            parse_mode: "HTML",
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DeliveryFailure {
                chat_id: mask_chat_id(chat_id),
                reason: if e.is_timeout() {
                    DeliveryError::Timeout(self.request_timeout)
                } else {
                    DeliveryError::Network(e.to_string())
                },
            })?;

        let status = response.status();
        if !status.is_success() {
            let context = match response.json::<ApiErrorBody>().await {
                Ok(api) => match (api.error_code, api.description) {
                    (_, Some(description)) => description,
                    (Some(code), None) => format!("error_code {code}"),
                    (None, None) => "no error description".to_string(),
                },
                Err(_) => "malformed error body".to_string(),
            };
            tracing::error!(
                name = "publisher.telegram.api_error",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                status = %status,
                chat_id = %mask_chat_id(chat_id),
                message = "Telegram API rejected the message"
            );
            return Err(DeliveryFailure {
                chat_id: mask_chat_id(chat_id),
                reason: DeliveryError::Api { status, context },
            });
        }

        debug!("Telegram message delivered to chat {}", mask_chat_id(chat_id));
        Ok(())
    }
}

/// Messages the template engine produced pass through untouched; raw
/// operator text gets a default envelope so Telegram still shows a title.
pub fn enveloped(message: &str) -> Cow<'_, str> {
    if message.starts_with(MESSAGE_MARKER) {
        Cow::Borrowed(message)
    } else {
        Cow::Owned(format!(
            "{MESSAGE_MARKER} <b>Alert Notification</b>\n\n{message}"
        ))
    }
}

/// Only the first three characters of a chat id ever reach the logs.
pub fn mask_chat_id(chat_id: &str) -> String {
    let prefix: String = chat_id.chars().take(3).collect();
    format!("{prefix}***")
}
