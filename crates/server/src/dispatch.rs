//! Dispatch orchestration: the state machine from inbound event to recorded
//! delivery outcome.
//!
//! A dispatch attempt moves through gated → recorded-pending → publishing →
//! recorded-success | recorded-error. Gate rejections happen before any row
//! is written and are not errors; once a record exists, every failure path
//! lands an error status on it before propagating.

use crate::config::AppConfig;
use crate::entity::alert_message;
use crate::error::DispatchError;
use crate::event::{self, EventType};
use crate::gate::ConfigGate;
use crate::publisher::{Publisher, TelegramPublisher};
use crate::store::{AlertStatus, AlertStore};
use crate::template::{TemplateContext, TemplateEngine};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Why a dispatch produced no delivery attempt. None of these are errors:
/// "not configured" is the expected steady state for most shops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The event type is not enabled for the shop.
    AlertDisabled,
    /// No usable channel credentials are configured for the shop.
    ChannelUnconfigured,
    /// The webhook topic is outside the known mapping.
    UnknownTopic,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AlertDisabled => "alert_disabled",
            Self::ChannelUnconfigured => "channel_unconfigured",
            Self::UnknownTopic => "unknown_topic",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Skipped(SkipReason),
    Sent(alert_message::Model),
}

/// A dispatch request. A caller-supplied `message` bypasses the template
/// engine (manual sends); `existing_alert_id` re-enters the pipeline for a
/// resend of that record.
#[derive(Debug, Clone)]
pub struct SendAlert {
    pub shop_id: String,
    pub event_type: EventType,
    pub message: Option<String>,
    pub context: TemplateContext,
    pub existing_alert_id: Option<String>,
}

/// The pipeline's coordinating component. Holds its collaborators as
/// constructed values; nothing here reaches for ambient state.
#[derive(Debug)]
pub struct Dispatcher {
    gate: ConfigGate,
    store: AlertStore,
    template: TemplateEngine,
    publisher: Publisher,
}

impl Dispatcher {
    pub fn new(db: Arc<DatabaseConnection>, config: &AppConfig) -> Self {
        let telegram = TelegramPublisher::new(
            config.telegram.api_base_url.clone(),
            Duration::from_secs(config.telegram.request_timeout_secs),
        );
        Self {
            gate: ConfigGate::new(db.clone()),
            store: AlertStore::new(db),
            template: TemplateEngine::new(),
            publisher: Publisher::new(telegram),
        }
    }

    /// Run one dispatch attempt through the full pipeline.
    #[tracing::instrument(
        skip(self, request),
        fields(shop_id = %request.shop_id, event_type = %request.event_type)
    )]
    pub async fn handle_send_alert(
        &self,
        request: SendAlert,
    ) -> Result<DispatchOutcome, DispatchError> {
        // The two gate reads are independent; issue them concurrently.
        let (enabled, channel) = tokio::try_join!(
            self.gate.is_enabled(&request.shop_id, &request.event_type),
            self.gate.resolve_channel(&request.shop_id),
        )?;

        if !enabled {
            debug!(
                "Alert type {} not enabled for {}, skipping",
                request.event_type, request.shop_id
            );
            return Ok(DispatchOutcome::Skipped(SkipReason::AlertDisabled));
        }
        let Some(channel) = channel else {
            debug!(
                "No delivery channel configured for {}, skipping",
                request.shop_id
            );
            return Ok(DispatchOutcome::Skipped(SkipReason::ChannelUnconfigured));
        };

        let record = match &request.existing_alert_id {
            // Resend: transition the existing record back to pending,
            // keeping its original message.
            Some(id) => self
                .store
                .mark_pending(id)
                .await?
                .ok_or_else(|| DispatchError::RecordNotFound(id.clone()))?,
            None => {
                let message = match request.message {
                    Some(text) => text,
                    None => self.template.render(&request.event_type, &request.context),
                };
                self.store
                    .create(&request.shop_id, &request.event_type, &message)
                    .await?
            }
        };

        match self.publisher.publish(&record.message, &channel).await {
            Ok(()) => {
                let updated = self
                    .store
                    .update_status(&record.id, AlertStatus::Success, None)
                    .await?
                    .ok_or_else(|| DispatchError::RecordNotFound(record.id.clone()))?;
                info!(
                    "Alert {} delivered for shop {}",
                    updated.id, updated.shop_id
                );
                Ok(DispatchOutcome::Sent(updated))
            }
            Err(publish_error) => {
                self.finalize_error(&record.id, &publish_error.to_string())
                    .await;
                Err(publish_error.into())
            }
        }
    }

    /// Replay a previously logged alert through the pipeline, reusing its
    /// original shop, event type and rendered message. Resending an unknown
    /// id is rejected before any dispatch work begins.
    #[tracing::instrument(skip(self))]
    pub async fn handle_resend_alert(
        &self,
        alert_id: &str,
    ) -> Result<DispatchOutcome, DispatchError> {
        let record = self
            .store
            .find_by_id(alert_id)
            .await?
            .ok_or_else(|| DispatchError::RecordNotFound(alert_id.to_string()))?;

        self.handle_send_alert(SendAlert {
            shop_id: record.shop_id.clone(),
            event_type: EventType::from_topic(&record.alert_type),
            message: Some(record.message.clone()),
            context: TemplateContext::default(),
            existing_alert_id: Some(record.id),
        })
        .await
    }

    /// Entry point for the webhook boundary: map the topic, extract template
    /// context from the payload, dispatch. Unknown topics are logged and
    /// dropped.
    #[tracing::instrument(skip(self, payload), fields(shop_id = %shop_id, topic = %topic))]
    pub async fn handle_webhook_event(
        &self,
        shop_id: &str,
        topic: &str,
        payload: &Value,
    ) -> Result<DispatchOutcome, DispatchError> {
        let event_type = EventType::from_topic(topic);
        if !event_type.is_known() {
            info!("Dropping webhook with unmapped topic {}", event_type);
            return Ok(DispatchOutcome::Skipped(SkipReason::UnknownTopic));
        }

        let context = event::payload_context(&event_type, shop_id, payload);
        self.handle_send_alert(SendAlert {
            shop_id: shop_id.to_string(),
            event_type,
            message: None,
            context,
            existing_alert_id: None,
        })
        .await
    }

    /// Best-effort terminal transition after a delivery failure. A failure
    /// here is only logged; the original publish error still propagates to
    /// the caller.
    async fn finalize_error(&self, record_id: &str, detail: &str) {
        if let Err(db_error) = self
            .store
            .update_status(record_id, AlertStatus::Error, Some(detail.to_string()))
            .await
        {
            tracing::error!(
                name = "dispatch.finalize_error.status_update_failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                error = ?db_error,
                alert_id = %record_id,
                message = "Failed to record error status after delivery failure"
            );
        }
    }
}
