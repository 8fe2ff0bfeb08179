//! Inbound store event intake.
//!
//! The upstream webhook layer has already authenticated the request; this
//! endpoint receives the validated `(shop_id, event_topic, payload)` triple.
//! Dispatch failures are logged and swallowed here; webhook senders retry
//! on their own schedule and an error response would only cause duplicate
//! deliveries of an alert that already reached some recipients.

use crate::AppResources;
use crate::dispatch::DispatchOutcome;
use axum::{Extension, Json, response::IntoResponse};
use hyper::StatusCode;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Tag for OpenAPI documentation.
pub const WEBHOOKS_TAG: &str = "Webhooks";

#[derive(Deserialize, ToSchema)]
struct WebhookEvent {
    shop_id: String,
    /// Topic as delivered by the platform, e.g. `products/create`.
    event_topic: String,
    /// Raw event payload; relevant fields are extracted per event type.
    #[serde(default)]
    payload: serde_json::Value,
}

/// Creates the webhook intake router.
#[tracing::instrument]
pub fn router() -> OpenApiRouter {
    OpenApiRouter::new().routes(routes!(receive_webhook))
}

#[tracing::instrument(skip(resources, event), fields(shop_id = %event.shop_id, topic = %event.event_topic))]
#[utoipa::path(
    post,
    path = "/",
    operation_id = "Receive Webhook",
    tag = WEBHOOKS_TAG,
    summary = "Ingest a validated store event",
    description = "Maps the topic onto an event type, extracts template context from the \
                   payload and runs the dispatch pipeline. Always acknowledges with 200; \
                   delivery failures are recorded on the alert row and logged, never \
                   returned to the sender.",
    request_body(content = WebhookEvent, description = "Validated store event"),
    responses(
        (status = 200, description = "Event processed (sent, skipped or failed)", content_type = "application/json")
    )
)]
async fn receive_webhook(
    Extension(resources): Extension<AppResources>,
    Json(event): Json<WebhookEvent>,
) -> impl IntoResponse {
    let result = resources
        .dispatcher
        .handle_webhook_event(&event.shop_id, &event.event_topic, &event.payload)
        .await;

    let body = match result {
        Ok(DispatchOutcome::Sent(record)) => json!({"status": "sent", "alert_id": record.id}),
        Ok(DispatchOutcome::Skipped(reason)) => {
            json!({"status": "skipped", "reason": reason.as_str()})
        }
        Err(e) => {
            tracing::error!(
                name = "api.receive_webhook.dispatch_failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                error = %e,
                shop_id = %event.shop_id,
                topic = %event.event_topic,
                message = "Webhook dispatch failed"
            );
            json!({"status": "error"})
        }
    };

    (StatusCode::OK, Json(body))
}
