//! Alert management API endpoints.
//!
//! Provides the manual surface over the dispatch pipeline:
//! - `/` (POST) - Trigger an alert by hand
//! - `/{id}/resend` - Replay a previously logged alert
//! - `/` (GET) - Paginated alert history for a shop

use crate::AppResources;
use crate::dispatch::{DispatchOutcome, SendAlert};
use crate::error::DispatchError;
use crate::event::{self, EventType};
use crate::store::AlertStore;
use crate::template::TemplateContext;
use axum::{
    Extension, Json,
    extract::{Path, Query},
    response::IntoResponse,
};
use hyper::StatusCode;
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::{router::OpenApiRouter, routes};

/// Tag for OpenAPI documentation.
pub const ALERTS_TAG: &str = "Alerts API";

#[derive(Deserialize, ToSchema)]
struct CreateAlert {
    shop_id: String,
    /// Event topic, e.g. `PRODUCTS_CREATE` or `products/create`.
    alert_type: String,
    /// Raw message text. When omitted the template engine renders one.
    message: Option<String>,
}

#[derive(Deserialize, IntoParams)]
struct ListAlertsParams {
    shop_id: String,
    /// 1-based page number, defaults to 1.
    page: Option<u64>,
    /// Rows per page, defaults to 20, capped at 100.
    page_size: Option<u64>,
}

/// Creates the alerts API router.
#[tracing::instrument]
pub fn router() -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(create_alert, list_alerts))
        .routes(routes!(resend_alert))
}

#[tracing::instrument(skip(resources, payload), fields(shop_id = %payload.shop_id, alert_type = %payload.alert_type))]
#[utoipa::path(
    post,
    path = "/",
    operation_id = "Create Alert",
    tag = ALERTS_TAG,
    summary = "Trigger an alert by hand",
    description = "Runs the dispatch pipeline for the given shop and event type.\n\n\
                   The same gating applies as for webhook-triggered alerts: a disabled \
                   event type or missing channel configuration skips the dispatch without \
                   creating a record. Unlike the webhook boundary, delivery failures are \
                   surfaced to the caller.",
    request_body(content = CreateAlert, description = "Alert to dispatch"),
    responses(
        (status = 200, description = "Dispatched (sent or skipped)", content_type = "application/json"),
        (status = 502, description = "Delivery to the channel failed", content_type = "application/json"),
        (status = 500, description = "Internal server error", content_type = "application/json")
    )
)]
async fn create_alert(
    Extension(resources): Extension<AppResources>,
    Json(payload): Json<CreateAlert>,
) -> impl IntoResponse {
    let event_type = EventType::from_topic(&payload.alert_type);
    let context = TemplateContext {
        shop_name: Some(event::shop_display_name(&payload.shop_id)),
        ..TemplateContext::default()
    };

    let result = resources
        .dispatcher
        .handle_send_alert(SendAlert {
            shop_id: payload.shop_id,
            event_type,
            message: payload.message,
            context,
            existing_alert_id: None,
        })
        .await;

    dispatch_response(result)
}

#[tracing::instrument(skip(resources))]
#[utoipa::path(
    post,
    path = "/{id}/resend",
    operation_id = "Resend Alert",
    tag = ALERTS_TAG,
    summary = "Replay a previously logged alert",
    description = "Re-runs the dispatch pipeline for an existing alert record, reusing its \
                   original shop, event type and message. The record transitions back to \
                   pending and ends in success or error like a fresh dispatch.",
    params(("id" = String, Path, description = "Alert record id")),
    responses(
        (status = 200, description = "Dispatched (sent or skipped)", content_type = "application/json"),
        (status = 404, description = "No alert record with this id", content_type = "application/json"),
        (status = 502, description = "Delivery to the channel failed", content_type = "application/json")
    )
)]
async fn resend_alert(
    Extension(resources): Extension<AppResources>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    dispatch_response(resources.dispatcher.handle_resend_alert(&id).await)
}

#[tracing::instrument(skip(resources, params), fields(shop_id = %params.shop_id))]
#[utoipa::path(
    get,
    path = "/",
    operation_id = "List Alerts",
    tag = ALERTS_TAG,
    summary = "Paginated alert history for a shop",
    params(ListAlertsParams),
    responses(
        (status = 200, description = "One page of alert records, newest first", content_type = "application/json"),
        (status = 500, description = "Internal server error", content_type = "application/json")
    )
)]
async fn list_alerts(
    Extension(resources): Extension<AppResources>,
    Query(params): Query<ListAlertsParams>,
) -> impl IntoResponse {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(20).clamp(1, 100);

    let store = AlertStore::new(resources.db.clone());
    match store.list_by_shop(&params.shop_id, page, page_size).await {
        Ok((alerts, total)) => (
            StatusCode::OK,
            Json(json!({
                "alerts": alerts,
                "total": total,
                "page": page,
                "page_size": page_size,
            })),
        ),
        Err(e) => {
            tracing::error!(
                name = "api.list_alerts.db_query_failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                error = ?e,
                shop_id = %params.shop_id,
                message = "Failed to list alert records"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": format!("DB error: {e}")})),
            )
        }
    }
}

/// Map a dispatch result onto the manual surface's response contract:
/// skips are 200s with a reason, delivery failures are 502s, storage
/// failures are 500s.
fn dispatch_response(
    result: Result<DispatchOutcome, DispatchError>,
) -> (StatusCode, Json<serde_json::Value>) {
    match result {
        Ok(DispatchOutcome::Sent(record)) => (
            StatusCode::OK,
            Json(json!({"status": "sent", "alert": record})),
        ),
        Ok(DispatchOutcome::Skipped(reason)) => (
            StatusCode::OK,
            Json(json!({"status": "skipped", "reason": reason.as_str()})),
        ),
        Err(DispatchError::RecordNotFound(id)) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("Alert record '{id}' not found")})),
        ),
        Err(DispatchError::Publish(e)) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({"error": e.to_string()})),
        ),
        Err(DispatchError::Database(e)) => {
            tracing::error!(
                name = "api.alerts.dispatch_db_failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                error = ?e,
                message = "Dispatch failed on a database operation"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": format!("DB error: {e}")})),
            )
        }
    }
}
