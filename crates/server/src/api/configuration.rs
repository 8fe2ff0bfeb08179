//! Per-shop settings endpoints.
//!
//! The configuration UI's save operation: upsert-by-shop-id, last writer
//! wins. The dispatch path never writes these tables; it only reads them
//! through the gate.

use crate::AppResources;
use crate::entity::{alert_configuration, receiver_configuration};
use crate::gate::ChannelKind;
use axum::{
    Extension, Json,
    extract::Path,
    response::IntoResponse,
};
use hyper::StatusCode;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, EntityTrait};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Tag for OpenAPI documentation.
pub const CONFIGURATION_TAG: &str = "Configuration API";

/// Event flags for one shop. Anything omitted from the request is saved as
/// disabled, matching the checkbox form this mirrors.
#[derive(Deserialize, ToSchema)]
struct AlertConfigUpdate {
    #[serde(default)]
    products_create: bool,
    #[serde(default)]
    products_update: bool,
    #[serde(default)]
    products_delete: bool,
    #[serde(default)]
    orders_paid: bool,
    #[serde(default)]
    customers_create: bool,
    #[serde(default)]
    customers_update: bool,
    #[serde(default)]
    customers_delete: bool,
    #[serde(default)]
    customers_redact: bool,
    #[serde(default)]
    checkouts_create: bool,
    #[serde(default)]
    checkouts_update: bool,
    #[serde(default)]
    inventory_levels_update: bool,
    #[serde(default)]
    themes_create: bool,
    #[serde(default)]
    themes_update: bool,
    #[serde(default)]
    themes_delete: bool,
    #[serde(default)]
    themes_publish: bool,
    #[serde(default)]
    shop_update: bool,
    #[serde(default)]
    system_issue: bool,
}

impl AlertConfigUpdate {
    fn into_active(self, shop_id: String) -> alert_configuration::ActiveModel {
        alert_configuration::ActiveModel {
            shop_id: Set(shop_id),
            products_create: Set(self.products_create),
            products_update: Set(self.products_update),
            products_delete: Set(self.products_delete),
            orders_paid: Set(self.orders_paid),
            customers_create: Set(self.customers_create),
            customers_update: Set(self.customers_update),
            customers_delete: Set(self.customers_delete),
            customers_redact: Set(self.customers_redact),
            checkouts_create: Set(self.checkouts_create),
            checkouts_update: Set(self.checkouts_update),
            inventory_levels_update: Set(self.inventory_levels_update),
            themes_create: Set(self.themes_create),
            themes_update: Set(self.themes_update),
            themes_delete: Set(self.themes_delete),
            themes_publish: Set(self.themes_publish),
            shop_update: Set(self.shop_update),
            system_issue: Set(self.system_issue),
        }
    }
}

#[derive(Deserialize, ToSchema)]
struct ReceiverConfigUpdate {
    /// Selected channel name; omit to clear the selection.
    receiver_platform: Option<String>,
    telegram_bot_token: Option<String>,
    /// Comma-separated, ordered chat ids.
    telegram_receiver_chat_ids: Option<String>,
}

/// Creates the configuration API router.
#[tracing::instrument]
pub fn router() -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(get_alert_config, upsert_alert_config))
        .routes(routes!(get_receiver_config, upsert_receiver_config))
}

#[tracing::instrument(skip(resources))]
#[utoipa::path(
    get,
    path = "/{shop_id}/alert-config",
    operation_id = "Get Alert Configuration",
    tag = CONFIGURATION_TAG,
    summary = "Read a shop's event flags",
    params(("shop_id" = String, Path, description = "Shop identifier")),
    responses(
        (status = 200, description = "The configuration, or null when none was saved yet", content_type = "application/json")
    )
)]
async fn get_alert_config(
    Extension(resources): Extension<AppResources>,
    Path(shop_id): Path<String>,
) -> impl IntoResponse {
    match alert_configuration::Entity::find_by_id(&shop_id)
        .one(resources.db.as_ref())
        .await
    {
        Ok(config) => (StatusCode::OK, Json(json!({"configuration": config}))),
        Err(e) => db_error_response("api.get_alert_config.db_query_failed", &shop_id, e),
    }
}

#[tracing::instrument(skip(resources, payload))]
#[utoipa::path(
    put,
    path = "/{shop_id}/alert-config",
    operation_id = "Save Alert Configuration",
    tag = CONFIGURATION_TAG,
    summary = "Create or replace a shop's event flags",
    params(("shop_id" = String, Path, description = "Shop identifier")),
    request_body(content = AlertConfigUpdate, description = "Complete flag set; omitted flags are disabled"),
    responses(
        (status = 200, description = "Saved configuration", content_type = "application/json"),
        (status = 500, description = "Internal server error", content_type = "application/json")
    )
)]
async fn upsert_alert_config(
    Extension(resources): Extension<AppResources>,
    Path(shop_id): Path<String>,
    Json(payload): Json<AlertConfigUpdate>,
) -> impl IntoResponse {
    let exists = match alert_configuration::Entity::find_by_id(&shop_id)
        .one(resources.db.as_ref())
        .await
    {
        Ok(existing) => existing.is_some(),
        Err(e) => return db_error_response("api.upsert_alert_config.db_query_failed", &shop_id, e),
    };

    let active = payload.into_active(shop_id.clone());
    let saved = if exists {
        active.update(resources.db.as_ref()).await
    } else {
        active.insert(resources.db.as_ref()).await
    };

    match saved {
        Ok(config) => (StatusCode::OK, Json(json!({"configuration": config}))),
        Err(e) => db_error_response("api.upsert_alert_config.db_write_failed", &shop_id, e),
    }
}

#[tracing::instrument(skip(resources))]
#[utoipa::path(
    get,
    path = "/{shop_id}/receiver-config",
    operation_id = "Get Receiver Configuration",
    tag = CONFIGURATION_TAG,
    summary = "Read a shop's delivery channel settings",
    description = "The bot token is never echoed back; only its presence can be inferred \
                   from a successful resolve.",
    params(("shop_id" = String, Path, description = "Shop identifier")),
    responses(
        (status = 200, description = "The configuration, or null when none was saved yet", content_type = "application/json")
    )
)]
async fn get_receiver_config(
    Extension(resources): Extension<AppResources>,
    Path(shop_id): Path<String>,
) -> impl IntoResponse {
    match receiver_configuration::Entity::find_by_id(&shop_id)
        .one(resources.db.as_ref())
        .await
    {
        Ok(config) => (StatusCode::OK, Json(json!({"configuration": config}))),
        Err(e) => db_error_response("api.get_receiver_config.db_query_failed", &shop_id, e),
    }
}

#[tracing::instrument(skip(resources, payload))]
#[utoipa::path(
    put,
    path = "/{shop_id}/receiver-config",
    operation_id = "Save Receiver Configuration",
    tag = CONFIGURATION_TAG,
    summary = "Create or replace a shop's delivery channel settings",
    params(("shop_id" = String, Path, description = "Shop identifier")),
    request_body(content = ReceiverConfigUpdate, description = "Channel selection and credentials"),
    responses(
        (status = 200, description = "Saved configuration", content_type = "application/json"),
        (status = 400, description = "Unknown receiver platform name", content_type = "application/json"),
        (status = 500, description = "Internal server error", content_type = "application/json")
    )
)]
async fn upsert_receiver_config(
    Extension(resources): Extension<AppResources>,
    Path(shop_id): Path<String>,
    Json(payload): Json<ReceiverConfigUpdate>,
) -> impl IntoResponse {
    let platform = match payload.receiver_platform.as_deref() {
        Some(name) => match ChannelKind::parse(name) {
            Some(kind) => Some(kind),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": format!("Unknown receiver platform '{name}'")})),
                );
            }
        },
        None => None,
    };

    let exists = match receiver_configuration::Entity::find_by_id(&shop_id)
        .one(resources.db.as_ref())
        .await
    {
        Ok(existing) => existing.is_some(),
        Err(e) => {
            return db_error_response("api.upsert_receiver_config.db_query_failed", &shop_id, e);
        }
    };

    let active = receiver_configuration::ActiveModel {
        shop_id: Set(shop_id.clone()),
        receiver_platform: Set(platform.map(|kind| kind.as_str().to_string())),
        // Kept in sync so rows stay readable by pre-platform-column readers.
        is_telegram_enabled: Set(platform == Some(ChannelKind::Telegram)),
        telegram_bot_token: Set(payload
            .telegram_bot_token
            .filter(|token| !token.trim().is_empty())),
        telegram_receiver_chat_ids: Set(payload
            .telegram_receiver_chat_ids
            .filter(|ids| !ids.trim().is_empty())),
    };

    let saved = if exists {
        active.update(resources.db.as_ref()).await
    } else {
        active.insert(resources.db.as_ref()).await
    };

    match saved {
        Ok(config) => (StatusCode::OK, Json(json!({"configuration": config}))),
        Err(e) => db_error_response("api.upsert_receiver_config.db_write_failed", &shop_id, e),
    }
}

fn db_error_response(
    event_name: &'static str,
    shop_id: &str,
    error: sea_orm::DbErr,
) -> (StatusCode, Json<serde_json::Value>) {
    tracing::error!(
        name = event_name,
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        error = ?error,
        shop_id = %shop_id,
        message = "Configuration storage operation failed"
    );
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": format!("DB error: {error}")})),
    )
}
