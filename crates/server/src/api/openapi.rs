//! OpenAPI/Utoipa configuration.

use crate::api::{
    alerts::ALERTS_TAG, configuration::CONFIGURATION_TAG, health::MISC_TAG, webhooks::WEBHOOKS_TAG,
};
use utoipa::OpenApi;

/// OpenAPI documentation configuration.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shop Alert Notifier API",
        version = "1.0.0",
        description = "API for dispatching Shopify store event notifications to messaging channels."
    ),
    tags(
        (name = MISC_TAG, description = "Miscellaneous endpoints"),
        (name = WEBHOOKS_TAG, description = "Inbound store event intake"),
        (name = ALERTS_TAG, description = "Manual alert trigger, resend and history"),
        (name = CONFIGURATION_TAG, description = "Per-shop notification settings")
    )
)]
pub struct ApiDoc;
