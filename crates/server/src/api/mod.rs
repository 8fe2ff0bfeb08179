//! API module providing the notifier's HTTP endpoints.
//!
//! Submodules:
//! - `webhooks` - Inbound store event intake (/api/webhooks)
//! - `alerts` - Manual trigger, resend and history (/api/alerts/*)
//! - `configuration` - Per-shop settings (/api/shops/*)
//! - `health` - Health check endpoint (/healthz)
//! - `openapi` - OpenAPI/Utoipa configuration

pub mod alerts;
pub mod configuration;
pub mod health;
pub mod openapi;
pub mod webhooks;

pub use alerts::ALERTS_TAG;
pub use configuration::CONFIGURATION_TAG;
pub use health::MISC_TAG;
pub use webhooks::WEBHOOKS_TAG;

use crate::AppResources;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_redoc::{Redoc, Servable};

/// Assemble the full application router. Factored out of
/// [`start_webserver`] so handler tests can drive it in-process.
pub fn build_router(resources: AppResources) -> axum::Router {
    let (router, api) = OpenApiRouter::with_openapi(openapi::ApiDoc::openapi())
        .nest("/api/webhooks", webhooks::router())
        .nest("/api/alerts", alerts::router())
        .nest("/api/shops", configuration::router())
        .routes(routes!(health::health))
        .layer(axum::Extension(resources))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .split_for_parts();

    router.merge(Redoc::with_url("/api-docs", api))
}

/// Starts the web server with all configured routes.
#[tracing::instrument(skip(resources))]
pub async fn start_webserver(resources: AppResources) -> color_eyre::Result<()> {
    let listen_addr = resources.config.listen_addr.clone();
    let router = build_router(resources);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!("Server running on {listen_addr}");
    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|e| color_eyre::Report::msg(format!("Failed to start server: {e}")))?;

    Ok(())
}
