//! HTTP handler tests for the API endpoints.
//!
//! Drives the real router in-process with a mock Telegram API behind it.

use axum_test::TestServer;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbBackend, EntityTrait, Statement};
use serde_json::{Value, json};
use shop_alert_notifier::AppResources;
use shop_alert_notifier::api::build_router;
use shop_alert_notifier::config::{AppConfig, TelegramConfig};
use shop_alert_notifier::dispatch::Dispatcher;
use shop_alert_notifier::entity::receiver_configuration;
use std::sync::Arc;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SHOP: &str = "acme.myshopify.com";

/// Create a test database connection with all three tables.
async fn create_test_db() -> Arc<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await.expect("connect");

    db.execute(Statement::from_string(
        DbBackend::Sqlite,
        r#"CREATE TABLE alert_configuration (
            shop_id TEXT PRIMARY KEY,
            products_create BOOLEAN NOT NULL DEFAULT 0,
            products_update BOOLEAN NOT NULL DEFAULT 0,
            products_delete BOOLEAN NOT NULL DEFAULT 0,
            orders_paid BOOLEAN NOT NULL DEFAULT 0,
            customers_create BOOLEAN NOT NULL DEFAULT 0,
            customers_update BOOLEAN NOT NULL DEFAULT 0,
            customers_delete BOOLEAN NOT NULL DEFAULT 0,
            customers_redact BOOLEAN NOT NULL DEFAULT 0,
            checkouts_create BOOLEAN NOT NULL DEFAULT 0,
            checkouts_update BOOLEAN NOT NULL DEFAULT 0,
            inventory_levels_update BOOLEAN NOT NULL DEFAULT 0,
            themes_create BOOLEAN NOT NULL DEFAULT 0,
            themes_update BOOLEAN NOT NULL DEFAULT 0,
            themes_delete BOOLEAN NOT NULL DEFAULT 0,
            themes_publish BOOLEAN NOT NULL DEFAULT 0,
            shop_update BOOLEAN NOT NULL DEFAULT 0,
            system_issue BOOLEAN NOT NULL DEFAULT 0
        );"#,
    ))
    .await
    .expect("create alert_configuration table");

    db.execute(Statement::from_string(
        DbBackend::Sqlite,
        r#"CREATE TABLE receiver_configuration (
            shop_id TEXT PRIMARY KEY,
            is_telegram_enabled BOOLEAN NOT NULL DEFAULT 0,
            telegram_bot_token TEXT NULL,
            telegram_receiver_chat_ids TEXT NULL,
            receiver_platform TEXT NULL
        );"#,
    ))
    .await
    .expect("create receiver_configuration table");

    db.execute(Statement::from_string(
        DbBackend::Sqlite,
        r#"CREATE TABLE alert_message (
            id TEXT PRIMARY KEY,
            shop_id TEXT NOT NULL,
            alert_type TEXT NOT NULL,
            message TEXT NOT NULL,
            status TEXT NOT NULL,
            error_message TEXT NULL,
            created_at TEXT NOT NULL
        );"#,
    ))
    .await
    .expect("create alert_message table");

    Arc::new(db)
}

async fn test_server(db: Arc<DatabaseConnection>, telegram: &MockServer) -> TestServer {
    let config = Arc::new(AppConfig {
        database_url: "sqlite::memory:".to_string(),
        listen_addr: "127.0.0.1:0".to_string(),
        telegram: TelegramConfig {
            api_base_url: telegram.uri(),
            request_timeout_secs: 5,
        },
    });
    let dispatcher = Arc::new(Dispatcher::new(db.clone(), &config));
    let resources = AppResources {
        db,
        config,
        dispatcher,
    };
    TestServer::new(build_router(resources)).expect("test server")
}

async fn mock_any_chat_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path_regex(r"^/bot.*/sendMessage$"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})),
        )
        .mount(server)
        .await;
}

/// Flip one flag on via the configuration API; everything else stays off.
async fn save_configs_via_api(server: &TestServer) {
    let response = server
        .put(&format!("/api/shops/{SHOP}/alert-config"))
        .json(&json!({"products_create": true}))
        .await;
    response.assert_status_ok();

    let response = server
        .put(&format!("/api/shops/{SHOP}/receiver-config"))
        .json(&json!({
            "receiver_platform": "telegram",
            "telegram_bot_token": "123456:test-token",
            "telegram_receiver_chat_ids": "111,222"
        }))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn health_endpoint_responds_ok() {
    let telegram = MockServer::start().await;
    let server = test_server(create_test_db().await, &telegram).await;

    let response = server.get("/healthz").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "ok");
}

#[tokio::test]
async fn alert_config_round_trips_through_the_api() {
    let telegram = MockServer::start().await;
    let server = test_server(create_test_db().await, &telegram).await;

    let response = server
        .put(&format!("/api/shops/{SHOP}/alert-config"))
        .json(&json!({"products_create": true, "orders_paid": true}))
        .await;
    response.assert_status_ok();

    let response = server.get(&format!("/api/shops/{SHOP}/alert-config")).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["configuration"]["products_create"], true);
    assert_eq!(body["configuration"]["orders_paid"], true);
    assert_eq!(body["configuration"]["products_delete"], false);
}

#[tokio::test]
async fn receiver_config_save_keeps_the_legacy_flag_coherent_and_hides_the_token() {
    let telegram = MockServer::start().await;
    let db = create_test_db().await;
    let server = test_server(db.clone(), &telegram).await;

    let response = server
        .put(&format!("/api/shops/{SHOP}/receiver-config"))
        .json(&json!({
            "receiver_platform": "telegram",
            "telegram_bot_token": "123456:test-token",
            "telegram_receiver_chat_ids": "111"
        }))
        .await;
    response.assert_status_ok();
    // The token is write-only.
    assert!(!response.text().contains("123456:test-token"));

    let row = receiver_configuration::Entity::find_by_id(SHOP)
        .one(db.as_ref())
        .await
        .expect("query")
        .expect("row saved");
    assert!(row.is_telegram_enabled);
    assert_eq!(row.receiver_platform.as_deref(), Some("telegram"));
    assert_eq!(row.telegram_bot_token.as_deref(), Some("123456:test-token"));
}

#[tokio::test]
async fn unknown_receiver_platform_names_are_rejected() {
    let telegram = MockServer::start().await;
    let server = test_server(create_test_db().await, &telegram).await;

    let response = server
        .put(&format!("/api/shops/{SHOP}/receiver-config"))
        .json(&json!({"receiver_platform": "carrier-pigeon"}))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn manual_alert_dispatches_and_shows_up_in_the_history() {
    let telegram = MockServer::start().await;
    mock_any_chat_ok(&telegram).await;
    let server = test_server(create_test_db().await, &telegram).await;
    save_configs_via_api(&server).await;

    let response = server
        .post("/api/alerts")
        .json(&json!({
            "shop_id": SHOP,
            "alert_type": "PRODUCTS_CREATE",
            "message": "manual test message"
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "sent");
    assert_eq!(body["alert"]["status"], "success");

    let response = server
        .get("/api/alerts")
        .add_query_param("shop_id", SHOP)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["alerts"][0]["message"], "manual test message");
}

#[tokio::test]
async fn manual_alert_for_an_unconfigured_shop_reports_a_skip() {
    let telegram = MockServer::start().await;
    let server = test_server(create_test_db().await, &telegram).await;

    let response = server
        .post("/api/alerts")
        .json(&json!({
            "shop_id": "ghost.myshopify.com",
            "alert_type": "PRODUCTS_CREATE"
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "skipped");
    assert_eq!(body["reason"], "alert_disabled");
}

#[tokio::test]
async fn resend_of_an_unknown_id_returns_not_found() {
    let telegram = MockServer::start().await;
    let server = test_server(create_test_db().await, &telegram).await;

    let response = server.post("/api/alerts/does-not-exist/resend").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn webhook_intake_always_acknowledges() {
    let telegram = MockServer::start().await;
    let server = test_server(create_test_db().await, &telegram).await;

    // Unknown topic: dropped, still a 200.
    let response = server
        .post("/api/webhooks")
        .json(&json!({
            "shop_id": SHOP,
            "event_topic": "fulfillments/create",
            "payload": {}
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "skipped");
    assert_eq!(body["reason"], "unknown_topic");
}

#[tokio::test]
async fn webhook_intake_dispatches_configured_events() {
    let telegram = MockServer::start().await;
    mock_any_chat_ok(&telegram).await;
    let server = test_server(create_test_db().await, &telegram).await;
    save_configs_via_api(&server).await;

    let response = server
        .post("/api/webhooks")
        .json(&json!({
            "shop_id": SHOP,
            "event_topic": "products/create",
            "payload": {"title": "Widget"}
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "sent");

    // Both configured chats were hit.
    let requests = telegram.received_requests().await.expect("requests");
    assert_eq!(requests.len(), 2);
}
