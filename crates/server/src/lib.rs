//! A Shopify merchant notification service.
//!
//! Receives store events, filters them against per-shop configuration,
//! renders a human-readable message and delivers it to the configured
//! messaging channel (Telegram), recording the outcome for later inspection
//! and manual resend.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::dispatch::Dispatcher;

pub mod api;
pub mod config;
pub mod dispatch;
pub mod entity;
pub mod error;
pub mod event;
pub mod gate;
pub mod publisher;
pub mod store;
pub mod template;

#[derive(Clone, Debug)]
pub struct AppResources {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
    pub dispatcher: Arc<Dispatcher>,
}
