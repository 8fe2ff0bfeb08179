//! Configuration gate: answers "should this event notify, and via which
//! channel" by reading the two per-shop settings rows.
//!
//! Both questions are fail-closed: a missing row, an event type outside the
//! flag mapping, or incomplete credentials all mean "no". The gate never
//! caches and never writes; configuration may change between in-flight
//! dispatches and the most recent read wins.

use crate::entity::{alert_configuration, receiver_configuration};
use crate::event::EventType;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use std::fmt;
use std::sync::Arc;

/// Channel names the admin UI can select. Parsing is the only place a raw
/// platform string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Telegram,
    Email,
    Slack,
}

impl ChannelKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "telegram" => Some(Self::Telegram),
            "email" => Some(Self::Email),
            "slack" => Some(Self::Slack),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Telegram => "telegram",
            Self::Email => "email",
            Self::Slack => "slack",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramCredentials {
    pub bot_token: String,
    /// Ordered, non-empty once resolved.
    pub chat_ids: Vec<String>,
}

/// A validated channel selection for one shop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedChannel {
    Telegram(TelegramCredentials),
    /// A platform the admin UI can select but no publisher implements.
    /// Dispatching to it is a hard error, unlike an unrecognized name.
    Unsupported(ChannelKind),
}

#[derive(Debug, Clone)]
pub struct ConfigGate {
    db: Arc<DatabaseConnection>,
}

impl ConfigGate {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Is this event type enabled for the shop?
    #[tracing::instrument(skip(self))]
    pub async fn is_enabled(&self, shop_id: &str, event: &EventType) -> Result<bool, DbErr> {
        let config = alert_configuration::Entity::find_by_id(shop_id)
            .one(self.db.as_ref())
            .await?;
        Ok(config
            .map(|config| enabled_flag(&config, event))
            .unwrap_or(false))
    }

    /// Resolve the shop's delivery channel, or `None` if nothing usable is
    /// configured.
    #[tracing::instrument(skip(self))]
    pub async fn resolve_channel(&self, shop_id: &str) -> Result<Option<ResolvedChannel>, DbErr> {
        let config = receiver_configuration::Entity::find_by_id(shop_id)
            .one(self.db.as_ref())
            .await?;
        Ok(config.as_ref().and_then(resolve))
    }
}

/// The versioned mapping from event type to configuration flag. Event types
/// without a flag (including every `Other` tag) are disabled.
fn enabled_flag(config: &alert_configuration::Model, event: &EventType) -> bool {
    match event {
        EventType::ProductsCreate => config.products_create,
        EventType::ProductsUpdate => config.products_update,
        EventType::ProductsDelete => config.products_delete,
        EventType::OrdersPaid => config.orders_paid,
        EventType::CustomersCreate => config.customers_create,
        EventType::CustomersUpdate => config.customers_update,
        EventType::CustomersDelete => config.customers_delete,
        EventType::CustomersRedact => config.customers_redact,
        EventType::CheckoutsCreate => config.checkouts_create,
        EventType::CheckoutsUpdate => config.checkouts_update,
        EventType::InventoryLevelsUpdate => config.inventory_levels_update,
        EventType::ThemesCreate => config.themes_create,
        EventType::ThemesUpdate => config.themes_update,
        EventType::ThemesDelete => config.themes_delete,
        EventType::ThemesPublish => config.themes_publish,
        EventType::ShopUpdate => config.shop_update,
        EventType::SystemIssue => config.system_issue,
        EventType::Other(_) => false,
    }
}

/// One normalization point for the channel selection: an explicit
/// `receiver_platform` value wins; rows from before that column existed fall
/// back to the legacy telegram boolean.
fn selected_platform(config: &receiver_configuration::Model) -> Option<ChannelKind> {
    if let Some(name) = config.receiver_platform.as_deref() {
        return ChannelKind::parse(name);
    }
    config.is_telegram_enabled.then_some(ChannelKind::Telegram)
}

fn resolve(config: &receiver_configuration::Model) -> Option<ResolvedChannel> {
    match selected_platform(config)? {
        ChannelKind::Telegram => {
            let bot_token = config
                .telegram_bot_token
                .as_deref()
                .map(str::trim)
                .filter(|token| !token.is_empty())?;
            let chat_ids = parse_chat_ids(config.telegram_receiver_chat_ids.as_deref());
            if chat_ids.is_empty() {
                return None;
            }
            Some(ResolvedChannel::Telegram(TelegramCredentials {
                bot_token: bot_token.to_string(),
                chat_ids,
            }))
        }
        other => Some(ResolvedChannel::Unsupported(other)),
    }
}

/// Split the comma-separated chat-id column, preserving order and dropping
/// blanks.
pub fn parse_chat_ids(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receiver_row() -> receiver_configuration::Model {
        receiver_configuration::Model {
            shop_id: "acme.myshopify.com".to_string(),
            is_telegram_enabled: false,
            telegram_bot_token: Some("123456:token".to_string()),
            telegram_receiver_chat_ids: Some("111,222".to_string()),
            receiver_platform: Some("telegram".to_string()),
        }
    }

    #[test]
    fn parse_chat_ids_preserves_order_and_drops_blanks() {
        assert_eq!(
            parse_chat_ids(Some(" 111, ,222,,333 ")),
            vec!["111", "222", "333"]
        );
        assert!(parse_chat_ids(Some("")).is_empty());
        assert!(parse_chat_ids(None).is_empty());
    }

    #[test]
    fn resolve_returns_telegram_credentials() {
        let resolved = resolve(&receiver_row()).expect("configured");
        let ResolvedChannel::Telegram(credentials) = resolved else {
            panic!("expected telegram channel");
        };
        assert_eq!(credentials.bot_token, "123456:token");
        assert_eq!(credentials.chat_ids, vec!["111", "222"]);
    }

    #[test]
    fn resolve_fails_closed_on_empty_credentials() {
        let mut row = receiver_row();
        row.telegram_bot_token = Some("   ".to_string());
        assert_eq!(resolve(&row), None);

        let mut row = receiver_row();
        row.telegram_receiver_chat_ids = Some(" , ".to_string());
        assert_eq!(resolve(&row), None);

        let mut row = receiver_row();
        row.telegram_bot_token = None;
        assert_eq!(resolve(&row), None);
    }

    #[test]
    fn resolve_ignores_unrecognized_platform_names() {
        let mut row = receiver_row();
        row.receiver_platform = Some("carrier-pigeon".to_string());
        assert_eq!(resolve(&row), None);
    }

    #[test]
    fn resolve_flags_selectable_but_unimplemented_platforms() {
        let mut row = receiver_row();
        row.receiver_platform = Some("slack".to_string());
        assert_eq!(
            resolve(&row),
            Some(ResolvedChannel::Unsupported(ChannelKind::Slack))
        );
    }

    #[test]
    fn legacy_boolean_selects_telegram_when_platform_is_unset() {
        let mut row = receiver_row();
        row.receiver_platform = None;
        row.is_telegram_enabled = true;
        assert!(matches!(
            resolve(&row),
            Some(ResolvedChannel::Telegram(_))
        ));

        row.is_telegram_enabled = false;
        assert_eq!(resolve(&row), None);
    }
}
