//! Canonical event taxonomy.
//!
//! Shopify spells the same topic two ways ("PRODUCTS_CREATE" in the admin
//! API, "products/create" on the wire). Both normalize to one variant here,
//! and everything downstream (gating, templating, persistence) works on the
//! enum rather than raw strings.

use crate::template::TemplateContext;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    ProductsCreate,
    ProductsUpdate,
    ProductsDelete,
    OrdersPaid,
    CustomersCreate,
    CustomersUpdate,
    CustomersDelete,
    CustomersRedact,
    CheckoutsCreate,
    CheckoutsUpdate,
    InventoryLevelsUpdate,
    ThemesCreate,
    ThemesUpdate,
    ThemesDelete,
    ThemesPublish,
    ShopUpdate,
    SystemIssue,
    /// A topic outside the known mapping. Kept verbatim (normalized) for
    /// logging and persistence; gates to disabled and renders the generic
    /// template.
    Other(String),
}

impl EventType {
    /// Parse a webhook topic, accepting both spellings.
    pub fn from_topic(topic: &str) -> Self {
        let normalized = topic.trim().to_ascii_uppercase().replace(['/', '.'], "_");
        match normalized.as_str() {
            "PRODUCTS_CREATE" => Self::ProductsCreate,
            "PRODUCTS_UPDATE" => Self::ProductsUpdate,
            "PRODUCTS_DELETE" => Self::ProductsDelete,
            "ORDERS_PAID" => Self::OrdersPaid,
            "CUSTOMERS_CREATE" => Self::CustomersCreate,
            "CUSTOMERS_UPDATE" => Self::CustomersUpdate,
            "CUSTOMERS_DELETE" => Self::CustomersDelete,
            "CUSTOMERS_REDACT" => Self::CustomersRedact,
            "CHECKOUTS_CREATE" => Self::CheckoutsCreate,
            "CHECKOUTS_UPDATE" => Self::CheckoutsUpdate,
            "INVENTORY_LEVELS_UPDATE" => Self::InventoryLevelsUpdate,
            "THEMES_CREATE" => Self::ThemesCreate,
            "THEMES_UPDATE" => Self::ThemesUpdate,
            "THEMES_DELETE" => Self::ThemesDelete,
            "THEMES_PUBLISH" => Self::ThemesPublish,
            "SHOP_UPDATE" => Self::ShopUpdate,
            "SYSTEM_ISSUE" => Self::SystemIssue,
            _ => Self::Other(normalized),
        }
    }

    /// Stable topic string stored in the database and exposed in the API.
    pub fn as_topic(&self) -> &str {
        match self {
            Self::ProductsCreate => "PRODUCTS_CREATE",
            Self::ProductsUpdate => "PRODUCTS_UPDATE",
            Self::ProductsDelete => "PRODUCTS_DELETE",
            Self::OrdersPaid => "ORDERS_PAID",
            Self::CustomersCreate => "CUSTOMERS_CREATE",
            Self::CustomersUpdate => "CUSTOMERS_UPDATE",
            Self::CustomersDelete => "CUSTOMERS_DELETE",
            Self::CustomersRedact => "CUSTOMERS_REDACT",
            Self::CheckoutsCreate => "CHECKOUTS_CREATE",
            Self::CheckoutsUpdate => "CHECKOUTS_UPDATE",
            Self::InventoryLevelsUpdate => "INVENTORY_LEVELS_UPDATE",
            Self::ThemesCreate => "THEMES_CREATE",
            Self::ThemesUpdate => "THEMES_UPDATE",
            Self::ThemesDelete => "THEMES_DELETE",
            Self::ThemesPublish => "THEMES_PUBLISH",
            Self::ShopUpdate => "SHOP_UPDATE",
            Self::SystemIssue => "SYSTEM_ISSUE",
            Self::Other(tag) => tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_topic())
    }
}

/// Shop display name: the myshopify subdomain without the platform suffix.
pub fn shop_display_name(shop_id: &str) -> String {
    shop_id
        .trim_end_matches(".myshopify.com")
        .trim_end_matches('/')
        .to_string()
}

/// Pull the template fields relevant to `event` out of a webhook payload.
///
/// Missing or mistyped fields are omitted from the context; a malformed
/// payload never fails the dispatch.
pub fn payload_context(event: &EventType, shop_id: &str, payload: &Value) -> TemplateContext {
    let mut ctx = TemplateContext {
        shop_name: Some(shop_display_name(shop_id)),
        ..TemplateContext::default()
    };

    match event {
        EventType::ProductsCreate | EventType::ProductsUpdate => {
            ctx.product_title = str_field(payload, "title");
            if let Some(id) = id_field(payload, "id") {
                ctx.product_url = Some(format!("https://{shop_id}/admin/products/{id}"));
            }
        }
        EventType::ProductsDelete => {
            ctx.product_title = str_field(payload, "title");
        }
        EventType::OrdersPaid | EventType::CheckoutsCreate | EventType::CheckoutsUpdate => {
            ctx.order_id = str_field(payload, "name").or_else(|| id_field(payload, "id"));
        }
        EventType::CustomersCreate
        | EventType::CustomersUpdate
        | EventType::CustomersDelete
        | EventType::CustomersRedact => {
            ctx.customer_name = full_name(payload);
            ctx.customer_email = str_field(payload, "email");
        }
        EventType::ThemesCreate
        | EventType::ThemesUpdate
        | EventType::ThemesDelete
        | EventType::ThemesPublish => {
            if let Some(name) = str_field(payload, "name") {
                ctx.additional_info = Some(format!("Theme: {name}"));
            }
        }
        EventType::SystemIssue => {
            ctx.error_message = str_field(payload, "error").or_else(|| str_field(payload, "message"));
        }
        EventType::InventoryLevelsUpdate | EventType::ShopUpdate | EventType::Other(_) => {}
    }

    ctx
}

fn str_field(payload: &Value, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Accept numeric and string ids; Shopify webhook payloads use both.
fn id_field(payload: &Value, key: &str) -> Option<String> {
    match payload.get(key) {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn full_name(payload: &Value) -> Option<String> {
    match (str_field(payload, "first_name"), str_field(payload, "last_name")) {
        (Some(first), Some(last)) => Some(format!("{first} {last}")),
        (Some(first), None) => Some(first),
        (None, Some(last)) => Some(last),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn topic_parsing_accepts_both_spellings() {
        assert_eq!(
            EventType::from_topic("PRODUCTS_CREATE"),
            EventType::ProductsCreate
        );
        assert_eq!(
            EventType::from_topic("products/create"),
            EventType::ProductsCreate
        );
        assert_eq!(EventType::from_topic("orders/paid"), EventType::OrdersPaid);
    }

    #[test]
    fn unknown_topic_is_preserved() {
        let event = EventType::from_topic("fulfillments/create");
        assert_eq!(event, EventType::Other("FULFILLMENTS_CREATE".to_string()));
        assert_eq!(event.as_topic(), "FULFILLMENTS_CREATE");
        assert!(!event.is_known());
    }

    #[test]
    fn topic_round_trips() {
        for topic in ["PRODUCTS_DELETE", "CUSTOMERS_REDACT", "THEMES_PUBLISH"] {
            assert_eq!(EventType::from_topic(topic).as_topic(), topic);
        }
    }

    #[test]
    fn shop_display_name_strips_platform_suffix() {
        assert_eq!(shop_display_name("acme.myshopify.com"), "acme");
        assert_eq!(shop_display_name("plain-shop"), "plain-shop");
    }

    #[test]
    fn product_context_from_payload() {
        let payload = json!({"id": 632910392, "title": "Widget"});
        let ctx = payload_context(&EventType::ProductsCreate, "acme.myshopify.com", &payload);
        assert_eq!(ctx.shop_name.as_deref(), Some("acme"));
        assert_eq!(ctx.product_title.as_deref(), Some("Widget"));
        assert_eq!(
            ctx.product_url.as_deref(),
            Some("https://acme.myshopify.com/admin/products/632910392")
        );
    }

    #[test]
    fn malformed_payload_degrades_to_empty_fields() {
        let payload = json!({"title": 42, "id": null});
        let ctx = payload_context(&EventType::ProductsCreate, "acme.myshopify.com", &payload);
        assert!(ctx.product_title.is_none());
        assert!(ctx.product_url.is_none());
    }

    #[test]
    fn customer_name_joins_present_parts() {
        let payload = json!({"first_name": "Ada", "email": "ada@example.com"});
        let ctx = payload_context(&EventType::CustomersCreate, "acme.myshopify.com", &payload);
        assert_eq!(ctx.customer_name.as_deref(), Some("Ada"));
        assert_eq!(ctx.customer_email.as_deref(), Some("ada@example.com"));
    }
}
