//! Message templating for alert notifications.
//!
//! Renders Telegram-flavoured HTML: a bolded title line, a body sentence
//! interpolating whichever context fields are present, an optional link
//! line, an optional additional-info block and a trailing timestamp line.
//! Rendering never fails; absent data just shortens the prose.

use crate::event::EventType;
use time::OffsetDateTime;
use time::macros::format_description;

/// Leading marker of every templated message. The publisher uses it to tell
/// pre-rendered messages apart from raw operator text.
pub const MESSAGE_MARKER: &str = "\u{1F514}"; // 🔔

/// Optional context fields for a rendered message. Anything left `None` is
/// omitted from the output without placeholder artifacts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateContext {
    pub shop_name: Option<String>,
    pub product_title: Option<String>,
    pub product_url: Option<String>,
    pub order_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub error_message: Option<String>,
    pub additional_info: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateEngine;

impl TemplateEngine {
    pub fn new() -> Self {
        Self
    }

    /// Render with the current wall clock.
    pub fn render(&self, event: &EventType, ctx: &TemplateContext) -> String {
        self.render_at(event, ctx, OffsetDateTime::now_utc())
    }

    /// Deterministic core: render with an explicit timestamp.
    pub fn render_at(&self, event: &EventType, ctx: &TemplateContext, now: OffsetDateTime) -> String {
        let (title, body) = match event {
            EventType::ProductsCreate => (
                "New Product Created",
                format!(
                    "A new product{} has been created{}.",
                    quoted(ctx.product_title.as_deref()),
                    shop_clause(ctx, "in shop")
                ),
            ),
            EventType::ProductsUpdate => (
                "Product Updated",
                format!(
                    "A product{} has been updated{}.",
                    quoted(ctx.product_title.as_deref()),
                    shop_clause(ctx, "in shop")
                ),
            ),
            EventType::ProductsDelete => (
                "Product Deleted",
                format!(
                    "A product{} has been deleted{}.",
                    quoted(ctx.product_title.as_deref()),
                    shop_clause(ctx, "from shop")
                ),
            ),
            EventType::OrdersPaid => (
                "Order Paid",
                format!(
                    "Order{} has been paid{}.",
                    bolded(ctx.order_id.as_deref()),
                    shop_clause(ctx, "at")
                ),
            ),
            EventType::CustomersCreate => (
                "New Customer Registered",
                format!(
                    "A new customer{}{} has registered{}.",
                    bolded(ctx.customer_name.as_deref()),
                    parenthesized(ctx.customer_email.as_deref()),
                    shop_clause(ctx, "at")
                ),
            ),
            EventType::CustomersUpdate => (
                "Customer Updated",
                format!(
                    "Customer{} has been updated{}.",
                    bolded(ctx.customer_name.as_deref()),
                    shop_clause(ctx, "at")
                ),
            ),
            EventType::CustomersDelete => (
                "Customer Deleted",
                format!(
                    "Customer{} has been deleted{}.",
                    bolded(ctx.customer_name.as_deref()),
                    shop_clause(ctx, "from")
                ),
            ),
            EventType::CustomersRedact => (
                "Customer Data Redacted",
                format!(
                    "Customer data{} has been redacted{}.",
                    bolded(ctx.customer_name.as_deref()),
                    shop_clause(ctx, "for")
                ),
            ),
            EventType::CheckoutsCreate => (
                "Checkout Started",
                format!(
                    "A new checkout{} has been started{}.",
                    bolded(ctx.order_id.as_deref()),
                    shop_clause(ctx, "at")
                ),
            ),
            EventType::CheckoutsUpdate => (
                "Checkout Updated",
                format!(
                    "A checkout{} has been updated{}.",
                    bolded(ctx.order_id.as_deref()),
                    shop_clause(ctx, "at")
                ),
            ),
            EventType::InventoryLevelsUpdate => (
                "Inventory Updated",
                format!(
                    "Inventory levels have been updated{}.",
                    shop_clause(ctx, "in shop")
                ),
            ),
            EventType::ThemesCreate => (
                "Theme Created",
                format!("A theme has been created{}.", shop_clause(ctx, "in shop")),
            ),
            EventType::ThemesUpdate => (
                "Theme Updated",
                format!("A theme has been updated{}.", shop_clause(ctx, "in shop")),
            ),
            EventType::ThemesDelete => (
                "Theme Deleted",
                format!("A theme has been deleted{}.", shop_clause(ctx, "from shop")),
            ),
            EventType::ThemesPublish => (
                "Theme Published",
                format!("A theme has been published{}.", shop_clause(ctx, "in shop")),
            ),
            EventType::ShopUpdate => (
                "Shop Settings Updated",
                format!("Shop settings have been updated{}.", shop_clause(ctx, "for")),
            ),
            EventType::SystemIssue => (
                "System Issue Detected",
                match ctx.error_message.as_deref() {
                    Some(err) => format!(
                        "A system issue has been detected{}.\n\n<b>Error details:</b>\n{err}",
                        shop_clause(ctx, "for")
                    ),
                    None => format!(
                        "A system issue has been detected{}.",
                        shop_clause(ctx, "for")
                    ),
                },
            ),
            EventType::Other(_) => (
                "Alert Notification",
                format!(
                    "An alert has been triggered for your shop{}.",
                    quoted_plain(ctx.shop_name.as_deref())
                ),
            ),
        };

        let mut sections = vec![format!("{MESSAGE_MARKER} <b>{title}</b>"), body];
        if let Some(url) = ctx.product_url.as_deref() {
            sections.push(format!("<a href=\"{url}\">View in shop admin</a>"));
        }
        if let Some(info) = ctx.additional_info.as_deref() {
            sections.push(format!("<b>Additional Information:</b>\n{info}"));
        }
        sections.push(format!("<i>Time: {}</i>", format_timestamp(now)));
        sections.join("\n\n")
    }
}

fn format_timestamp(now: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
    now.format(&format)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

/// ` <b>"Widget"</b>` or "".
fn quoted(value: Option<&str>) -> String {
    value
        .map(|v| format!(" <b>\"{v}\"</b>"))
        .unwrap_or_default()
}

/// ` <b>#1001</b>` or "".
fn bolded(value: Option<&str>) -> String {
    value.map(|v| format!(" <b>{v}</b>")).unwrap_or_default()
}

/// ` (ada@example.com)` or "".
fn parenthesized(value: Option<&str>) -> String {
    value.map(|v| format!(" ({v})")).unwrap_or_default()
}

/// ` "acme"` or "".
fn quoted_plain(value: Option<&str>) -> String {
    value.map(|v| format!(" \"{v}\"")).unwrap_or_default()
}

/// ` in shop "acme"` or "".
fn shop_clause(ctx: &TemplateContext, preposition: &str) -> String {
    ctx.shop_name
        .as_deref()
        .map(|s| format!(" {preposition} \"{s}\""))
        .unwrap_or_default()
}
