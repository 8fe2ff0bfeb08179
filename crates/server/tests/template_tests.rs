//! Tests for the message template engine.

use shop_alert_notifier::event::EventType;
use shop_alert_notifier::template::{MESSAGE_MARKER, TemplateContext, TemplateEngine};
use time::macros::datetime;

fn all_known_events() -> Vec<EventType> {
    vec![
        EventType::ProductsCreate,
        EventType::ProductsUpdate,
        EventType::ProductsDelete,
        EventType::OrdersPaid,
        EventType::CustomersCreate,
        EventType::CustomersUpdate,
        EventType::CustomersDelete,
        EventType::CustomersRedact,
        EventType::CheckoutsCreate,
        EventType::CheckoutsUpdate,
        EventType::InventoryLevelsUpdate,
        EventType::ThemesCreate,
        EventType::ThemesUpdate,
        EventType::ThemesDelete,
        EventType::ThemesPublish,
        EventType::ShopUpdate,
        EventType::SystemIssue,
    ]
}

#[test]
fn empty_context_never_leaves_placeholder_artifacts() {
    let engine = TemplateEngine::new();
    let ctx = TemplateContext::default();

    for event in all_known_events() {
        let message = engine.render(&event, &ctx);
        assert!(
            message.starts_with(MESSAGE_MARKER),
            "{event}: missing marker in {message:?}"
        );
        assert!(message.contains("<i>Time: "), "{event}: missing timestamp");
        // No leftover interpolation syntax or stringified options.
        assert!(!message.contains("{{"), "{event}: {message:?}");
        assert!(!message.contains("Some("), "{event}: {message:?}");
        assert!(!message.contains("None"), "{event}: {message:?}");
        assert!(!message.contains("\"\""), "{event}: {message:?}");
    }
}

#[test]
fn unknown_event_renders_the_generic_template() {
    let engine = TemplateEngine::new();
    let ctx = TemplateContext {
        shop_name: Some("acme".to_string()),
        ..TemplateContext::default()
    };

    let message = engine.render(&EventType::Other("FULFILLMENTS_CREATE".to_string()), &ctx);
    assert!(message.contains("<b>Alert Notification</b>"));
    assert!(message.contains("An alert has been triggered for your shop \"acme\"."));
}

#[test]
fn product_created_interpolates_title_and_shop() {
    let engine = TemplateEngine::new();
    let ctx = TemplateContext {
        shop_name: Some("acme".to_string()),
        product_title: Some("Widget".to_string()),
        ..TemplateContext::default()
    };

    let message = engine.render(&EventType::ProductsCreate, &ctx);
    assert!(message.contains("<b>New Product Created</b>"));
    assert!(message.contains("<b>\"Widget\"</b>"));
    assert!(message.contains("in shop \"acme\""));
}

#[test]
fn render_at_is_deterministic_for_a_fixed_clock() {
    let engine = TemplateEngine::new();
    let ctx = TemplateContext {
        shop_name: Some("acme".to_string()),
        order_id: Some("#1001".to_string()),
        ..TemplateContext::default()
    };
    let now = datetime!(2026-01-15 09:30:00 UTC);

    let first = engine.render_at(&EventType::OrdersPaid, &ctx, now);
    let second = engine.render_at(&EventType::OrdersPaid, &ctx, now);
    assert_eq!(first, second);
    assert!(first.contains("<i>Time: 2026-01-15 09:30:00 UTC</i>"));
    assert!(first.contains("Order <b>#1001</b> has been paid at \"acme\"."));
}

#[test]
fn link_line_appears_only_when_a_url_is_present() {
    let engine = TemplateEngine::new();
    let without_url = engine.render(&EventType::ProductsUpdate, &TemplateContext::default());
    assert!(!without_url.contains("<a href="));

    let ctx = TemplateContext {
        product_url: Some("https://acme.myshopify.com/admin/products/1".to_string()),
        ..TemplateContext::default()
    };
    let with_url = engine.render(&EventType::ProductsUpdate, &ctx);
    assert!(
        with_url.contains("<a href=\"https://acme.myshopify.com/admin/products/1\">View in shop admin</a>")
    );
}

#[test]
fn additional_info_block_is_optional() {
    let engine = TemplateEngine::new();
    let ctx = TemplateContext {
        additional_info: Some("Theme: Dawn".to_string()),
        ..TemplateContext::default()
    };

    let message = engine.render(&EventType::ThemesPublish, &ctx);
    assert!(message.contains("<b>Additional Information:</b>\nTheme: Dawn"));

    let bare = engine.render(&EventType::ThemesPublish, &TemplateContext::default());
    assert!(!bare.contains("Additional Information"));
}

#[test]
fn system_issue_includes_error_details_when_present() {
    let engine = TemplateEngine::new();
    let ctx = TemplateContext {
        shop_name: Some("acme".to_string()),
        error_message: Some("webhook registration failed".to_string()),
        ..TemplateContext::default()
    };

    let message = engine.render(&EventType::SystemIssue, &ctx);
    assert!(message.contains("<b>System Issue Detected</b>"));
    assert!(message.contains("<b>Error details:</b>\nwebhook registration failed"));
}

#[test]
fn customer_registration_includes_name_and_email() {
    let engine = TemplateEngine::new();
    let ctx = TemplateContext {
        shop_name: Some("acme".to_string()),
        customer_name: Some("Ada Lovelace".to_string()),
        customer_email: Some("ada@example.com".to_string()),
        ..TemplateContext::default()
    };

    let message = engine.render(&EventType::CustomersCreate, &ctx);
    assert!(message.contains("<b>Ada Lovelace</b>"));
    assert!(message.contains("(ada@example.com)"));
    assert!(message.contains("has registered at \"acme\""));
}
