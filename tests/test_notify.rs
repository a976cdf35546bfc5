//! Webhook message building and admin response parsing.

use elysian_shop::error::ShopError;
use elysian_shop::models::{CancelRequest, CancelResponse, FeedbackReport, SendMessage, TeamApplication};
use elysian_shop::notify::MISSING_FIELDS_MESSAGE;
use elysian_shop::ShopClient;
use serde_json::json;

fn report() -> FeedbackReport {
    FeedbackReport {
        player_nick: "  Steve  ".to_string(),
        reason: "Баг".to_string(),
        contact_method: "Discord".to_string(),
        contact_info: "steve#0001".to_string(),
        message: "<b>сломалось</b> & всё".to_string(),
    }
}

// ---------------------------------------------------------------------------
// FeedbackReport
// ---------------------------------------------------------------------------

#[test]
fn feedback_html_escapes_user_fields() {
    let html = report().trimmed().to_html();
    assert!(html.starts_with("🎮 <b>Новое обращение с сайта ElysianLink</b>"));
    assert!(html.contains("<b>Игровой ник:</b> Steve\n"));
    assert!(html.contains("<b>Связь:</b> Discord - steve#0001"));
    assert!(html.contains("&lt;b&gt;сломалось&lt;/b&gt; &amp; всё"));
    assert!(!html.contains("<b>сломалось"));
}

#[test]
fn feedback_requires_every_field() {
    let mut incomplete = report();
    incomplete.message = "   ".to_string();
    let err = incomplete.trimmed().validate().unwrap_err();
    match err {
        ShopError::Validation(msg) => assert_eq!(msg, MISSING_FIELDS_MESSAGE),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(report().trimmed().validate().is_ok());
}

// ---------------------------------------------------------------------------
// TeamApplication
// ---------------------------------------------------------------------------

#[test]
fn team_application_html_and_validation() {
    let application = TeamApplication {
        player_nick: "Alex".to_string(),
        age: "19".to_string(),
        position: "Модератор".to_string(),
        experience: "2 года".to_string(),
        contact: "@alex".to_string(),
        about: "Люблю \"порядок\"".to_string(),
    };
    let html = application.to_html();
    assert!(html.contains("<b>Должность:</b> Модератор"));
    assert!(html.contains("Люблю &quot;порядок&quot;"));
    assert!(application.validate().is_ok());

    let empty = TeamApplication::default();
    assert!(matches!(empty.validate(), Err(ShopError::Validation(_))));
}

#[test]
fn send_message_body_uses_html_parse_mode() {
    let body = serde_json::to_value(SendMessage::html("-100", "hi")).unwrap();
    assert_eq!(body, json!({"chat_id": "-100", "text": "hi", "parse_mode": "HTML"}));
}

#[test]
fn sending_without_telegram_config_is_rejected_before_network() {
    let shop = ShopClient::builder().build().unwrap();
    let err = shop.notify().send_feedback(&report()).unwrap_err();
    assert!(matches!(err, ShopError::InvalidArgument(_)));
}

#[test]
fn invalid_feedback_is_rejected_before_network() {
    let shop = ShopClient::builder().telegram("token", "-100").build().unwrap();
    let err = shop.notify().send_feedback(&FeedbackReport::default()).unwrap_err();
    assert!(matches!(err, ShopError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Cancel / refund
// ---------------------------------------------------------------------------

#[test]
fn cancel_response_accepts_either_casing() {
    let lower: CancelResponse =
        serde_json::from_value(json!({"success": true, "status": "CANCELED", "message": "ok"})).unwrap();
    let upper: CancelResponse =
        serde_json::from_value(json!({"Success": true, "Status": "CANCELED", "Message": "ok"})).unwrap();
    assert_eq!(lower, upper);
    assert!(upper.success);
    assert_eq!(upper.status.as_deref(), Some("CANCELED"));
}

#[test]
fn cancel_request_wire_names() {
    let body = serde_json::to_value(CancelRequest {
        payment_id: "pay-1".to_string(),
        amount: 500.0,
        email: "p@x.io".to_string(),
        items: Vec::new(),
    })
    .unwrap();
    assert_eq!(body["paymentId"], "pay-1");
    assert_eq!(body["email"], "p@x.io");
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[test]
fn cancel_validates_arguments_before_network() {
    let shop = ShopClient::builder().build().unwrap();
    let bad = CancelRequest {
        payment_id: " ".to_string(),
        amount: 10.0,
        email: "p@x.io".to_string(),
        items: Vec::new(),
    };
    assert!(matches!(
        shop.admin().cancel_payment(&bad),
        Err(ShopError::InvalidArgument(_))
    ));

    let negative = CancelRequest {
        payment_id: "pay-1".to_string(),
        amount: -5.0,
        ..bad
    };
    assert!(matches!(
        shop.admin().cancel_payment(&negative),
        Err(ShopError::InvalidArgument(_))
    ));
}
