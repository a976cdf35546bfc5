//! Async wrapper: blocking work runs on the tokio blocking pool.

#![cfg(feature = "async")]

mod common;

use common::{snapshot_document, snapshot_file, StubServer};
use elysian_shop::catalog::normalize_record;
use elysian_shop::checkout::{CheckoutInput, SubmitOutcome};
use elysian_shop::config::{ShopConfig, SourceSpec};
use elysian_shop::{AsyncShopClient, CatalogOrigin};
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn fetch_catalog_falls_back_to_local_snapshot() {
    let file = snapshot_file(&snapshot_document(), ".json");
    let config = ShopConfig {
        api_url: "http://127.0.0.1:9".to_string(),
        fallbacks: vec![SourceSpec::Local(file.path().to_path_buf())],
        ..ShopConfig::default()
    };

    let shop = AsyncShopClient::builder().config(config).build().await.unwrap();
    let catalog = shop.fetch_catalog().await.unwrap();

    assert_eq!(
        catalog.origin,
        CatalogOrigin::Fallback(file.path().display().to_string())
    );
    // keys are excluded by default
    assert_eq!(catalog.products.len(), 2);

    let api_url = shop
        .run(|s| Ok(s.config().api_url.clone()))
        .await
        .unwrap();
    assert_eq!(api_url, "http://127.0.0.1:9");
    shop.close().await.unwrap();
}

#[tokio::test]
async fn overlapping_submits_on_one_session_send_one_order() {
    let server = StubServer::start_delayed(
        vec![(200, r#"{"url":"https://pay.example/ok"}"#)],
        Duration::from_millis(300),
    );
    let shop = AsyncShopClient::builder()
        .api_url(server.base_url.clone())
        .build()
        .await
        .unwrap();
    let product =
        normalize_record(&json!({"id": "1", "category": "privileges", "title": "VIP", "price": 500}))
            .unwrap();
    let input = CheckoutInput::new("Player1", "player@example.com", true);

    let session = shop.session(product);
    let (first, second) = tokio::join!(
        shop.submit(session.clone(), input.clone()),
        shop.submit(session.clone(), input),
    );

    let mut outcomes = vec![first.unwrap(), second.unwrap()];
    outcomes.sort_by_key(|o| matches!(o, SubmitOutcome::Ignored));
    assert_eq!(
        outcomes,
        vec![
            SubmitOutcome::Redirect("https://pay.example/ok".to_string()),
            SubmitOutcome::Ignored,
        ]
    );
    assert_eq!(server.hits(), 1);
    assert!(session.is_submitting());
    tokio::task::spawn_blocking(move || drop(session)).await.unwrap();
    shop.close().await.unwrap();
}
