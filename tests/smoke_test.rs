//! Network smoke test for the shop SDK.
//!
//! Points the client at an unreachable backend so the catalog load must fall
//! back to the published remote snapshot, then drives both pages from the
//! result.
//!
//! Run with:
//! ```sh
//! cargo test -- --ignored --nocapture
//! ```

use elysian_shop::catalog::CatalogOrigin;
use elysian_shop::page::{CatalogEffect, CatalogEvent, CheckoutView};
use elysian_shop::config::REMOTE_SNAPSHOT_URL;
use elysian_shop::{ShopClient, SourceSpec};
use std::time::Duration;

/// Print a section header to stderr.
fn section(name: &str) {
    eprintln!("\n{}", "=".repeat(60));
    eprintln!("  {}", name);
    eprintln!("{}", "=".repeat(60));
}

#[test]
#[ignore]
fn smoke_remote_snapshot_fallback() {
    let shop = ShopClient::builder()
        .api_url("http://127.0.0.1:9")
        .fallbacks(vec![SourceSpec::Remote(REMOTE_SNAPSHOT_URL.to_string())])
        .exclude_categories(Vec::<String>::new())
        .timeout(Duration::from_secs(20))
        .build()
        .unwrap();
    eprintln!("{shop}");

    section("Catalog");
    let catalog = shop.catalog().fetch();
    eprintln!("origin={:?} products={}", catalog.origin, catalog.products.len());
    assert_eq!(
        catalog.origin,
        CatalogOrigin::Fallback(REMOTE_SNAPSHOT_URL.to_string())
    );
    assert!(catalog.notice().is_some());
    for product in catalog.products.iter().take(5) {
        eprintln!("  [{}] {} {:?}", product.id, product.title, product.price);
    }

    section("Catalog page");
    let mut page = shop.catalog_page("https://shop.example/index.html");
    let rendered = page.init(|| catalog.clone());
    eprintln!("sections={} total={}", rendered.sections.len(), rendered.total);
    if let Some(first) = catalog.products.first() {
        match page.dispatch(CatalogEvent::BuyClicked(first.id.clone())).unwrap() {
            CatalogEffect::Navigate(url) => eprintln!("buy -> {url}"),
            other => eprintln!("buy -> {other:?}"),
        }

        section("Checkout page");
        let mut checkout = shop.checkout_page();
        let query = format!("?id={}", urlencoding::encode(&first.id));
        let view = checkout.init(&query, || catalog.clone());
        assert!(matches!(view, CheckoutView::Form(_)));
        eprintln!("{view:?}");
    }
}
