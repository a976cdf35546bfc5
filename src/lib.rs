//! ElysianLink shop SDK for Rust.
//!
//! Provides a high-level client for the game-server item shop: the product
//! catalog is read from the backend API, falling back to static snapshots
//! when the backend is unavailable, normalized, grouped for display, and
//! purchased through a validated single-flight checkout.
//!
//! # Quick start
//!
//! ```no_run
//! use elysian_shop::ShopClient;
//! use elysian_shop::checkout::CheckoutInput;
//!
//! let shop = ShopClient::builder()
//!     .api_url("https://shop.example.com")
//!     .build()
//!     .unwrap();
//!
//! // Load the catalog (never fails; check `notice()` for degraded data)
//! let catalog = shop.catalog().fetch();
//!
//! // Buy the first product
//! let product = catalog.products[0].clone();
//! let session = shop.checkout().session(product);
//! let outcome = session.submit(&CheckoutInput::new("Player1", "p@x.io", true));
//! ```

pub mod admin;
#[cfg(feature = "async")]
pub mod async_client;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod logging;
pub mod models;
pub mod notify;
pub mod page;
pub mod source;

#[cfg(feature = "async")]
pub use async_client::AsyncShopClient;
pub use catalog::{CatalogFetch, CatalogOrigin, CatalogSelection, CatalogView};
pub use config::{ShopConfig, SourceSpec, TelegramConfig};
pub use context::ShopContext;
pub use error::{Result, ShopError};
pub use models::{Category, Product};

use std::fmt;
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ShopClientBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`ShopClient`].
///
/// Use [`ShopClient::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](ShopClientBuilder::build).
#[derive(Default)]
pub struct ShopClientBuilder {
    config: ShopConfig,
}

impl ShopClientBuilder {
    /// Start from an existing config, e.g. one read by [`ShopConfig::from_env`].
    pub fn from_config(config: ShopConfig) -> Self {
        Self { config }
    }

    /// Base URL of the shop backend. Defaults to [`config::DEFAULT_API_URL`].
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Replace the fallback sources tried after the backend fails.
    ///
    /// Order matters: sources are tried one at a time and the first that
    /// answers wins. Defaults to the remote snapshot, then the local one.
    pub fn fallbacks(mut self, fallbacks: Vec<SourceSpec>) -> Self {
        self.config.fallbacks = fallbacks;
        self
    }

    /// Append a local snapshot file to the fallback list.
    pub fn local_snapshot<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config
            .fallbacks
            .push(SourceSpec::Local(path.as_ref().to_path_buf()));
        self
    }

    /// Categories removed from every catalog load.
    ///
    /// Defaults to `keys` and its localized alias. Pass an empty list to
    /// show every category.
    pub fn exclude_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.excluded_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// HTTP timeout for every request. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Messaging-bot credentials for the feedback and team forms.
    pub fn telegram(mut self, bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        self.config.telegram = Some(TelegramConfig::new(bot_token, chat_id));
        self
    }

    /// Show one category at a time instead of every section.
    pub fn single_category_view(mut self, enabled: bool) -> Self {
        self.config.single_category_view = enabled;
        self
    }

    /// Build the client and its HTTP connection pool.
    pub fn build(self) -> Result<ShopClient> {
        if self.config.api_url.trim().is_empty() {
            return Err(ShopError::InvalidArgument("api_url must not be empty".into()));
        }
        Ok(ShopClient {
            ctx: ShopContext::new(self.config)?,
        })
    }
}

// ---------------------------------------------------------------------------
// ShopClient
// ---------------------------------------------------------------------------

/// The main entry point for the shop SDK.
///
/// Wraps a [`ShopContext`] and exposes domain-specific interfaces as
/// lightweight borrowing wrappers.
pub struct ShopClient {
    ctx: ShopContext,
}

impl ShopClient {
    pub fn builder() -> ShopClientBuilder {
        ShopClientBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access the catalog interface.
    pub fn catalog(&self) -> catalog::CatalogQuery<'_> {
        catalog::CatalogQuery::new(&self.ctx)
    }

    /// Access the checkout interface.
    pub fn checkout(&self) -> checkout::CheckoutQuery<'_> {
        checkout::CheckoutQuery::new(&self.ctx)
    }

    /// Access the feedback / team-application webhook.
    pub fn notify(&self) -> notify::NotifyQuery<'_> {
        notify::NotifyQuery::new(&self.ctx)
    }

    /// Access administrative payment operations.
    pub fn admin(&self) -> admin::AdminQuery<'_> {
        admin::AdminQuery::new(&self.ctx)
    }

    // -- Pages ---------------------------------------------------------------

    /// A catalog page controller using this client's view settings.
    ///
    /// Call [`init`](page::CatalogPage::init) with `|| shop.catalog().fetch()`.
    pub fn catalog_page(&self, page_url: impl Into<String>) -> page::CatalogPage {
        page::CatalogPage::new(CatalogView::new(self.ctx.config.single_category_view), page_url)
    }

    /// A checkout page controller submitting through the backend gateway.
    pub fn checkout_page(&self) -> page::CheckoutPage {
        let gateway: std::sync::Arc<dyn checkout::PaymentGateway> =
            std::sync::Arc::new(self.checkout().hosted_gateway());
        page::CheckoutPage::new(Some(gateway))
    }

    pub fn config(&self) -> &ShopConfig {
        &self.ctx.config
    }

    pub fn context(&self) -> &ShopContext {
        &self.ctx
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for ShopClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fallbacks: Vec<String> = self.ctx.config.fallbacks.iter().map(SourceSpec::describe).collect();
        write!(
            f,
            "ShopClient(api_url={}, fallbacks=[{}], excluded=[{}])",
            self.ctx.config.api_url,
            fallbacks.join(", "),
            self.ctx.config.excluded_categories.join(", ")
        )
    }
}
