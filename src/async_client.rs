//! Async wrapper around [`ShopClient`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all client operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free while
//! the blocking HTTP client waits on the network.
//!
//! # Example
//!
//! ```no_run
//! use elysian_shop::AsyncShopClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let shop = AsyncShopClient::builder().build().await.unwrap();
//!
//!     // Run any sync client method via closure
//!     let count = shop.run(|s| Ok(s.catalog().fetch().products.len())).await.unwrap();
//!
//!     // Convenience method for the catalog
//!     let catalog = shop.fetch_catalog().await.unwrap();
//! }
//! ```

use std::sync::Arc;

use crate::catalog::CatalogFetch;
use crate::checkout::{CheckoutInput, CheckoutSession, SubmitOutcome};
use crate::config::ShopConfig;
use crate::error::{Result, ShopError};
use crate::models::Product;
use crate::{ShopClient, ShopClientBuilder};

// ---------------------------------------------------------------------------
// AsyncShopClientBuilder
// ---------------------------------------------------------------------------

/// Builder for an [`AsyncShopClient`]; takes a fully resolved [`ShopConfig`].
#[derive(Default)]
pub struct AsyncShopClientBuilder {
    config: ShopConfig,
}

impl AsyncShopClientBuilder {
    pub fn config(mut self, config: ShopConfig) -> Self {
        self.config = config;
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Build the client on the blocking pool, where the blocking HTTP client
    /// may be created safely.
    pub async fn build(self) -> Result<AsyncShopClient> {
        tokio::task::spawn_blocking(move || {
            let client = ShopClientBuilder::from_config(self.config).build()?;
            Ok(AsyncShopClient {
                inner: Arc::new(client),
            })
        })
        .await
        .map_err(|e| ShopError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncShopClient
// ---------------------------------------------------------------------------

/// Async wrapper around [`ShopClient`].
///
/// The client holds no interior mutability, so it is shared through an
/// [`Arc`] without a lock.
#[derive(Clone)]
pub struct AsyncShopClient {
    inner: Arc<ShopClient>,
}

impl AsyncShopClient {
    pub fn builder() -> AsyncShopClientBuilder {
        AsyncShopClientBuilder::default()
    }

    /// Run a sync client operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&ShopClient) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let client = self.inner.clone();
        tokio::task::spawn_blocking(move || f(&client))
            .await
            .map_err(|e| ShopError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Load the catalog with fallback.
    pub async fn fetch_catalog(&self) -> Result<CatalogFetch> {
        self.run(|s| Ok(s.catalog().fetch())).await
    }

    /// A checkout session for `product` submitting through the backend
    /// gateway. Share it between tasks to keep its single-flight guard.
    ///
    /// The session holds a handle to the blocking HTTP client; release the
    /// last clone on the blocking pool, as [`close`](Self::close) does.
    pub fn session(&self, product: Product) -> Arc<CheckoutSession> {
        Arc::new(self.inner.checkout().session(product))
    }

    /// Submit `input` through `session` on the blocking pool.
    ///
    /// Overlapping calls on the same session send one order; the others
    /// resolve to [`SubmitOutcome::Ignored`].
    pub async fn submit(
        &self,
        session: Arc<CheckoutSession>,
        input: CheckoutInput,
    ) -> Result<SubmitOutcome> {
        tokio::task::spawn_blocking(move || session.submit(&input))
            .await
            .map_err(|e| ShopError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Release the client on the blocking pool.
    ///
    /// Dropping the blocking HTTP client from inside an async task is not
    /// allowed, so this is the way to shut down from async code.
    pub async fn close(self) -> Result<()> {
        let inner = self.inner;
        tokio::task::spawn_blocking(move || drop(inner))
            .await
            .map_err(|e| ShopError::InvalidArgument(format!("Task join error: {e}")))
    }
}
