//! Shared configuration and HTTP client handed to every query interface.

use reqwest::blocking::Client;

use crate::config::{ShopConfig, SourceSpec, PRODUCTS_ENDPOINT};
use crate::error::Result;
use crate::source::{CatalogSource, FileSource, HttpSource};

/// Owns the resolved [`ShopConfig`] and a blocking HTTP client.
///
/// Query wrappers borrow from it; cloning the client is cheap.
pub struct ShopContext {
    pub config: ShopConfig,
    pub http: Client,
}

impl ShopContext {
    pub fn new(config: ShopConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { config, http })
    }

    /// The backend catalog endpoint (`GET <base>/shopitems`).
    pub fn primary_source(&self) -> HttpSource {
        HttpSource::new(self.config.endpoint(PRODUCTS_ENDPOINT), self.http.clone())
    }

    /// Configured fallbacks, in the order they are tried.
    pub fn fallback_sources(&self) -> Vec<Box<dyn CatalogSource>> {
        self.config
            .fallbacks
            .iter()
            .map(|spec| -> Box<dyn CatalogSource> {
                match spec {
                    SourceSpec::Remote(url) => Box::new(HttpSource::new(url.clone(), self.http.clone())),
                    SourceSpec::Local(path) => Box::new(FileSource::new(path)),
                }
            })
            .collect()
    }
}
