//! Catalog acquisition with ordered fallback, plus grouping for display.
//!
//! The primary endpoint is always tried first. Only when it fails are the
//! fallback sources consulted, strictly one after another, stopping at the
//! first that answers with a parseable document. Every path runs through
//! the same normalization and exclusion filter.

pub mod normalize;
pub mod view;

pub use normalize::{coerce_price, extract_records, normalize_catalog, normalize_record};
pub use view::{CatalogSelection, CatalogView, RenderedCatalog};

use std::path::Path;
use tracing::{error, info, warn};

use crate::context::ShopContext;
use crate::error::Result;
use crate::models::Product;
use crate::source::{self, CatalogSource};

// ---------------------------------------------------------------------------
// CatalogOrigin / CatalogFetch
// ---------------------------------------------------------------------------

/// Where the displayed catalog came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOrigin {
    /// The backend endpoint answered.
    Primary,
    /// The backend failed; the named fallback answered.
    Fallback(String),
    /// Every source failed.
    Unavailable,
}

/// Result of a catalog load. Never an error: failures degrade the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogFetch {
    pub products: Vec<Product>,
    pub origin: CatalogOrigin,
}

impl CatalogFetch {
    /// `true` when the catalog did not come from the primary endpoint.
    pub fn is_degraded(&self) -> bool {
        self.origin != CatalogOrigin::Primary
    }

    /// Banner text for degraded data, `None` when the primary answered.
    pub fn notice(&self) -> Option<&'static str> {
        match self.origin {
            CatalogOrigin::Primary => None,
            CatalogOrigin::Fallback(_) => Some("⚠ Загружены локальные данные (бэкенд недоступен)"),
            CatalogOrigin::Unavailable => {
                Some("Ошибка при загрузке данных. Пожалуйста, обновите страницу.")
            }
        }
    }

    /// Find a product by id using string equality.
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

/// Run the acquisition pipeline over explicit sources.
///
/// A primary success returns immediately, even when the catalog is empty.
/// Fallbacks after the first successful one are never contacted.
pub fn fetch_with_fallback(
    primary: &dyn CatalogSource,
    fallbacks: &[Box<dyn CatalogSource>],
    excluded: &[String],
) -> CatalogFetch {
    match primary.fetch() {
        Ok(document) => {
            let products = normalize_catalog(document, excluded);
            info!(source = %primary.name(), count = products.len(), "catalog loaded from backend");
            return CatalogFetch {
                products,
                origin: CatalogOrigin::Primary,
            };
        }
        Err(e) => warn!(source = %primary.name(), error = %e, "backend catalog unavailable"),
    }

    for fallback in fallbacks {
        match fallback.fetch() {
            Ok(document) => {
                let products = normalize_catalog(document, excluded);
                info!(source = %fallback.name(), count = products.len(), "catalog loaded from fallback");
                return CatalogFetch {
                    products,
                    origin: CatalogOrigin::Fallback(fallback.name()),
                };
            }
            Err(e) => warn!(source = %fallback.name(), error = %e, "fallback catalog unavailable"),
        }
    }

    error!("all catalog sources failed");
    CatalogFetch {
        products: Vec::new(),
        origin: CatalogOrigin::Unavailable,
    }
}

// ---------------------------------------------------------------------------
// CatalogQuery
// ---------------------------------------------------------------------------

/// Catalog interface bound to a [`ShopContext`].
pub struct CatalogQuery<'a> {
    ctx: &'a ShopContext,
}

impl<'a> CatalogQuery<'a> {
    pub fn new(ctx: &'a ShopContext) -> Self {
        Self { ctx }
    }

    /// Load the catalog from the backend, falling back through the
    /// configured snapshots.
    pub fn fetch(&self) -> CatalogFetch {
        let primary = self.ctx.primary_source();
        let fallbacks = self.ctx.fallback_sources();
        fetch_with_fallback(&primary, &fallbacks, &self.ctx.config.excluded_categories)
    }

    /// Load only from the backend, without fallbacks or degradation.
    pub fn fetch_primary(&self) -> Result<Vec<Product>> {
        let document = self.ctx.primary_source().fetch()?;
        Ok(normalize_catalog(
            document,
            &self.ctx.config.excluded_categories,
        ))
    }

    /// Resolve a product by id against a fresh catalog load.
    pub fn get(&self, id: &str) -> Option<Product> {
        self.fetch().find(id).cloned()
    }

    /// Refresh a local snapshot from the backend catalog.
    ///
    /// The snapshot is written as `{"products": [...]}` so it can serve as a
    /// local fallback source. Returns the number of products written.
    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let products = self.fetch_primary()?;
        let document = serde_json::json!({ "products": products });
        source::write_snapshot(path.as_ref(), &document)?;
        info!(path = %path.as_ref().display(), count = products.len(), "catalog snapshot written");
        Ok(products.len())
    }
}
