//! Page controllers for the catalog and checkout pages.
//!
//! Each controller owns its page state and is driven by UI events matched in
//! a single `dispatch`. Initialization is guarded so that repeated `init`
//! calls reuse the first load instead of fetching again.

use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::catalog::view::{ProductDetail, RenderedCatalog};
use crate::catalog::{CatalogFetch, CatalogSelection, CatalogView};
use crate::checkout::{
    check_fields, checkout_url, product_id_from_query, resolve_product, CheckoutInput,
    CheckoutSession, FieldValidity, PaymentGateway, SubmitOutcome,
};
use crate::error::{Result, ShopError};
use crate::format::format_price_rub;
use crate::models::{Category, Product};

// ---------------------------------------------------------------------------
// CatalogPage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    TabClicked(Category),
    SubfilterClicked(String),
    CardOpened(String),
    BuyClicked(String),
    DetailClosed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEffect {
    /// Redraw the whole catalog.
    Render(RenderedCatalog),
    ShowDetail(ProductDetail),
    CloseDetail,
    Navigate(String),
    /// The event referred to something that no longer exists.
    Ignored,
}

pub struct CatalogPage {
    view: CatalogView,
    page_url: String,
    catalog: OnceCell<CatalogFetch>,
    selection: CatalogSelection,
}

impl CatalogPage {
    /// `page_url` is the catalog page's own address; checkout links are
    /// resolved relative to it.
    pub fn new(view: CatalogView, page_url: impl Into<String>) -> Self {
        Self {
            view,
            page_url: page_url.into(),
            catalog: OnceCell::new(),
            selection: CatalogSelection::default(),
        }
    }

    /// Load the catalog once and draw the first frame.
    ///
    /// Later calls skip `load` and redraw from the catalog already held.
    pub fn init<F>(&mut self, load: F) -> RenderedCatalog
    where
        F: FnOnce() -> CatalogFetch,
    {
        if self.catalog.get().is_some() {
            debug!("catalog page already initialized");
        }
        self.catalog.get_or_init(load);
        self.render()
    }

    pub fn is_initialized(&self) -> bool {
        self.catalog.get().is_some()
    }

    pub fn products(&self) -> &[Product] {
        self.catalog.get().map(|c| c.products.as_slice()).unwrap_or(&[])
    }

    /// Degraded-data banner, if any.
    pub fn notice(&self) -> Option<&'static str> {
        self.catalog.get().and_then(CatalogFetch::notice)
    }

    pub fn selection(&self) -> &CatalogSelection {
        &self.selection
    }

    pub fn render(&mut self) -> RenderedCatalog {
        let products = self.catalog.get().map(|c| c.products.as_slice()).unwrap_or(&[]);
        self.view.render(products, &mut self.selection)
    }

    fn find(&self, id: &str) -> Option<&Product> {
        resolve_product(self.products(), id)
    }

    pub fn dispatch(&mut self, event: CatalogEvent) -> Result<CatalogEffect> {
        match event {
            CatalogEvent::TabClicked(category) => {
                self.selection.select_category(category);
                Ok(CatalogEffect::Render(self.render()))
            }
            CatalogEvent::SubfilterClicked(sub) => {
                self.selection.select_subcategory(sub);
                Ok(CatalogEffect::Render(self.render()))
            }
            CatalogEvent::CardOpened(id) => Ok(self
                .find(&id)
                .map(|p| CatalogEffect::ShowDetail(ProductDetail::from_product(p)))
                .unwrap_or(CatalogEffect::Ignored)),
            CatalogEvent::BuyClicked(id) => match self.find(&id) {
                Some(product) => {
                    let url = checkout_url(&self.page_url, &product.id)?;
                    Ok(CatalogEffect::Navigate(url.to_string()))
                }
                None => Ok(CatalogEffect::Ignored),
            },
            CatalogEvent::DetailClosed => Ok(CatalogEffect::CloseDetail),
        }
    }
}

// ---------------------------------------------------------------------------
// CheckoutPage
// ---------------------------------------------------------------------------

/// Form state shown next to the resolved product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutForm {
    pub title: String,
    pub price: String,
    pub validity: FieldValidity,
    pub submit_enabled: bool,
    pub button_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutView {
    /// No id in the URL, or nothing in the catalog matches it.
    NotFound,
    Form(CheckoutForm),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutEvent {
    InputChanged(CheckoutInput),
    Submit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutEffect {
    Update(CheckoutView),
    Navigate(String),
    /// Blocking user-facing message; the form stays usable.
    Alert(String),
    /// An embedded integration finished; its result is attached.
    Completed(serde_json::Value),
    GoBack,
    Ignored,
}

pub struct CheckoutPage {
    gateway: Option<Arc<dyn PaymentGateway>>,
    session: OnceCell<Option<CheckoutSession>>,
    input: CheckoutInput,
}

impl CheckoutPage {
    /// `gateway` is the payment integration; `None` models a page where the
    /// integration failed to load.
    pub fn new(gateway: Option<Arc<dyn PaymentGateway>>) -> Self {
        Self {
            gateway,
            session: OnceCell::new(),
            input: CheckoutInput::default(),
        }
    }

    /// Resolve the product named by the query string and draw the page.
    ///
    /// The catalog is only loaded when the query carries an id, and only on
    /// the first call.
    pub fn init<F>(&mut self, query: &str, load: F) -> CheckoutView
    where
        F: FnOnce() -> CatalogFetch,
    {
        let gateway = self.gateway.clone();
        self.session.get_or_init(|| {
            let Some(id) = product_id_from_query(query) else {
                warn!(query, "checkout opened without a product id");
                return None;
            };
            let catalog = load();
            match resolve_product(&catalog.products, &id) {
                Some(product) => Some(CheckoutSession::new(product.clone(), gateway)),
                None => {
                    warn!(id = %id, "product not found for checkout");
                    None
                }
            }
        });
        self.view()
    }

    pub fn session(&self) -> Option<&CheckoutSession> {
        self.session.get().and_then(Option::as_ref)
    }

    pub fn input(&self) -> &CheckoutInput {
        &self.input
    }

    pub fn view(&self) -> CheckoutView {
        match self.session() {
            None => CheckoutView::NotFound,
            Some(session) => {
                let validity = check_fields(&self.input);
                CheckoutView::Form(CheckoutForm {
                    title: session.product().title.clone(),
                    price: format_price_rub(session.product().price),
                    validity,
                    submit_enabled: session.can_submit(&self.input),
                    button_label: session.button_label(),
                })
            }
        }
    }

    pub fn dispatch(&mut self, event: CheckoutEvent) -> CheckoutEffect {
        match event {
            CheckoutEvent::InputChanged(input) => {
                self.input = input;
                CheckoutEffect::Update(self.view())
            }
            CheckoutEvent::Cancel => CheckoutEffect::GoBack,
            CheckoutEvent::Submit => self.submit(),
        }
    }

    fn submit(&self) -> CheckoutEffect {
        let Some(session) = self.session() else {
            return CheckoutEffect::Ignored;
        };
        match session.submit(&self.input) {
            Ok(SubmitOutcome::Ignored) => CheckoutEffect::Ignored,
            Ok(SubmitOutcome::Redirect(url)) => CheckoutEffect::Navigate(url),
            Ok(SubmitOutcome::Completed(value)) => CheckoutEffect::Completed(value),
            Err(ShopError::Validation(_)) => CheckoutEffect::Update(self.view()),
            Err(ShopError::IntegrationMissing(msg)) => CheckoutEffect::Alert(format!("Ошибка: {msg}")),
            Err(e) => CheckoutEffect::Alert(format!(
                "Произошла ошибка при инициализации оплаты: {e}"
            )),
        }
    }
}
