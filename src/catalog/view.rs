//! Grouping, selection state and the render model for the catalog page.
//!
//! Rendering is a pure function of the product list and the current
//! [`CatalogSelection`]; callers redraw the whole [`RenderedCatalog`] on every
//! selection change.

use indexmap::IndexMap;
use std::collections::BTreeMap;

use crate::config::{ALL_SUBCATEGORIES, DEFAULT_SUBCATEGORY_LABEL};
use crate::format::{format_description, format_price_rub, placeholder_image};
use crate::models::{Category, Product};

// ---------------------------------------------------------------------------
// CatalogSelection
// ---------------------------------------------------------------------------

/// Session-local tab and subfilter state. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSelection {
    pub active_category: Option<Category>,
    pub active_subcategory: String,
}

impl Default for CatalogSelection {
    fn default() -> Self {
        Self {
            active_category: None,
            active_subcategory: ALL_SUBCATEGORIES.to_string(),
        }
    }
}

impl CatalogSelection {
    /// Tab click: switch category and drop any subfilter.
    pub fn select_category(&mut self, category: Category) {
        self.active_category = Some(category);
        self.active_subcategory = ALL_SUBCATEGORIES.to_string();
    }

    /// Subfilter click: the category selection is left untouched.
    pub fn select_subcategory(&mut self, subcategory: impl Into<String>) {
        self.active_subcategory = subcategory.into();
    }

    pub fn is_all_subcategories(&self) -> bool {
        self.active_subcategory == ALL_SUBCATEGORIES
    }

    fn admits(&self, product: &Product, category: Category) -> bool {
        !category.has_subcategories()
            || self.is_all_subcategories()
            || product.subcategory.as_deref() == Some(self.active_subcategory.as_str())
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Bucket products by category, keeping source order inside each bucket.
///
/// Unknown categories are dropped. In the subcategorized bucket, an active
/// subfilter keeps only matching products.
pub fn group<'p>(
    products: &'p [Product],
    selection: &CatalogSelection,
) -> BTreeMap<Category, Vec<&'p Product>> {
    let mut groups: BTreeMap<Category, Vec<&Product>> = BTreeMap::new();
    for product in products {
        let Some(category) = product.category_kind() else {
            continue;
        };
        if !selection.admits(product, category) {
            continue;
        }
        groups.entry(category).or_default().push(product);
    }
    groups
}

/// `"all"` followed by each distinct subcategory, in first-seen order.
///
/// Only products in a subcategorized category contribute.
pub fn available_subcategories(products: &[Product]) -> Vec<String> {
    let mut subs = vec![ALL_SUBCATEGORIES.to_string()];
    for product in products {
        if !product.category_kind().is_some_and(|c| c.has_subcategories()) {
            continue;
        }
        if let Some(sub) = product.subcategory.as_deref().filter(|s| !s.is_empty()) {
            if !subs.iter().any(|s| s == sub) {
                subs.push(sub.to_string());
            }
        }
    }
    subs
}

/// Cluster products under their subcategory label, first-seen order.
pub fn group_by_subcategory<'p>(products: &[&'p Product]) -> IndexMap<String, Vec<&'p Product>> {
    let mut groups: IndexMap<String, Vec<&Product>> = IndexMap::new();
    for product in products {
        let label = product
            .subcategory
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SUBCATEGORY_LABEL);
        groups.entry(label.to_string()).or_default().push(*product);
    }
    groups
}

// ---------------------------------------------------------------------------
// Render model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub id: String,
    pub title: String,
    pub note: String,
    pub price: String,
    pub badge: Option<String>,
    pub image: String,
    /// Only set for subcategorized (keys) cards.
    pub background_color: Option<String>,
    pub separate_image: bool,
}

impl ProductCard {
    pub fn from_product(product: &Product) -> Self {
        let keyed = product.category_kind().is_some_and(|c| c.has_subcategories());
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            note: product.note.clone().unwrap_or_default(),
            price: format_price_rub(product.price),
            badge: product.badge.clone().filter(|b| !b.is_empty()),
            image: product.image.clone().unwrap_or_else(placeholder_image),
            background_color: if keyed {
                product.background_color.clone()
            } else {
                None
            },
            separate_image: keyed,
        }
    }

    pub fn badge_visible(&self) -> bool {
        self.badge.is_some()
    }
}

/// Content of the product detail dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetail {
    pub id: String,
    pub title: String,
    pub image: String,
    /// Description as HTML with `/command` tokens highlighted.
    pub description_html: String,
    pub price: String,
    pub background_color: Option<String>,
    /// The dialog is narrowed when there is no description.
    pub narrow: bool,
}

impl ProductDetail {
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            image: product.image.clone().unwrap_or_else(placeholder_image),
            description_html: format_description(product.note.as_deref().unwrap_or("")),
            price: format_price_rub(product.price),
            background_color: product.background_color.clone().filter(|c| !c.is_empty()),
            narrow: !product.has_note(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubcategoryGroup {
    pub label: String,
    pub cards: Vec<ProductCard>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    Cards(Vec<ProductCard>),
    Grouped(Vec<SubcategoryGroup>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub category: Category,
    pub body: SectionBody,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubfilterButton {
    pub key: String,
    pub label: String,
    pub active: bool,
}

/// A full redraw of the catalog page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCatalog {
    /// Non-empty sections, in section order.
    pub sections: Vec<Section>,
    /// Subfilter bar buttons; empty means the bar is hidden.
    pub subfilters: Vec<SubfilterButton>,
    pub total: usize,
    /// The "no results" indicator is shown iff nothing is rendered.
    pub empty_state: bool,
}

impl RenderedCatalog {
    pub fn section(&self, category: Category) -> Option<&Section> {
        self.sections.iter().find(|s| s.category == category)
    }
}

// ---------------------------------------------------------------------------
// CatalogView
// ---------------------------------------------------------------------------

/// Composes the visible catalog for a selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogView {
    /// When set, only the active category's section is visible.
    pub single_category: bool,
}

impl CatalogView {
    pub fn new(single_category: bool) -> Self {
        Self { single_category }
    }

    /// Build the subfilter bar, resetting the selection to `all` when there
    /// is nothing to filter by.
    pub fn subfilters(&self, products: &[Product], selection: &mut CatalogSelection) -> Vec<SubfilterButton> {
        let subs = available_subcategories(products);
        if subs.len() <= 1 {
            selection.active_subcategory = ALL_SUBCATEGORIES.to_string();
            return Vec::new();
        }
        subs.into_iter()
            .map(|key| SubfilterButton {
                label: if key == ALL_SUBCATEGORIES {
                    "Все".to_string()
                } else {
                    key.clone()
                },
                active: key == selection.active_subcategory,
                key,
            })
            .collect()
    }

    /// Recompute the whole page from the products and the selection.
    pub fn render(&self, products: &[Product], selection: &mut CatalogSelection) -> RenderedCatalog {
        let subfilters = self.subfilters(products, selection);
        let groups = group(products, selection);

        let mut sections = Vec::new();
        let mut total = 0;
        for (category, list) in groups {
            if self.single_category && selection.active_category.is_some_and(|c| c != category) {
                continue;
            }
            if list.is_empty() {
                continue;
            }
            let body = if category.has_subcategories() {
                SectionBody::Grouped(
                    group_by_subcategory(&list)
                        .into_iter()
                        .map(|(label, items)| SubcategoryGroup {
                            label,
                            cards: items.into_iter().map(ProductCard::from_product).collect(),
                        })
                        .collect(),
                )
            } else {
                SectionBody::Cards(list.iter().copied().map(ProductCard::from_product).collect())
            };
            total += list.len();
            sections.push(Section {
                category,
                body,
                count: list.len(),
            });
        }

        RenderedCatalog {
            sections,
            subfilters,
            total,
            empty_state: total == 0,
        }
    }
}
