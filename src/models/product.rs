use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Category: Display sections of the catalog
// ---------------------------------------------------------------------------

/// Catalog section a product is rendered under.
///
/// Declaration order is the on-page section order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Privileges,
    Currency,
    Keys,
    Misc,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Privileges,
        Category::Currency,
        Category::Keys,
        Category::Misc,
    ];

    /// Parse an upstream category value. `Кейсы` is accepted as an alias
    /// of `keys`; anything else unknown yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "privileges" => Some(Category::Privileges),
            "currency" => Some(Category::Currency),
            "keys" | "Кейсы" => Some(Category::Keys),
            "misc" => Some(Category::Misc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Privileges => "privileges",
            Category::Currency => "currency",
            Category::Keys => "keys",
            Category::Misc => "misc",
        }
    }

    /// Tab label shown in the navigation bar.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Privileges => "Привилегии",
            Category::Currency => "Валюта",
            Category::Keys => "Кейсы",
            Category::Misc => "Разное",
        }
    }

    /// Whether products in this section are clustered by subcategory.
    pub fn has_subcategories(&self) -> bool {
        matches!(self, Category::Keys)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Product: A normalized catalog entry
// ---------------------------------------------------------------------------

/// A purchasable item after casing normalization.
///
/// `id` is only stable within a session: when upstream omits it, the title
/// is used instead, so two products can alias each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub title: String,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub background_color: Option<String>,
    pub note: Option<String>,
    pub badge: Option<String>,
}

impl Product {
    /// The display section, or `None` when the category is unrecognized.
    pub fn category_kind(&self) -> Option<Category> {
        Category::parse(&self.category)
    }

    pub fn has_note(&self) -> bool {
        self.note.as_deref().is_some_and(|n| !n.is_empty())
    }
}
