//! Field normalization for raw catalog records.
//!
//! Upstream records arrive either in lower-camel-case (`title`, `price`) or
//! with capitalized names (`Title`, `Price`). Each field is resolved from an
//! ordered list of candidate keys; the first *present* value wins, where
//! present means anything other than `null`, a missing key or an empty
//! string. A price of `0` is therefore kept rather than skipped.

use serde_json::{Map, Value};
use tracing::debug;

use crate::models::Product;

const ID_KEYS: [&str; 4] = ["id", "Id", "title", "Title"];
const TITLE_KEYS: [&str; 2] = ["title", "Title"];
const PRICE_KEYS: [&str; 2] = ["price", "Price"];
const CATEGORY_KEYS: [&str; 2] = ["category", "Category"];
const SUBCATEGORY_KEYS: [&str; 2] = ["subcategory", "Subcategory"];
const IMAGE_KEYS: [&str; 2] = ["image", "Image"];
const BACKGROUND_KEYS: [&str; 2] = ["backgroundColor", "BackgroundColor"];
const NOTE_KEYS: [&str; 4] = ["note", "Note", "description", "Description"];
const BADGE_KEYS: [&str; 2] = ["badge", "Badge"];

/// Pull the record list out of a catalog document.
///
/// Accepts a bare array or an object wrapping the array under `products`.
/// Any other shape is treated as an empty catalog.
pub fn extract_records(document: Value) -> Vec<Value> {
    match document {
        Value::Array(arr) => arr,
        Value::Object(mut map) => match map.remove("products").or_else(|| map.remove("Products")) {
            Some(Value::Array(arr)) => arr,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn first_present<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| is_present(value))
}

fn text_field(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    first_present(record, keys).and_then(|value| match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Coerce a price to a finite number. Numeric strings are accepted.
pub fn coerce_price(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Normalize one raw record into a [`Product`].
///
/// Returns `None` for non-object records and records without a title.
pub fn normalize_record(value: &Value) -> Option<Product> {
    let record = value.as_object()?;

    let Some(title) = text_field(record, &TITLE_KEYS) else {
        debug!(record = %value, "skipping catalog record without a title");
        return None;
    };
    let id = text_field(record, &ID_KEYS).unwrap_or_else(|| title.clone());

    Some(Product {
        id,
        category: text_field(record, &CATEGORY_KEYS)
            .map(|c| c.trim().to_string())
            .unwrap_or_default(),
        subcategory: text_field(record, &SUBCATEGORY_KEYS),
        title,
        price: first_present(record, &PRICE_KEYS).and_then(coerce_price),
        image: text_field(record, &IMAGE_KEYS),
        background_color: text_field(record, &BACKGROUND_KEYS),
        note: text_field(record, &NOTE_KEYS),
        badge: text_field(record, &BADGE_KEYS),
    })
}

/// Normalize a whole catalog document and drop excluded categories.
///
/// Exclusion compares the resolved category string, so it behaves the same
/// no matter which casing the record used.
pub fn normalize_catalog(document: Value, excluded: &[String]) -> Vec<Product> {
    extract_records(document)
        .iter()
        .filter_map(normalize_record)
        .filter(|p| !excluded.iter().any(|c| c == &p.category))
        .collect()
}
