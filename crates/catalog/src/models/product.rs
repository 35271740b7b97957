//! The product record and its creation payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kirana_core::{Price, ProductId, Size};

/// A stored product, as returned to API clients.
///
/// The serialized form is the wire contract: camelCase field names with the
/// identifier under `_id`, the price as a two-decimal string, and sizes as
/// uppercase codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub currency_id: String,
    pub currency_format: String,
    /// Boolean-as-string, `"true"` or `"false"`, kept verbatim from input.
    pub is_free_shipping: Option<String>,
    pub style: Option<String>,
    pub installments: Option<String>,
    pub available_sizes: Vec<Size>,
    pub product_image: String,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A fully validated product ready to be persisted.
///
/// Identity, the deletion flag, and timestamps are owned by the store layer
/// and assigned at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub currency_id: String,
    pub currency_format: String,
    pub is_free_shipping: Option<String>,
    pub style: Option<String>,
    pub installments: Option<String>,
    pub available_sizes: Vec<Size>,
    pub product_image: String,
}

/// Build a valid record for unit tests across the models modules.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) fn test_record(id: &str, title: &str, price: &str) -> ProductRecord {
    let now = Utc::now();
    ProductRecord {
        id: ProductId::parse(id).unwrap(),
        title: title.to_string(),
        description: "Cotton shirt".to_string(),
        price: Price::parse(price).unwrap(),
        currency_id: "INR".to_string(),
        currency_format: "₹".to_string(),
        is_free_shipping: None,
        style: None,
        installments: None,
        available_sizes: vec![Size::S, Size::M],
        product_image: "https://storage.test/images/products/shirt.png".to_string(),
        is_deleted: false,
        deleted_at: None,
        created_at: now,
        updated_at: now,
    }
}
