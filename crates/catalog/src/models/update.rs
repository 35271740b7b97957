//! Typed accumulation of update-path changes.

use chrono::{DateTime, Utc};

use kirana_core::{Price, Size};

use super::product::ProductRecord;

/// The set of changes accumulated by the update handler.
///
/// Fields left `None` are untouched. `available_sizes` carries the full
/// replacement sequence (current sizes plus the appended one), and
/// `soft_delete_at` marks the record deleted with that timestamp. The store
/// layer refreshes `updatedAt` whenever a change is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub is_free_shipping: Option<String>,
    pub installments: Option<String>,
    pub style: Option<String>,
    pub available_sizes: Option<Vec<Size>>,
    pub product_image: Option<String>,
    pub soft_delete_at: Option<DateTime<Utc>>,
}

impl ProductUpdate {
    /// True when no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Reference application of the changes to a record in place.
    pub fn apply(&self, record: &mut ProductRecord, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            record.title = title.clone();
        }
        if let Some(description) = &self.description {
            record.description = description.clone();
        }
        if let Some(price) = self.price {
            record.price = price;
        }
        if let Some(flag) = &self.is_free_shipping {
            record.is_free_shipping = Some(flag.clone());
        }
        if let Some(installments) = &self.installments {
            record.installments = Some(installments.clone());
        }
        if let Some(style) = &self.style {
            record.style = Some(style.clone());
        }
        if let Some(sizes) = &self.available_sizes {
            record.available_sizes = sizes.clone();
        }
        if let Some(image) = &self.product_image {
            record.product_image = image.clone();
        }
        if let Some(deleted_at) = self.soft_delete_at {
            record.is_deleted = true;
            record.deleted_at = Some(deleted_at);
        }
        record.updated_at = now;
    }
}
