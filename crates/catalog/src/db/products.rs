//! Product repository over the `products` collection.
//!
//! The handlers speak [`ProductFilter`]/[`ProductUpdate`]; this module
//! translates them into BSON and maps documents back into domain records.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, DateTime as BsonDateTime, Document, doc};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use kirana_core::{Price, ProductId, Size};

use super::StoreError;
use crate::models::{NewProduct, PriceSort, ProductFilter, ProductRecord, ProductUpdate};

/// Contract for product persistence.
///
/// Mirrors the document-store operations the handlers need: filtered find,
/// single-document find, create, and atomic find-and-update. Implementations
/// own record identity and timestamps.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All records matching the filter, ordered per the filter's sort.
    async fn find(&self, filter: ProductFilter) -> Result<Vec<ProductRecord>, StoreError>;

    /// The first record matching the filter, if any.
    async fn find_one(&self, filter: ProductFilter) -> Result<Option<ProductRecord>, StoreError>;

    /// Persist a new product, assigning identity and timestamps.
    async fn create(&self, product: NewProduct) -> Result<ProductRecord, StoreError>;

    /// Atomically apply `update` to the first record matching `filter`,
    /// returning the updated record, or `None` when nothing matched.
    async fn find_one_and_update(
        &self,
        filter: ProductFilter,
        update: ProductUpdate,
    ) -> Result<Option<ProductRecord>, StoreError>;

    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// BSON shape of a product document.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    description: String,
    /// Normalized two-decimal string, e.g. `"19.50"`.
    price: String,
    currency_id: String,
    currency_format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_free_shipping: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    installments: Option<String>,
    available_sizes: Vec<String>,
    product_image: String,
    is_deleted: bool,
    #[serde(default)]
    deleted_at: Option<BsonDateTime>,
    created_at: BsonDateTime,
    updated_at: BsonDateTime,
}

impl TryFrom<ProductDocument> for ProductRecord {
    type Error = StoreError;

    fn try_from(document: ProductDocument) -> Result<Self, StoreError> {
        let id = ProductId::parse(&document.id.to_hex())
            .map_err(|e| StoreError::DataCorruption(format!("invalid product id: {e}")))?;
        let price = Price::parse(&document.price)
            .map_err(|e| StoreError::DataCorruption(format!("invalid price in database: {e}")))?;
        let available_sizes = document
            .available_sizes
            .iter()
            .map(|s| Size::parse(s))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::DataCorruption(format!("invalid size in database: {e}")))?;

        Ok(Self {
            id,
            title: document.title,
            description: document.description,
            price,
            currency_id: document.currency_id,
            currency_format: document.currency_format,
            is_free_shipping: document.is_free_shipping,
            style: document.style,
            installments: document.installments,
            available_sizes,
            product_image: document.product_image,
            is_deleted: document.is_deleted,
            deleted_at: document.deleted_at.map(BsonDateTime::to_chrono),
            created_at: document.created_at.to_chrono(),
            updated_at: document.updated_at.to_chrono(),
        })
    }
}

/// Repository for product documents backed by MongoDB.
#[derive(Clone)]
pub struct MongoProductStore {
    database: Database,
    collection: Collection<ProductDocument>,
}

impl MongoProductStore {
    /// Create a new store over the `products` collection of `database`.
    #[must_use]
    pub fn new(database: &Database) -> Self {
        Self {
            database: database.clone(),
            collection: database.collection("products"),
        }
    }
}

/// Translate the typed filter into a MongoDB filter document.
fn filter_document(filter: &ProductFilter) -> Result<Document, StoreError> {
    let mut document = Document::new();

    if let Some(id) = &filter.id {
        let oid = ObjectId::parse_str(id.as_str())
            .map_err(|e| StoreError::DataCorruption(format!("invalid object id: {e}")))?;
        document.insert("_id", oid);
    }
    if let Some(title) = &filter.title_exact {
        document.insert("title", title.clone());
    }
    if let Some(fragment) = &filter.title_contains {
        document.insert("title", doc! { "$regex": fragment.clone() });
    }
    if let Some(sizes) = &filter.sizes_exactly {
        let sizes: Vec<Bson> = sizes
            .iter()
            .map(|s| Bson::String(s.as_str().to_string()))
            .collect();
        document.insert("availableSizes", sizes);
    }

    let mut price = Document::new();
    if let Some(bound) = filter.price_above {
        price.insert("$gt", bound.to_string());
    }
    if let Some(bound) = filter.price_below {
        price.insert("$lt", bound.to_string());
    }
    if !price.is_empty() {
        document.insert("price", price);
    }

    if filter.active_only {
        document.insert("isDeleted", false);
    }

    Ok(document)
}

/// Translate the price sort into a MongoDB sort document.
fn sort_document(sort: PriceSort) -> Document {
    match sort {
        PriceSort::Ascending => doc! { "price": 1 },
        PriceSort::Descending => doc! { "price": -1 },
    }
}

/// Translate the typed update into a `$set` document; `updatedAt` rides
/// along with every change.
fn update_document(update: &ProductUpdate, now: DateTime<Utc>) -> Document {
    let mut set = Document::new();

    if let Some(title) = &update.title {
        set.insert("title", title.clone());
    }
    if let Some(description) = &update.description {
        set.insert("description", description.clone());
    }
    if let Some(price) = update.price {
        set.insert("price", price.to_string());
    }
    if let Some(flag) = &update.is_free_shipping {
        set.insert("isFreeShipping", flag.clone());
    }
    if let Some(installments) = &update.installments {
        set.insert("installments", installments.clone());
    }
    if let Some(style) = &update.style {
        set.insert("style", style.clone());
    }
    if let Some(sizes) = &update.available_sizes {
        let sizes: Vec<Bson> = sizes
            .iter()
            .map(|s| Bson::String(s.as_str().to_string()))
            .collect();
        set.insert("availableSizes", sizes);
    }
    if let Some(image) = &update.product_image {
        set.insert("productImage", image.clone());
    }
    if let Some(deleted_at) = update.soft_delete_at {
        set.insert("isDeleted", true);
        set.insert("deletedAt", BsonDateTime::from_chrono(deleted_at));
    }
    set.insert("updatedAt", BsonDateTime::from_chrono(now));

    doc! { "$set": set }
}

#[async_trait]
impl ProductStore for MongoProductStore {
    #[instrument(skip(self))]
    async fn find(&self, filter: ProductFilter) -> Result<Vec<ProductRecord>, StoreError> {
        let query = filter_document(&filter)?;
        let mut action = self.collection.find(query);
        if let Some(sort) = filter.sort() {
            action = action.sort(sort_document(sort));
        }

        let documents: Vec<ProductDocument> = action.await?.try_collect().await?;
        documents.into_iter().map(ProductRecord::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_one(&self, filter: ProductFilter) -> Result<Option<ProductRecord>, StoreError> {
        let query = filter_document(&filter)?;
        let document = self.collection.find_one(query).await?;
        document.map(ProductRecord::try_from).transpose()
    }

    #[instrument(skip(self, product), fields(title = %product.title))]
    async fn create(&self, product: NewProduct) -> Result<ProductRecord, StoreError> {
        let now = BsonDateTime::from_chrono(Utc::now());
        let document = ProductDocument {
            id: ObjectId::new(),
            title: product.title,
            description: product.description,
            price: product.price.to_string(),
            currency_id: product.currency_id,
            currency_format: product.currency_format,
            is_free_shipping: product.is_free_shipping,
            style: product.style,
            installments: product.installments,
            available_sizes: product
                .available_sizes
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            product_image: product.product_image,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        self.collection.insert_one(&document).await?;
        ProductRecord::try_from(document)
    }

    #[instrument(skip(self, update))]
    async fn find_one_and_update(
        &self,
        filter: ProductFilter,
        update: ProductUpdate,
    ) -> Result<Option<ProductRecord>, StoreError> {
        let query = filter_document(&filter)?;
        let changes = update_document(&update, Utc::now());

        let document = self
            .collection
            .find_one_and_update(query, changes)
            .return_document(ReturnDocument::After)
            .await?;
        document.map(ProductRecord::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
