//! Test support for exercising the catalog API end to end.
//!
//! The real router is driven through `tower::ServiceExt::oneshot` against an
//! in-memory [`ProductStore`] and a recording uploader, so the suites cover
//! everything from multipart parsing down to filter evaluation without a
//! MongoDB or object-store deployment. The in-memory store reuses the typed
//! filter and update builders' reference evaluation, which is exactly the
//! semantics the MongoDB backend translates to BSON.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::expect_used)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use secrecy::SecretString;
use tower::ServiceExt;
use url::Url;

use kirana_catalog::config::{CatalogConfig, StorageConfig};
use kirana_catalog::db::{ProductStore, StoreError};
use kirana_catalog::models::{NewProduct, ProductFilter, ProductRecord, ProductUpdate};
use kirana_catalog::routes;
use kirana_catalog::services::{BlobUploader, UploadError, UploadedFile};
use kirana_catalog::state::AppState;
use kirana_core::ProductId;

// =============================================================================
// Store and uploader doubles
// =============================================================================

/// In-memory [`ProductStore`] using the reference evaluation of the typed
/// filter and update builders.
#[derive(Default)]
pub struct InMemoryProductStore {
    records: Mutex<Vec<ProductRecord>>,
    next_id: AtomicU64,
}

impl InMemoryProductStore {
    fn next_id(&self) -> ProductId {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        ProductId::parse(&format!("{n:024x}")).expect("generated id is valid hex")
    }

    /// Snapshot of every record, soft-deleted ones included.
    #[must_use]
    pub fn records(&self) -> Vec<ProductRecord> {
        self.records.lock().expect("store mutex poisoned").clone()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find(&self, filter: ProductFilter) -> Result<Vec<ProductRecord>, StoreError> {
        let records = self.records.lock().expect("store mutex poisoned");
        let mut found: Vec<ProductRecord> = records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        filter.sort_records(&mut found);
        Ok(found)
    }

    async fn find_one(&self, filter: ProductFilter) -> Result<Option<ProductRecord>, StoreError> {
        let records = self.records.lock().expect("store mutex poisoned");
        Ok(records.iter().find(|record| filter.matches(record)).cloned())
    }

    async fn create(&self, product: NewProduct) -> Result<ProductRecord, StoreError> {
        let now = Utc::now();
        let record = ProductRecord {
            id: self.next_id(),
            title: product.title,
            description: product.description,
            price: product.price,
            currency_id: product.currency_id,
            currency_format: product.currency_format,
            is_free_shipping: product.is_free_shipping,
            style: product.style,
            installments: product.installments,
            available_sizes: product.available_sizes,
            product_image: product.product_image,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        self.records
            .lock()
            .expect("store mutex poisoned")
            .push(record.clone());
        Ok(record)
    }

    async fn find_one_and_update(
        &self,
        filter: ProductFilter,
        update: ProductUpdate,
    ) -> Result<Option<ProductRecord>, StoreError> {
        let mut records = self.records.lock().expect("store mutex poisoned");
        let Some(record) = records.iter_mut().find(|record| filter.matches(record)) else {
            return Ok(None);
        };

        update.apply(record, Utc::now());
        Ok(Some(record.clone()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Uploader double answering deterministic URLs and recording every call.
#[derive(Default)]
pub struct RecordingUploader {
    uploads: Mutex<Vec<String>>,
}

impl RecordingUploader {
    /// Filenames uploaded so far, in call order.
    #[must_use]
    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().expect("uploader mutex poisoned").clone()
    }
}

#[async_trait]
impl BlobUploader for RecordingUploader {
    async fn upload(&self, file: &UploadedFile) -> Result<String, UploadError> {
        self.uploads
            .lock()
            .expect("uploader mutex poisoned")
            .push(file.filename.clone());
        Ok(format!("https://cdn.test/products/{}", file.filename))
    }
}

// =============================================================================
// App wiring
// =============================================================================

/// Configuration stub; nothing in it is dialed during tests.
fn test_config() -> CatalogConfig {
    CatalogConfig {
        database_url: SecretString::from("mongodb://localhost:27017"),
        database_name: "kirana_test".to_string(),
        host: "127.0.0.1".parse().expect("valid host"),
        port: 0,
        storage: StorageConfig {
            endpoint: Url::parse("https://storage.test").expect("valid url"),
            bucket: "images".to_string(),
            access_token: SecretString::from("gT4#qz8!Wn1@pL6^kR3&"),
            public_base_url: "https://storage.test/images".to_string(),
        },
    }
}

/// The catalog router wired to fresh in-memory doubles.
#[must_use]
pub fn test_app() -> (Router, Arc<InMemoryProductStore>, Arc<RecordingUploader>) {
    let store = Arc::new(InMemoryProductStore::default());
    let uploader = Arc::new(RecordingUploader::default());
    let state = AppState::new(test_config(), store.clone(), uploader.clone());
    let app = routes::routes().with_state(state);
    (app, store, uploader)
}

// =============================================================================
// Requests
// =============================================================================

const BOUNDARY: &str = "kirana-test-boundary";

/// Builder for `multipart/form-data` request bodies.
#[derive(Debug, Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    #[must_use]
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    /// Append a file part.
    #[must_use]
    pub fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Finish the body; returns the content-type header value and the bytes.
    #[must_use]
    pub fn build(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (
            format!("multipart/form-data; boundary={BOUNDARY}"),
            self.body,
        )
    }
}

/// Build a multipart request for the given method and uri.
#[must_use]
pub fn multipart_request(method: &str, uri: &str, form: MultipartForm) -> Request<Body> {
    let (content_type, body) = form.build();
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .expect("valid request")
}

/// Build a body-less request (GET/DELETE).
#[must_use]
pub fn bare_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

/// Drive one request through the router and decode the JSON body.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

// =============================================================================
// Payloads
// =============================================================================

/// A create payload with every mandatory field; drop or tweak fields, then
/// call [`ProductPayload::into_form`].
#[derive(Debug, Clone)]
pub struct ProductPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub currency_id: Option<String>,
    pub currency_format: Option<String>,
    pub available_sizes: Option<String>,
    pub is_free_shipping: Option<String>,
    pub style: Option<String>,
    pub installments: Option<String>,
    /// `(filename, content type)` pairs, each sent as a `productImage` part.
    pub files: Vec<(String, String)>,
}

impl ProductPayload {
    /// The reference valid payload with one attached image.
    #[must_use]
    pub fn valid(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            description: Some("Cotton shirt".to_string()),
            price: Some("19.5".to_string()),
            currency_id: Some("INR".to_string()),
            currency_format: Some("₹".to_string()),
            available_sizes: Some("s, m".to_string()),
            is_free_shipping: None,
            style: None,
            installments: None,
            files: vec![("shirt.png".to_string(), "image/png".to_string())],
        }
    }

    #[must_use]
    pub fn price(mut self, price: &str) -> Self {
        self.price = Some(price.to_string());
        self
    }

    #[must_use]
    pub fn sizes(mut self, sizes: &str) -> Self {
        self.available_sizes = Some(sizes.to_string());
        self
    }

    /// Drop a mandatory field (or `"file"` for the image).
    #[must_use]
    pub fn without(mut self, field: &str) -> Self {
        match field {
            "title" => self.title = None,
            "description" => self.description = None,
            "price" => self.price = None,
            "currencyId" => self.currency_id = None,
            "currencyFormat" => self.currency_format = None,
            "availableSizes" => self.available_sizes = None,
            "file" => self.files.clear(),
            other => panic!("unknown payload field: {other}"),
        }
        self
    }

    /// Render the payload into a multipart form.
    #[must_use]
    pub fn into_form(self) -> MultipartForm {
        let mut form = MultipartForm::new();
        if let Some(v) = &self.title {
            form = form.text("title", v);
        }
        if let Some(v) = &self.description {
            form = form.text("description", v);
        }
        if let Some(v) = &self.price {
            form = form.text("price", v);
        }
        if let Some(v) = &self.currency_id {
            form = form.text("currencyId", v);
        }
        if let Some(v) = &self.currency_format {
            form = form.text("currencyFormat", v);
        }
        if let Some(v) = &self.available_sizes {
            form = form.text("availableSizes", v);
        }
        if let Some(v) = &self.is_free_shipping {
            form = form.text("isFreeShipping", v);
        }
        if let Some(v) = &self.style {
            form = form.text("style", v);
        }
        if let Some(v) = &self.installments {
            form = form.text("installments", v);
        }
        for (filename, content_type) in &self.files {
            form = form.file("productImage", filename, content_type, b"fake image bytes");
        }
        form
    }
}

/// Create a product through the API, asserting success, and return its id.
pub async fn create_product(app: &Router, payload: ProductPayload) -> String {
    let (status, body) = send(
        app,
        multipart_request("POST", "/products", payload.into_form()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["data"]["_id"]
        .as_str()
        .expect("created record id")
        .to_string()
}
