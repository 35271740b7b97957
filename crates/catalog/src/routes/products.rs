//! Product route handlers.
//!
//! All validation happens here, before any store or uploader call. The
//! handlers collect multipart input, apply the field rules in a fixed order
//! (first violation wins), build typed filters and updates, and only then
//! talk to the collaborators.

use std::collections::HashMap;
use std::str::FromStr;

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;

use kirana_core::{Price, ProductId, Size, is_catalog_text, is_numeric_filter};

use crate::error::{ApiError, success};
use crate::models::{NewProduct, PriceSort, ProductFilter, ProductUpdate};
use crate::services::UploadedFile;
use crate::state::AppState;

/// Text fields and file attachments pulled out of a multipart body.
#[derive(Debug, Default)]
struct ProductForm {
    fields: HashMap<String, String>,
    files: Vec<UploadedFile>,
}

impl ProductForm {
    /// A field that is present with a non-empty value.
    ///
    /// Empty strings count as absent here, matching the update-path rules;
    /// the create path checks empty-string presence separately where the
    /// contract demands it (installments/style).
    fn present(&self, name: &str) -> Option<&String> {
        self.fields.get(name).filter(|value| !value.is_empty())
    }

    /// A mandatory create-path field; empty counts as missing.
    fn required(&self, name: &str) -> Result<&String, ApiError> {
        self.present(name)
            .ok_or_else(|| ApiError::Validation(format!("{name} is mandatory")))
    }
}

/// Drain a multipart body into text fields and file attachments.
///
/// Parts carrying a filename are files; everything else is a text field.
async fn read_form(mut multipart: Multipart) -> Result<ProductForm, ApiError> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if let Some(filename) = field.file_name() {
            let filename = filename.to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(format!("malformed multipart body: {e}")))?;
            form.files.push(UploadedFile {
                filename,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::Validation(format!("malformed multipart body: {e}")))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

fn parse_product_id(raw: &str) -> Result<ProductId, ApiError> {
    ProductId::parse(raw).map_err(|_| ApiError::Validation("productId is invalid".to_string()))
}

// =============================================================================
// Create
// =============================================================================

/// `POST /products` - validate, check title uniqueness, upload the single
/// image, persist.
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = read_form(multipart).await?;
    let draft = validate_create(&form)?;

    let existing = state
        .store()
        .find_one(ProductFilter::default().title_eq(draft.title.clone()))
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict("title already present".to_string()));
    }

    let file = match form.files.as_slice() {
        [] => {
            return Err(ApiError::Validation(
                "productImage file is mandatory".to_string(),
            ));
        }
        [file] => file,
        _ => {
            return Err(ApiError::Validation(
                "only one productImage file is allowed".to_string(),
            ));
        }
    };
    let product_image = state.uploader().upload(file).await?;

    let created = state
        .store()
        .create(NewProduct {
            product_image,
            ..draft
        })
        .await?;

    Ok((StatusCode::CREATED, Json(success(created))).into_response())
}

/// Apply the create-path field rules in contract order; the first violation
/// wins. The returned draft still has an empty `product_image`.
fn validate_create(form: &ProductForm) -> Result<NewProduct, ApiError> {
    if form.fields.is_empty() {
        return Err(ApiError::Validation(
            "please provide some data in the body".to_string(),
        ));
    }

    let title = form.required("title")?.trim().to_string();
    if !is_catalog_text(&title) {
        return Err(ApiError::Validation(
            "title must contain only letters and spaces".to_string(),
        ));
    }

    let description = form.required("description")?.trim().to_string();
    if !is_catalog_text(&description) {
        return Err(ApiError::Validation(
            "description must contain only letters and spaces".to_string(),
        ));
    }

    let price = Price::parse(form.required("price")?)
        .map_err(|e| ApiError::Validation(format!("invalid price: {e}")))?;

    let currency_id = form.required("currencyId")?.trim().to_string();
    if currency_id != "INR" {
        return Err(ApiError::Validation("currencyId must be INR".to_string()));
    }

    let currency_format = form.required("currencyFormat")?.trim().to_string();
    if currency_format != "₹" {
        return Err(ApiError::Validation(
            "currencyFormat must be ₹".to_string(),
        ));
    }

    let available_sizes = Size::parse_list(form.required("availableSizes")?)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let is_free_shipping = form.fields.get("isFreeShipping").cloned();
    if let Some(flag) = &is_free_shipping
        && flag != "true"
        && flag != "false"
    {
        return Err(ApiError::Validation(
            "isFreeShipping must be \"true\" or \"false\"".to_string(),
        ));
    }

    // Absent keys pass silently; only a present-but-empty value is rejected.
    let installments = form.fields.get("installments").cloned();
    let style = form.fields.get("style").cloned();
    if installments.as_deref() == Some("") || style.as_deref() == Some("") {
        return Err(ApiError::Validation(
            "installments and style must not be empty".to_string(),
        ));
    }

    Ok(NewProduct {
        title,
        description,
        price,
        currency_id,
        currency_format,
        is_free_shipping,
        style,
        installments,
        available_sizes,
        product_image: String::new(),
    })
}

// =============================================================================
// List
// =============================================================================

/// Optional filter parameters for the listing endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    size: Option<String>,
    name: Option<String>,
    price_greater_than: Option<String>,
    price_less_than: Option<String>,
    price_sort: Option<String>,
}

/// `GET /products` - build the typed filter from the query parameters and
/// return every matching active record.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let filter = build_list_filter(&params)?;
    let found = state.store().find(filter).await?;

    if found.is_empty() {
        return Err(ApiError::NotFound("product not found".to_string()));
    }

    Ok((StatusCode::OK, Json(success(found))).into_response())
}

/// Start from the empty predicate set and conditionally add typed
/// predicates; `isDeleted == false` is always forced.
fn build_list_filter(params: &ListParams) -> Result<ProductFilter, ApiError> {
    let mut filter = ProductFilter::default().active_only();

    if let Some(size) = &params.size {
        let size = Size::parse(size).map_err(|e| ApiError::Validation(e.to_string()))?;
        filter = filter.sizes_exactly(vec![size]);
    }

    if let Some(name) = &params.name {
        filter = filter.title_contains(name.trim().to_string());
    }

    if let Some(raw) = &params.price_greater_than {
        filter = filter.price_above(parse_price_bound(raw, "priceGreaterThan")?);
    }

    if let Some(raw) = &params.price_less_than {
        filter = filter.price_below(parse_price_bound(raw, "priceLessThan")?);
    }

    if let Some(raw) = &params.price_sort {
        let sort = PriceSort::parse(raw).ok_or_else(|| {
            ApiError::Validation("priceSort can only be 1 or -1".to_string())
        })?;
        filter = filter.sort_by_price(sort);
    }

    Ok(filter)
}

/// Price bounds use the relaxed numeric rule and the bare-message error
/// path, not the standard envelope.
fn parse_price_bound(raw: &str, param: &str) -> Result<Decimal, ApiError> {
    let trimmed = raw.trim();
    if !is_numeric_filter(trimmed) {
        return Err(ApiError::FilterMessage(format!(
            "{param} accepts only numbers"
        )));
    }

    Decimal::from_str(trimmed)
        .map_err(|_| ApiError::FilterMessage(format!("{param} accepts only numbers")))
}

// =============================================================================
// Get by id
// =============================================================================

/// `GET /products/{productId}` - fetch one active record.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_product_id(&product_id)?;

    let found = state
        .store()
        .find_one(ProductFilter::default().with_id(id).active_only())
        .await?
        .ok_or_else(|| ApiError::NotFound("product not found or already deleted".to_string()))?;

    Ok((StatusCode::OK, Json(success(found))).into_response())
}

// =============================================================================
// Update
// =============================================================================

/// `PUT /products/{productId}` - validate each present field, accumulate a
/// typed update, and apply it atomically to the active record.
pub async fn update(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let id = parse_product_id(&product_id)?;

    let current = state
        .store()
        .find_one(ProductFilter::default().with_id(id.clone()).active_only())
        .await?
        .ok_or_else(|| ApiError::NotFound("product not found or already deleted".to_string()))?;

    let form = read_form(multipart).await?;
    let mut changes = ProductUpdate::default();

    if let Some(title) = form.present("title") {
        let duplicate = state
            .store()
            .find_one(ProductFilter::default().title_eq(title.clone()))
            .await?;
        if duplicate.is_some() {
            return Err(ApiError::Conflict("title already present".to_string()));
        }
        if !is_catalog_text(title) {
            return Err(ApiError::Validation(
                "title must contain only letters and spaces".to_string(),
            ));
        }
        changes.title = Some(title.clone());
    }

    if let Some(description) = form.present("description") {
        changes.description = Some(description.clone());
    }

    if let Some(raw) = form.present("price") {
        let price =
            Price::parse(raw).map_err(|e| ApiError::Validation(format!("invalid price: {e}")))?;
        changes.price = Some(price);
    }

    // Asymmetric with create: the update path only accepts "true".
    if let Some(flag) = form.present("isFreeShipping") {
        if flag != "true" {
            return Err(ApiError::Validation(
                "isFreeShipping can only be set to \"true\"".to_string(),
            ));
        }
        changes.is_free_shipping = Some(flag.clone());
    }

    if let Some(installments) = form.present("installments") {
        changes.installments = Some(installments.clone());
    }

    if let Some(style) = form.present("style") {
        changes.style = Some(style.clone());
    }

    if let Some(raw) = form.present("availableSizes") {
        let size = Size::parse(raw).map_err(|e| ApiError::Validation(e.to_string()))?;
        if current.available_sizes.contains(&size) {
            return Err(ApiError::Validation("size already exists".to_string()));
        }
        let mut sizes = current.available_sizes.clone();
        sizes.push(size);
        changes.available_sizes = Some(sizes);
    }

    if form.fields.get("isDeleted").map(String::as_str) == Some("true") {
        changes.soft_delete_at = Some(Utc::now());
    }

    if let Some(file) = form.files.first() {
        changes.product_image = Some(state.uploader().upload(file).await?);
    }

    if changes.is_empty() {
        return Err(ApiError::Validation(
            "please provide some data to update".to_string(),
        ));
    }

    let updated = state
        .store()
        .find_one_and_update(
            ProductFilter::default().with_id(id).active_only(),
            changes,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("product not found or already deleted".to_string()))?;

    Ok((StatusCode::OK, Json(success(updated))).into_response())
}

// =============================================================================
// Delete
// =============================================================================

/// `DELETE /products/{productId}` - soft-delete the active record.
pub async fn remove(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_product_id(&product_id)?;

    let changes = ProductUpdate {
        soft_delete_at: Some(Utc::now()),
        ..ProductUpdate::default()
    };

    let deleted = state
        .store()
        .find_one_and_update(
            ProductFilter::default().with_id(id).active_only(),
            changes,
        )
        .await?;

    if deleted.is_none() {
        return Err(ApiError::Validation("product already deleted".to_string()));
    }

    Ok((StatusCode::OK, Json(success("product deleted"))).into_response())
}
