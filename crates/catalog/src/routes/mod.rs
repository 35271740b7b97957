//! HTTP route handlers for the catalog API.
//!
//! # Route Structure
//!
//! ```text
//! POST   /products             - Create a product (multipart: fields + one image)
//! GET    /products             - List products with optional filters
//! GET    /products/{productId} - Fetch one active product
//! PUT    /products/{productId} - Partially update a product (multipart)
//! DELETE /products/{productId} - Soft-delete a product
//! ```
//!
//! Every response uses the `{status, message, data?}` envelope, except the
//! price-filter parse failures which answer a bare `{message}` body.

pub mod products;

use axum::Router;
use axum::routing::get;

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{productId}",
            get(products::get_by_id)
                .put(products::update)
                .delete(products::remove),
        )
}

/// Create all routes for the catalog API.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/products", product_routes())
}
