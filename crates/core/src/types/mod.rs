//! Shared newtypes and validation rules for the product catalog.

pub mod id;
pub mod price;
pub mod size;
pub mod text;

pub use id::{ProductId, ProductIdError};
pub use price::{Price, PriceError, is_numeric_filter};
pub use size::{Size, SizeError};
pub use text::is_catalog_text;
