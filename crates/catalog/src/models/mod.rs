//! Catalog data model: the product record, the typed filter builder, and the
//! typed update builder.

pub mod filter;
pub mod product;
pub mod update;

pub use filter::{PriceSort, ProductFilter};
pub use product::{NewProduct, ProductRecord};
pub use update::ProductUpdate;
