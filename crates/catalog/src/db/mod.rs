//! Persistence layer: the product store contract and its MongoDB
//! implementation.
//!
//! # Collection: `products`
//!
//! The catalog owns one collection. Records are never removed; deletion is a
//! soft flag (`isDeleted` + `deletedAt`). Title uniqueness is enforced by a
//! read-before-write in the handlers, not by an index, so two concurrent
//! creates can race past the check. Known and accepted at this layer.

mod products;

pub use products::{MongoProductStore, ProductStore};

use std::time::Duration;

use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Errors surfaced by product store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying driver failed.
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// A stored document failed to map back into a domain record.
    #[error("malformed document: {0}")]
    DataCorruption(String),
}

/// Connect to MongoDB and select the catalog database.
///
/// # Arguments
///
/// * `uri` - MongoDB connection string (wrapped in `SecretString`)
/// * `database` - Name of the database holding the products collection
///
/// # Errors
///
/// Returns `mongodb::error::Error` if the URI cannot be parsed or the client
/// cannot be constructed.
pub async fn connect(
    uri: &SecretString,
    database: &str,
) -> Result<Database, mongodb::error::Error> {
    let mut options = ClientOptions::parse(uri.expose_secret()).await?;
    options.app_name = Some("kirana-catalog".to_string());
    options.server_selection_timeout = Some(Duration::from_secs(10));

    let client = Client::with_options(options)?;
    Ok(client.database(database))
}
