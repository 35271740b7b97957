//! Product identifier type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductIdError {
    /// The input is not exactly 24 characters long.
    #[error("product id must be exactly 24 characters")]
    InvalidLength,
    /// The input contains a non-hexadecimal character.
    #[error("product id must contain only hexadecimal characters")]
    InvalidCharacter,
}

/// A product identifier.
///
/// Identifiers are assigned by the persistence store at creation and are
/// opaque to clients. The canonical form is 24 lowercase hexadecimal
/// characters; `parse` accepts mixed case and normalizes.
///
/// ## Examples
///
/// ```
/// use kirana_core::ProductId;
///
/// assert!(ProductId::parse("64f0aa11bb22cc33dd44ee55").is_ok());
///
/// assert!(ProductId::parse("").is_err());              // empty
/// assert!(ProductId::parse("not-an-id").is_err());     // too short
/// assert!(ProductId::parse("zzf0aa11bb22cc33dd44ee55").is_err()); // not hex
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Length of an identifier in hexadecimal characters.
    pub const LENGTH: usize = 24;

    /// Parse a `ProductId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 24 hexadecimal
    /// characters.
    pub fn parse(s: &str) -> Result<Self, ProductIdError> {
        if s.len() != Self::LENGTH {
            return Err(ProductIdError::InvalidLength);
        }

        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ProductIdError::InvalidCharacter);
        }

        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ProductId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
