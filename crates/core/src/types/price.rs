//! Fixed-point price type for catalog money values.

use core::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a plain decimal number.
    #[error("price must be a number with an optional decimal part")]
    NotNumeric,
    /// The value is zero or negative.
    #[error("price must be greater than zero")]
    NotPositive,
}

/// A product price.
///
/// Prices are positive decimal amounts normalized to exactly two decimal
/// places; the wire form is the fixed-point string (e.g. `"19.50"`), never a
/// float.
///
/// ## Examples
///
/// ```
/// use kirana_core::Price;
///
/// assert_eq!(Price::parse("19.5").unwrap().to_string(), "19.50");
/// assert_eq!(Price::parse("100").unwrap().to_string(), "100.00");
///
/// assert!(Price::parse("0").is_err());     // must be positive
/// assert!(Price::parse("-5").is_err());    // signs are not numeric here
/// assert!(Price::parse("1.2.3").is_err()); // one decimal point only
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Parse a `Price` from a string.
    ///
    /// The input must be ASCII digits with at most one decimal point and a
    /// value greater than zero. The result is rounded half-away-from-zero
    /// and rescaled to two decimal places.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not numeric, or not positive.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        if !is_numeric_filter(trimmed) {
            return Err(PriceError::NotNumeric);
        }

        let value = Decimal::from_str(trimmed).map_err(|_| PriceError::NotNumeric)?;
        if value <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }

        let mut value = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        value.rescale(2);
        Ok(Self(value))
    }

    /// Returns the underlying decimal amount (scale 2).
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check the relaxed numeric rule used for price query bounds: ASCII digits
/// with at most one decimal point, and at least one digit.
///
/// Unlike [`Price::parse`] this does not require the value to be positive,
/// so `"0"` is a valid filter bound.
#[must_use]
pub fn is_numeric_filter(s: &str) -> bool {
    let mut digits = 0_usize;
    let mut dots = 0_usize;
    for c in s.chars() {
        if c.is_ascii_digit() {
            digits += 1;
        } else if c == '.' {
            dots += 1;
        } else {
            return false;
        }
    }
    digits > 0 && dots <= 1
}
