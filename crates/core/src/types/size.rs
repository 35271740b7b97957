//! Garment size codes accepted by the catalog.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Size`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SizeError {
    /// The input is not one of the seven accepted codes.
    #[error("availableSizes only accepts S, XS, M, X, L, XXL, XL")]
    Invalid,
}

/// A garment size code.
///
/// Parsing is case-insensitive and trims surrounding whitespace; the wire
/// form is always the uppercase code.
///
/// ## Examples
///
/// ```
/// use kirana_core::Size;
///
/// assert_eq!(Size::parse("s").unwrap(), Size::S);
/// assert_eq!(Size::parse(" xxl ").unwrap(), Size::Xxl);
/// assert!(Size::parse("XXS").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Size {
    S,
    #[serde(rename = "XS")]
    Xs,
    M,
    X,
    L,
    #[serde(rename = "XXL")]
    Xxl,
    #[serde(rename = "XL")]
    Xl,
}

impl Size {
    /// Parse a single size code, trimming whitespace and normalizing case.
    ///
    /// # Errors
    ///
    /// Returns [`SizeError::Invalid`] for anything outside the seven codes.
    pub fn parse(s: &str) -> Result<Self, SizeError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(Self::S),
            "XS" => Ok(Self::Xs),
            "M" => Ok(Self::M),
            "X" => Ok(Self::X),
            "L" => Ok(Self::L),
            "XXL" => Ok(Self::Xxl),
            "XL" => Ok(Self::Xl),
            _ => Err(SizeError::Invalid),
        }
    }

    /// Parse a comma-separated list of size codes.
    ///
    /// Order is preserved and duplicates are kept; each token is trimmed and
    /// case-normalized individually.
    ///
    /// # Errors
    ///
    /// Returns [`SizeError::Invalid`] on the first token outside the seven
    /// codes.
    pub fn parse_list(s: &str) -> Result<Vec<Self>, SizeError> {
        s.split(',').map(Self::parse).collect()
    }

    /// Returns the uppercase wire form of the code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::Xs => "XS",
            Self::M => "M",
            Self::X => "X",
            Self::L => "L",
            Self::Xxl => "XXL",
            Self::Xl => "XL",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
