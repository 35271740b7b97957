//! The shared text-validity rule for titles and descriptions.

/// Returns true when `s` is non-empty and contains only ASCII letters and
/// spaces.
///
/// Titles and descriptions share this rule: no digits, no punctuation.
/// Callers trim before checking, so an all-space input never reaches here in
/// practice.
///
/// ## Examples
///
/// ```
/// use kirana_core::is_catalog_text;
///
/// assert!(is_catalog_text("Red Shirt"));
/// assert!(!is_catalog_text("Red Shirt 2"));
/// assert!(!is_catalog_text("shirt!"));
/// assert!(!is_catalog_text(""));
/// ```
#[must_use]
pub fn is_catalog_text(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic() || c == ' ')
}
