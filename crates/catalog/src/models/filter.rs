//! Typed filter construction for product queries.
//!
//! Handlers never assemble raw store documents. They start from an empty
//! `ProductFilter` and conditionally add typed predicates; each store backend
//! translates the predicate set into its own query form. [`ProductFilter::matches`]
//! is the reference evaluation, used by the in-memory store and the unit
//! tests.

use rust_decimal::Decimal;

use kirana_core::{ProductId, Size};

use super::product::ProductRecord;

/// Sort direction for the price field, parsed from the `priceSort` query
/// parameter (`"1"` ascending, `"-1"` descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSort {
    Ascending,
    Descending,
}

impl PriceSort {
    /// Parse the literal `priceSort` parameter. Anything other than `"1"` or
    /// `"-1"` is rejected.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "1" => Some(Self::Ascending),
            "-1" => Some(Self::Descending),
            _ => None,
        }
    }
}

/// A set of predicates over product records.
///
/// The empty filter matches everything. Range bounds are exclusive. The
/// sizes predicate is whole-sequence equality, not containment: a filter for
/// `[S]` only matches records whose sequence is exactly `[S]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub(crate) id: Option<ProductId>,
    pub(crate) title_exact: Option<String>,
    pub(crate) title_contains: Option<String>,
    pub(crate) sizes_exactly: Option<Vec<Size>>,
    pub(crate) price_above: Option<Decimal>,
    pub(crate) price_below: Option<Decimal>,
    pub(crate) active_only: bool,
    pub(crate) sort: Option<PriceSort>,
}

impl ProductFilter {
    /// Match a single record by identifier.
    #[must_use]
    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = Some(id);
        self
    }

    /// Match records whose title equals `title` exactly (case-sensitive).
    #[must_use]
    pub fn title_eq(mut self, title: String) -> Self {
        self.title_exact = Some(title);
        self
    }

    /// Match records whose title contains `fragment` (case-sensitive,
    /// unanchored).
    #[must_use]
    pub fn title_contains(mut self, fragment: String) -> Self {
        self.title_contains = Some(fragment);
        self
    }

    /// Match records whose size sequence equals `sizes` exactly.
    #[must_use]
    pub fn sizes_exactly(mut self, sizes: Vec<Size>) -> Self {
        self.sizes_exactly = Some(sizes);
        self
    }

    /// Match records with price strictly above `bound`.
    #[must_use]
    pub fn price_above(mut self, bound: Decimal) -> Self {
        self.price_above = Some(bound);
        self
    }

    /// Match records with price strictly below `bound`.
    #[must_use]
    pub fn price_below(mut self, bound: Decimal) -> Self {
        self.price_below = Some(bound);
        self
    }

    /// Restrict the filter to active (not soft-deleted) records.
    #[must_use]
    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    /// Sort results by price.
    #[must_use]
    pub fn sort_by_price(mut self, sort: PriceSort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// The requested sort, if any.
    #[must_use]
    pub const fn sort(&self) -> Option<PriceSort> {
        self.sort
    }

    /// Reference evaluation of the predicate set against one record.
    #[must_use]
    pub fn matches(&self, record: &ProductRecord) -> bool {
        if self.active_only && record.is_deleted {
            return false;
        }
        if let Some(id) = &self.id
            && record.id != *id
        {
            return false;
        }
        if let Some(title) = &self.title_exact
            && record.title != *title
        {
            return false;
        }
        if let Some(fragment) = &self.title_contains
            && !record.title.contains(fragment.as_str())
        {
            return false;
        }
        if let Some(sizes) = &self.sizes_exactly
            && record.available_sizes != *sizes
        {
            return false;
        }
        if let Some(bound) = self.price_above
            && record.price.amount() <= bound
        {
            return false;
        }
        if let Some(bound) = self.price_below
            && record.price.amount() >= bound
        {
            return false;
        }
        true
    }

    /// Sort records in place according to the filter's sort, if any.
    pub fn sort_records(&self, records: &mut [ProductRecord]) {
        match self.sort {
            Some(PriceSort::Ascending) => records.sort_by(|a, b| a.price.cmp(&b.price)),
            Some(PriceSort::Descending) => records.sort_by(|a, b| b.price.cmp(&a.price)),
            None => {}
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::product::test_record;

    const ID_A: &str = "64f0aa11bb22cc33dd44ee55";
    const ID_B: &str = "64f0aa11bb22cc33dd44ee56";

    #[test]
    fn empty_filter_matches_everything() {
        let record = test_record(ID_A, "Red Shirt", "19.5");
        assert!(ProductFilter::default().matches(&record));
    }

    #[test]
    fn active_only_excludes_deleted_records() {
        let mut record = test_record(ID_A, "Red Shirt", "19.5");
        record.is_deleted = true;
        assert!(!ProductFilter::default().active_only().matches(&record));
        assert!(ProductFilter::default().matches(&record));
    }

    #[test]
    fn id_predicate_is_exact() {
        let record = test_record(ID_A, "Red Shirt", "19.5");
        let id = ProductId::parse(ID_B).unwrap();
        assert!(!ProductFilter::default().with_id(id).matches(&record));
    }

    #[test]
    fn title_equality_is_case_sensitive() {
        let record = test_record(ID_A, "Red Shirt", "19.5");
        assert!(
            ProductFilter::default()
                .title_eq("Red Shirt".to_string())
                .matches(&record)
        );
        assert!(
            !ProductFilter::default()
                .title_eq("red shirt".to_string())
                .matches(&record)
        );
    }

    #[test]
    fn title_fragment_is_unanchored_substring() {
        let record = test_record(ID_A, "Red Shirt", "19.5");
        assert!(
            ProductFilter::default()
                .title_contains("d Sh".to_string())
                .matches(&record)
        );
        assert!(
            !ProductFilter::default()
                .title_contains("shirt".to_string())
                .matches(&record)
        );
    }

    #[test]
    fn sizes_predicate_is_whole_sequence_equality() {
        // test_record carries [S, M]; a single-element filter must not match
        let record = test_record(ID_A, "Red Shirt", "19.5");
        assert!(
            !ProductFilter::default()
                .sizes_exactly(vec![Size::S])
                .matches(&record)
        );
        assert!(
            ProductFilter::default()
                .sizes_exactly(vec![Size::S, Size::M])
                .matches(&record)
        );
    }

    #[test]
    fn price_bounds_are_exclusive() {
        let record = test_record(ID_A, "Red Shirt", "10");
        let ten = Decimal::from(10);

        assert!(!ProductFilter::default().price_above(ten).matches(&record));
        assert!(!ProductFilter::default().price_below(ten).matches(&record));
        assert!(
            ProductFilter::default()
                .price_above(Decimal::from(9))
                .price_below(Decimal::from(11))
                .matches(&record)
        );
    }

    #[test]
    fn sort_orders_by_price() {
        let mut records = vec![
            test_record(ID_A, "Shirt", "30"),
            test_record(ID_B, "Kurta", "10"),
        ];

        ProductFilter::default()
            .sort_by_price(PriceSort::Ascending)
            .sort_records(&mut records);
        assert_eq!(records[0].title, "Kurta");

        ProductFilter::default()
            .sort_by_price(PriceSort::Descending)
            .sort_records(&mut records);
        assert_eq!(records[0].title, "Shirt");
    }

    #[test]
    fn price_sort_parses_only_literal_flags() {
        assert_eq!(PriceSort::parse("1"), Some(PriceSort::Ascending));
        assert_eq!(PriceSort::parse("-1"), Some(PriceSort::Descending));
        assert_eq!(PriceSort::parse("2"), None);
        assert_eq!(PriceSort::parse("asc"), None);
    }
}
