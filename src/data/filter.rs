use std::collections::BTreeSet;

use super::model::{SalesDataset, SalesRecord};

// ---------------------------------------------------------------------------
// Inclusive range predicate
// ---------------------------------------------------------------------------

/// Closed interval `[min, max]`. A range with `min > max` matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InclusiveRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> InclusiveRange<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }
}

// ---------------------------------------------------------------------------
// Filter request: the four sidebar predicates
// ---------------------------------------------------------------------------

/// What the user selected in the sidebar. Immutable input to the pipeline.
///
/// A record passes when all of the following hold:
/// * its stored year is in `years`
/// * its stored month is in `months`
/// * its country is in `countries` (an empty set hides everything)
/// * its product is in `products` (an empty set hides everything)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRequest {
    pub years: InclusiveRange<i32>,
    pub months: InclusiveRange<u32>,
    pub countries: BTreeSet<String>,
    pub products: BTreeSet<String>,
}

impl FilterRequest {
    /// A request selecting everything in the dataset (the initial sidebar state).
    pub fn full(dataset: &SalesDataset) -> Self {
        let (y_min, y_max) = dataset.year_bounds().unwrap_or((0, 0));
        let (m_min, m_max) = dataset.month_bounds().unwrap_or((1, 12));
        Self {
            years: InclusiveRange::new(y_min, y_max),
            months: InclusiveRange::new(m_min, m_max),
            countries: dataset.countries().clone(),
            products: dataset.products().clone(),
        }
    }

    pub fn matches(&self, record: &SalesRecord) -> bool {
        self.years.contains(record.year)
            && self.months.contains(record.month)
            && self.countries.contains(&record.country)
            && self.products.contains(&record.product)
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Rows of a dataset that passed a [`FilterRequest`], in source order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    /// Positions in the source dataset.
    pub indices: Vec<usize>,
    pub records: Vec<&'a SalesRecord>,
}

impl FilteredView<'_> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Return the records that pass every predicate of `request`.
pub fn apply_filter<'a>(dataset: &'a SalesDataset, request: &FilterRequest) -> FilteredView<'a> {
    let (indices, records): (Vec<usize>, Vec<&SalesRecord>) = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| request.matches(rec))
        .unzip();
    FilteredView { indices, records }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn full_request_returns_everything() {
        let ds = sample_dataset();
        let view = apply_filter(&ds, &FilterRequest::full(&ds));
        assert_eq!(view.len(), ds.len());
        assert_eq!(view.indices, (0..ds.len()).collect::<Vec<_>>());
    }

    #[test]
    fn result_is_subset_satisfying_all_predicates() {
        let ds = sample_dataset();
        let mut request = FilterRequest::full(&ds);
        request.years = InclusiveRange::new(2022, 2023);
        request.months = InclusiveRange::new(3, 12);
        request.countries = set(&["USA", "UK", "India"]);
        request.products.remove("Chocolate Branco");

        let view = apply_filter(&ds, &request);
        assert!(view.len() <= ds.len());
        for (&idx, rec) in view.indices.iter().zip(&view.records) {
            assert_eq!(&ds.records()[idx], *rec);
            assert!((2022..=2023).contains(&rec.year));
            assert!((3..=12).contains(&rec.month));
            assert!(request.countries.contains(&rec.country));
            assert_ne!(rec.product, "Chocolate Branco");
        }
        // USA/Ao Leite in 2022-03 and India/Amargo in 2023-06.
        assert_eq!(view.indices, vec![2, 3]);
    }

    #[test]
    fn empty_sets_yield_empty_result() {
        let ds = sample_dataset();
        let mut request = FilterRequest::full(&ds);
        request.countries.clear();
        assert!(apply_filter(&ds, &request).is_empty());

        let mut request = FilterRequest::full(&ds);
        request.products.clear();
        assert!(apply_filter(&ds, &request).is_empty());
    }

    #[test]
    fn unknown_country_yields_empty_result() {
        let ds = sample_dataset();
        let mut request = FilterRequest::full(&ds);
        request.countries = set(&["Brazil"]);
        assert!(apply_filter(&ds, &request).is_empty());
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let range = InclusiveRange::new(5u32, 3);
        assert!(!range.contains(4));
        assert!(InclusiveRange::new(3u32, 3).contains(3));
    }

    #[test]
    fn full_request_on_empty_dataset() {
        let ds = SalesDataset::from_records(Vec::new());
        let request = FilterRequest::full(&ds);
        assert!(request.countries.is_empty());
        assert!(apply_filter(&ds, &request).is_empty());
    }
}
