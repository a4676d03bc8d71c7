use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// Column names of the source file
// ---------------------------------------------------------------------------

pub const COL_DATE: &str = "Data";
pub const COL_YEAR: &str = "Ano";
pub const COL_MONTH: &str = "Mes";
pub const COL_COUNTRY: &str = "País";
pub const COL_PRODUCT: &str = "Produto";
pub const COL_VALUE: &str = "Valor";
pub const COL_BOXES: &str = "Caixas Enviadas";

/// Every column a sales file must provide, in display order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_DATE,
    COL_YEAR,
    COL_MONTH,
    COL_COUNTRY,
    COL_PRODUCT,
    COL_VALUE,
    COL_BOXES,
];

// ---------------------------------------------------------------------------
// YearMonth – calendar month key used for time series
// ---------------------------------------------------------------------------

/// A calendar month. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    /// Months elapsed since January of year 0; used as the x coordinate of
    /// time-series plots.
    pub fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    pub fn from_ordinal(ordinal: i64) -> Self {
        Self::new(
            ordinal.div_euclid(12) as i32,
            ordinal.rem_euclid(12) as u32 + 1,
        )
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// SalesRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single sale.
///
/// `year` and `month` are kept exactly as stored in the file, even though
/// they are derivable from `date`. Filtering uses them. Time-series grouping
/// uses `date`.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub country: String,
    pub product: String,
    /// Revenue amount.
    pub value: f64,
    pub boxes_shipped: u64,
}

impl SalesRecord {
    pub fn year_month(&self) -> YearMonth {
        YearMonth::of(self.date)
    }

    /// Whether the stored `year`/`month` agree with `date`.
    pub fn period_is_consistent(&self) -> bool {
        self.date.year() == self.year && self.date.month() == self.month
    }
}

// ---------------------------------------------------------------------------
// SalesDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed option lists for the filters.
/// Never mutated after construction.
#[derive(Debug, Clone)]
pub struct SalesDataset {
    records: Vec<SalesRecord>,
    year_bounds: Option<(i32, i32)>,
    month_bounds: Option<(u32, u32)>,
    countries: BTreeSet<String>,
    products: BTreeSet<String>,
}

impl SalesDataset {
    /// Build the filter indices from the loaded records.
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        let mut year_bounds: Option<(i32, i32)> = None;
        let mut month_bounds: Option<(u32, u32)> = None;
        let mut countries = BTreeSet::new();
        let mut products = BTreeSet::new();

        for rec in &records {
            year_bounds = Some(match year_bounds {
                Some((lo, hi)) => (lo.min(rec.year), hi.max(rec.year)),
                None => (rec.year, rec.year),
            });
            month_bounds = Some(match month_bounds {
                Some((lo, hi)) => (lo.min(rec.month), hi.max(rec.month)),
                None => (rec.month, rec.month),
            });
            if !countries.contains(&rec.country) {
                countries.insert(rec.country.clone());
            }
            if !products.contains(&rec.product) {
                products.insert(rec.product.clone());
            }
        }

        SalesDataset {
            records,
            year_bounds,
            month_bounds,
            countries,
            products,
        }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&SalesRecord> {
        self.records.get(index)
    }

    /// Smallest and largest stored year, `None` when empty.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.year_bounds
    }

    /// Smallest and largest stored month, `None` when empty.
    pub fn month_bounds(&self) -> Option<(u32, u32)> {
        self.month_bounds
    }

    /// Sorted unique countries.
    pub fn countries(&self) -> &BTreeSet<String> {
        &self.countries
    }

    /// Sorted unique products.
    pub fn products(&self) -> &BTreeSet<String> {
        &self.products
    }

    /// Products sold in at least one of the given countries.
    pub fn products_for(&self, countries: &BTreeSet<String>) -> BTreeSet<String> {
        self.records
            .iter()
            .filter(|rec| countries.contains(&rec.country))
            .map(|rec| rec.product.clone())
            .collect()
    }

    /// Number of rows whose stored year/month disagree with their date.
    pub fn inconsistent_period_count(&self) -> usize {
        self.records
            .iter()
            .filter(|rec| !rec.period_is_consistent())
            .count()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
