use std::collections::{BTreeMap, HashMap};

use super::model::{SalesRecord, YearMonth};

// ---------------------------------------------------------------------------
// Scalar KPIs
// ---------------------------------------------------------------------------

/// Sum of `value`; 0 for no records.
pub fn total_value(records: &[&SalesRecord]) -> f64 {
    records.iter().map(|r| r.value).sum()
}

/// Arithmetic mean of `value`; 0 for no records.
pub fn mean_value(records: &[&SalesRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    total_value(records) / records.len() as f64
}

/// Sum of `boxes_shipped`.
pub fn total_boxes(records: &[&SalesRecord]) -> u64 {
    records.iter().map(|r| r.boxes_shipped).sum()
}

/// Revenue per box shipped; 0 when nothing was shipped.
pub fn average_ticket(records: &[&SalesRecord]) -> f64 {
    let boxes = total_boxes(records);
    if boxes == 0 {
        return 0.0;
    }
    total_value(records) / boxes as f64
}

/// The four headline metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Kpis {
    pub total_value: f64,
    pub mean_value: f64,
    pub total_boxes: u64,
    pub average_ticket: f64,
}

impl Kpis {
    pub fn compute(records: &[&SalesRecord]) -> Self {
        Self {
            total_value: total_value(records),
            mean_value: mean_value(records),
            total_boxes: total_boxes(records),
            average_ticket: average_ticket(records),
        }
    }
}

// ---------------------------------------------------------------------------
// Grouped aggregations
// ---------------------------------------------------------------------------

/// Which per-record quantity a grouping sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Value,
    Boxes,
}

impl Metric {
    fn of(self, record: &SalesRecord) -> f64 {
        match self {
            Metric::Value => record.value,
            Metric::Boxes => record.boxes_shipped as f64,
        }
    }
}

/// One bar of a categorical chart.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal {
    pub key: String,
    pub total: f64,
}

/// One point of the time series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthTotal {
    pub month: YearMonth,
    pub total: f64,
}

/// Per-country averages for the scatter chart.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryMeans {
    pub country: String,
    pub mean_value: f64,
    pub mean_boxes: f64,
    pub count: usize,
}

fn sum_by_key<'r>(
    records: &[&'r SalesRecord],
    key: impl Fn(&'r SalesRecord) -> &'r str,
    metric: Metric,
) -> Vec<GroupTotal> {
    let mut sums: HashMap<&str, f64> = HashMap::new();
    for &rec in records {
        *sums.entry(key(rec)).or_default() += metric.of(rec);
    }

    let mut groups: Vec<GroupTotal> = sums
        .into_iter()
        .map(|(key, total)| GroupTotal {
            key: key.to_string(),
            total,
        })
        .collect();
    // Largest first; equal totals fall back to the key so output is stable.
    groups.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.key.cmp(&b.key)));
    groups
}

/// Sum `metric` per country, largest first.
pub fn by_country(records: &[&SalesRecord], metric: Metric) -> Vec<GroupTotal> {
    sum_by_key(records, |r| r.country.as_str(), metric)
}

/// Sum `metric` per product, largest first.
pub fn by_product(records: &[&SalesRecord], metric: Metric) -> Vec<GroupTotal> {
    sum_by_key(records, |r| r.product.as_str(), metric)
}

/// Sum `metric` per calendar month of `date`, oldest first.
pub fn by_month(records: &[&SalesRecord], metric: Metric) -> Vec<MonthTotal> {
    let mut sums: BTreeMap<YearMonth, f64> = BTreeMap::new();
    for &rec in records {
        *sums.entry(rec.year_month()).or_default() += metric.of(rec);
    }
    sums.into_iter()
        .map(|(month, total)| MonthTotal { month, total })
        .collect()
}

/// Mean value and mean boxes per country, ordered by country name.
pub fn mean_per_country(records: &[&SalesRecord]) -> Vec<CountryMeans> {
    let mut acc: BTreeMap<&str, (f64, f64, usize)> = BTreeMap::new();
    for &rec in records {
        let entry = acc.entry(rec.country.as_str()).or_default();
        entry.0 += rec.value;
        entry.1 += rec.boxes_shipped as f64;
        entry.2 += 1;
    }
    acc.into_iter()
        .map(|(country, (value, boxes, count))| CountryMeans {
            country: country.to_string(),
            mean_value: value / count as f64,
            mean_boxes: boxes / count as f64,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{record, sample_dataset};

    fn all(ds: &crate::data::model::SalesDataset) -> Vec<&SalesRecord> {
        ds.records().iter().collect()
    }

    #[test]
    fn kpis_are_zero_for_empty_input() {
        let kpis = Kpis::compute(&[]);
        assert_eq!(kpis, Kpis::default());
        assert!(by_country(&[], Metric::Value).is_empty());
        assert!(by_month(&[], Metric::Value).is_empty());
        assert!(mean_per_country(&[]).is_empty());
    }

    #[test]
    fn average_ticket_guards_zero_boxes() {
        let rec = record((2023, 1, 1), "USA", "Chocolate Amargo", 500.0, 0);
        let records = [&rec];
        assert_eq!(total_value(&records), 500.0);
        assert_eq!(total_boxes(&records), 0);
        assert_eq!(average_ticket(&records), 0.0);
    }

    #[test]
    fn kpis_over_sample() {
        let ds = sample_dataset();
        let kpis = Kpis::compute(&all(&ds));
        assert_eq!(kpis.total_value, 4000.0);
        assert_eq!(kpis.total_boxes, 305);
        assert!((kpis.mean_value - 4000.0 / 6.0).abs() < 1e-9);
        assert!((kpis.average_ticket - 4000.0 / 305.0).abs() < 1e-9);
    }

    #[test]
    fn by_country_sorted_descending_and_sums_to_total() {
        let ds = sample_dataset();
        let records = all(&ds);
        let groups = by_country(&records, Metric::Value);

        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, ["UK", "USA", "India", "Canada"]);
        assert!(groups.windows(2).all(|w| w[0].total >= w[1].total));

        let sum: f64 = groups.iter().map(|g| g.total).sum();
        assert!((sum - total_value(&records)).abs() < 1e-9);
    }

    #[test]
    fn equal_totals_are_ordered_by_key() {
        let a = record((2023, 1, 1), "UK", "Chocolate Amargo", 10.0, 1);
        let b = record((2023, 1, 1), "Australia", "Chocolate Amargo", 10.0, 1);
        let groups = by_country(&[&a, &b], Metric::Value);
        assert_eq!(groups[0].key, "Australia");
        assert_eq!(groups[1].key, "UK");
    }

    #[test]
    fn by_product_and_boxes_metric() {
        let ds = sample_dataset();
        let records = all(&ds);

        let products = by_product(&records, Metric::Value);
        assert_eq!(products[0].key, "Chocolate Amargo");
        assert_eq!(products[0].total, 2950.0);

        let boxes = by_country(&records, Metric::Boxes);
        assert_eq!(boxes[0].key, "UK");
        assert_eq!(boxes[0].total, 130.0);
        assert_eq!(boxes[1].key, "USA");
        assert_eq!(boxes[1].total, 120.0);
    }

    #[test]
    fn by_month_is_chronological() {
        let ds = sample_dataset();
        let months = by_month(&all(&ds), Metric::Value);
        let labels: Vec<String> = months.iter().map(|m| m.month.to_string()).collect();
        assert_eq!(labels, ["2022-01", "2022-03", "2023-06", "2023-11", "2024-02"]);
        // Two March 2022 sales are merged.
        assert_eq!(months[1].total, 750.0);
    }

    #[test]
    fn mean_per_country_averages_both_columns() {
        let ds = sample_dataset();
        let means = mean_per_country(&all(&ds));
        let usa = means.iter().find(|m| m.country == "USA").unwrap();
        assert_eq!(usa.count, 2);
        assert_eq!(usa.mean_value, 625.0);
        assert_eq!(usa.mean_boxes, 60.0);
        assert_eq!(means[0].country, "Canada");
    }
}
