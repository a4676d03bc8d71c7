use super::aggregate::{
    CountryMeans, GroupTotal, Kpis, Metric, MonthTotal, by_country, by_month, by_product,
    mean_per_country,
};
use super::filter::{FilterRequest, apply_filter};
use super::model::SalesDataset;

/// Everything the dashboard renders for one filter selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardReport {
    pub kpis: Kpis,
    pub revenue_by_country: Vec<GroupTotal>,
    pub revenue_by_product: Vec<GroupTotal>,
    pub revenue_by_month: Vec<MonthTotal>,
    pub boxes_by_country: Vec<GroupTotal>,
    pub country_means: Vec<CountryMeans>,
    /// Source positions of the rows that passed the filter.
    pub rows: Vec<usize>,
}

impl DashboardReport {
    /// No rows passed the filter.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Filter `dataset` with `request` and aggregate the result.
pub fn run_pipeline(dataset: &SalesDataset, request: &FilterRequest) -> DashboardReport {
    let view = apply_filter(dataset, request);
    let records = &view.records;
    log::debug!("pipeline: {} rows in, {} rows out", dataset.len(), view.len());
    if view.is_empty() && !dataset.is_empty() {
        log::debug!("pipeline: filters exclude every row");
    }

    DashboardReport {
        kpis: Kpis::compute(records),
        revenue_by_country: by_country(records, Metric::Value),
        revenue_by_product: by_product(records, Metric::Value),
        revenue_by_month: by_month(records, Metric::Value),
        boxes_by_country: by_country(records, Metric::Boxes),
        country_means: mean_per_country(records),
        rows: view.indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::InclusiveRange;
    use crate::data::loader::load_file;
    use crate::data::model::SalesRecord;
    use crate::data::model::tests::{record, sample_dataset};
    use std::collections::BTreeSet;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn usa_amargo_jan_2023() -> FilterRequest {
        FilterRequest {
            years: InclusiveRange::new(2023, 2023),
            months: InclusiveRange::new(1, 1),
            countries: BTreeSet::from(["USA".to_string()]),
            products: BTreeSet::from(["Chocolate Amargo".to_string()]),
        }
    }

    #[test]
    fn single_record_round_trip() {
        let ds = SalesDataset::from_records(vec![record(
            (2023, 1, 15),
            "USA",
            "Chocolate Amargo",
            100.0,
            10,
        )]);

        let report = run_pipeline(&ds, &usa_amargo_jan_2023());
        assert_eq!(report.rows, vec![0]);
        assert_eq!(report.kpis.total_value, 100.0);
        assert_eq!(report.kpis.total_boxes, 10);
        assert_eq!(report.kpis.average_ticket, 10.0);
        assert_eq!(report.kpis.mean_value, 100.0);
    }

    #[test]
    fn csv_file_through_pipeline() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        file.write_all(
            "Data,Ano,Mes,País,Produto,Valor,Caixas Enviadas\n\
             2023-01-15,2023,1,USA,Chocolate Amargo,100,10\n"
                .as_bytes(),
        )
        .unwrap();

        let ds = load_file(file.path()).unwrap();
        let report = run_pipeline(&ds, &usa_amargo_jan_2023());
        assert_eq!(report.rows, vec![0]);
        assert_eq!(report.kpis.total_value, 100.0);
        assert_eq!(report.kpis.total_boxes, 10);
        assert_eq!(report.kpis.average_ticket, 10.0);
        assert_eq!(report.revenue_by_country[0].key, "USA");
        assert_eq!(report.revenue_by_month.len(), 1);
    }

    #[test]
    fn unknown_country_reports_zero() {
        let ds = sample_dataset();
        let mut request = FilterRequest::full(&ds);
        request.countries = BTreeSet::from(["Atlantis".to_string()]);

        let report = run_pipeline(&ds, &request);
        assert!(report.is_empty());
        assert_eq!(report.kpis, Kpis::default());
        assert!(report.revenue_by_country.is_empty());
        assert!(report.revenue_by_month.is_empty());
        assert!(report.country_means.is_empty());
    }

    #[test]
    fn full_request_aggregates_everything() {
        let ds = sample_dataset();
        let report = run_pipeline(&ds, &FilterRequest::full(&ds));
        assert_eq!(report.rows.len(), ds.len());

        let rows: Vec<&SalesRecord> = report.rows.iter().filter_map(|&i| ds.get(i)).collect();
        assert_eq!(rows.len(), ds.len());

        let by_country: f64 = report.revenue_by_country.iter().map(|g| g.total).sum();
        let by_product: f64 = report.revenue_by_product.iter().map(|g| g.total).sum();
        let by_month: f64 = report.revenue_by_month.iter().map(|m| m.total).sum();
        for sum in [by_country, by_product, by_month] {
            assert!((sum - report.kpis.total_value).abs() < 1e-9);
        }
        let boxes: f64 = report.boxes_by_country.iter().map(|g| g.total).sum();
        assert_eq!(boxes, report.kpis.total_boxes as f64);
    }
}
