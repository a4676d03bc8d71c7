use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::color::ColorMap;
use crate::data::filter::{FilterRequest, InclusiveRange};
use crate::data::loader::load_file;
use crate::data::model::SalesDataset;
use crate::data::pipeline::{DashboardReport, run_pipeline};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<SalesDataset>,

    /// Where `dataset` came from.
    pub source_path: Option<PathBuf>,

    /// Current sidebar selection.
    pub request: FilterRequest,

    /// "Select all" checkboxes of the country and product sections.
    pub all_countries: bool,
    pub all_products: bool,

    /// Result of the last pipeline run for `request`.
    pub report: DashboardReport,

    pub country_colors: ColorMap,
    pub product_colors: ColorMap,

    /// Load error shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            source_path: None,
            request: FilterRequest::full(&SalesDataset::from_records(Vec::new())),
            all_countries: true,
            all_products: true,
            report: DashboardReport::default(),
            country_colors: ColorMap::default(),
            product_colors: ColorMap::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Load `path`, replacing the current dataset. Failures are kept in
    /// `status_message` and leave no dataset behind.
    pub fn load(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows ({} countries, {} products) from {}",
                    dataset.len(),
                    dataset.countries().len(),
                    dataset.products().len(),
                    path.display()
                );
                self.set_dataset(dataset, path.to_path_buf());
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.set_load_error(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and select everything in it.
    pub fn set_dataset(&mut self, dataset: SalesDataset, path: PathBuf) {
        self.request = FilterRequest::full(&dataset);
        self.all_countries = true;
        self.all_products = true;
        self.country_colors = ColorMap::for_countries(dataset.countries());
        self.product_colors = ColorMap::for_products(dataset.products());
        self.dataset = Some(dataset);
        self.source_path = Some(path);
        self.status_message = None;
        self.refresh();
    }

    pub fn set_load_error(&mut self, message: String) {
        self.dataset = None;
        self.source_path = None;
        self.report = DashboardReport::default();
        self.status_message = Some(message);
    }

    /// Products offered by the product selector: those sold in the selected
    /// countries.
    pub fn product_options(&self) -> BTreeSet<String> {
        match &self.dataset {
            Some(ds) => ds.products_for(&self.request.countries),
            None => BTreeSet::new(),
        }
    }

    pub fn set_year_range(&mut self, min: i32, max: i32) {
        self.request.years = InclusiveRange::new(min, max.max(min));
        self.refresh();
    }

    pub fn set_month_range(&mut self, min: u32, max: u32) {
        self.request.months = InclusiveRange::new(min, max.max(min));
        self.refresh();
    }

    pub fn set_all_countries(&mut self, all: bool) {
        self.all_countries = all;
        self.request.countries = match (&self.dataset, all) {
            (Some(ds), true) => ds.countries().clone(),
            _ => BTreeSet::new(),
        };
        self.refresh();
    }

    pub fn set_country(&mut self, country: &str, selected: bool) {
        if selected {
            self.request.countries.insert(country.to_string());
        } else {
            self.request.countries.remove(country);
        }
        self.all_countries = self
            .dataset
            .as_ref()
            .is_some_and(|ds| ds.countries() == &self.request.countries);
        self.refresh();
    }

    pub fn set_all_products(&mut self, all: bool) {
        self.all_products = all;
        if !all {
            self.request.products.clear();
        }
        self.refresh();
    }

    pub fn set_product(&mut self, product: &str, selected: bool) {
        if selected {
            self.request.products.insert(product.to_string());
        } else {
            self.request.products.remove(product);
        }
        self.all_products = self.product_options() == self.request.products;
        self.refresh();
    }

    /// Bring the product selection in line with the current countries and
    /// re-run the pipeline.
    pub fn refresh(&mut self) {
        let options = self.product_options();
        if self.all_products {
            self.request.products = options;
        } else {
            self.request.products.retain(|p| options.contains(p));
        }

        if let Some(ds) = &self.dataset {
            self.report = run_pipeline(ds, &self.request);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(sample_dataset(), PathBuf::from("sample.csv"));
        state
    }

    #[test]
    fn new_dataset_selects_everything() {
        let state = loaded();
        assert!(state.all_countries && state.all_products);
        assert_eq!(state.report.rows.len(), 6);
        assert_eq!(state.request.products.len(), 4);
    }

    #[test]
    fn deselecting_a_country_narrows_products() {
        let mut state = loaded();
        for country in ["USA", "India", "Canada"] {
            state.set_country(country, false);
        }
        assert!(!state.all_countries);
        let products: Vec<&str> = state.request.products.iter().map(String::as_str).collect();
        assert_eq!(products, ["Chocolate Amargo", "Chocolate Branco"]);
        assert_eq!(state.report.rows, vec![1, 5]);

        state.set_country("USA", true);
        assert!(state.request.products.contains("Chocolate Ao Leite"));
    }

    #[test]
    fn explicit_product_selection_survives_country_changes() {
        let mut state = loaded();
        state.set_all_products(false);
        assert!(state.report.is_empty());

        state.set_product("Chocolate Branco", true);
        assert!(!state.all_products);
        assert_eq!(state.report.rows, vec![1]);

        state.set_country("UK", false);
        assert!(state.request.products.is_empty());
        assert!(state.report.is_empty());
    }

    #[test]
    fn clearing_countries_reports_zero() {
        let mut state = loaded();
        state.set_all_countries(false);
        assert!(state.request.countries.is_empty());
        assert!(state.report.is_empty());
        assert_eq!(state.report.kpis.total_value, 0.0);

        state.set_all_countries(true);
        assert_eq!(state.report.rows.len(), 6);
    }

    #[test]
    fn ranges_never_invert() {
        let mut state = loaded();
        state.set_year_range(2024, 2022);
        assert_eq!(state.request.years, InclusiveRange::new(2024, 2024));
        assert_eq!(state.report.rows, vec![5]);

        state.set_month_range(3, 6);
        assert!(state.report.is_empty());
    }

    #[test]
    fn failed_load_clears_dataset() {
        let mut state = loaded();
        state.load(Path::new("/no/such/file.csv"));
        assert!(state.dataset.is_none());
        assert!(state.report.is_empty());
        assert!(state.status_message.as_deref().is_some_and(|m| m.contains("not found")));
    }
}
