use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::state::AppState;
use crate::ui::format;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filtros");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("Nenhum dado carregado.");
        return;
    };

    // Copy what we need so we can mutate state inside the closures.
    let (year_lo, year_hi) = dataset.year_bounds().unwrap_or((0, 0));
    let (month_lo, month_hi) = dataset.month_bounds().unwrap_or((1, 12));
    let countries: Vec<String> = dataset.countries().iter().cloned().collect();
    let products: Vec<String> = state.product_options().into_iter().collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Year range ----
            ui.strong("Ano");
            let years = state.request.years;
            if let Some((min, max)) = range_sliders(ui, years.min, years.max, year_lo..=year_hi) {
                state.set_year_range(min, max);
            }
            ui.separator();

            // ---- Month range ----
            ui.strong("Mês");
            let months = state.request.months;
            if let Some((min, max)) =
                range_sliders(ui, months.min, months.max, month_lo..=month_hi)
            {
                state.set_month_range(min, max);
            }
            ui.separator();

            // ---- Countries ----
            let header = format!(
                "País  ({}/{})",
                state.request.countries.len(),
                countries.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("country_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    let mut all = state.all_countries;
                    if ui.checkbox(&mut all, "Selecionar todos").changed() {
                        state.set_all_countries(all);
                    }
                    for country in &countries {
                        let mut checked = state.request.countries.contains(country);
                        let text =
                            RichText::new(country).color(state.country_colors.color_for(country));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.set_country(country, checked);
                        }
                    }
                });

            // ---- Products (options depend on the selected countries) ----
            let header = format!(
                "Produto  ({}/{})",
                state.request.products.len(),
                products.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("product_filter")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    let mut all = state.all_products;
                    if ui.checkbox(&mut all, "Selecionar todos os produtos").changed() {
                        state.set_all_products(all);
                    }
                    if products.is_empty() {
                        ui.label(RichText::new("Selecione ao menos um país.").weak());
                    }
                    for product in &products {
                        let mut checked = state.request.products.contains(product);
                        if ui.checkbox(&mut checked, product.as_str()).changed() {
                            state.set_product(product, checked);
                        }
                    }
                });
        });
}

/// Two sliders over `bounds` for the lower and upper end of a range.
/// Returns the new `(min, max)` when either moved; the moved end pushes the
/// other one so that `min <= max`.
fn range_sliders<T>(
    ui: &mut Ui,
    mut min: T,
    mut max: T,
    bounds: std::ops::RangeInclusive<T>,
) -> Option<(T, T)>
where
    T: egui::emath::Numeric,
{
    let min_changed = ui
        .add(Slider::new(&mut min, bounds.clone()).integer().text("de"))
        .changed();
    let max_changed = ui
        .add(Slider::new(&mut max, bounds).integer().text("até"))
        .changed();

    if min_changed && min > max {
        max = min;
    }
    if max_changed && max < min {
        min = max;
    }
    (min_changed || max_changed).then_some((min, max))
}

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

/// Render the four headline metrics side by side.
pub fn kpi_row(ui: &mut Ui, state: &AppState) {
    let kpis = &state.report.kpis;
    let cards = [
        ("Valor médio", format::currency(kpis.mean_value)),
        ("Faturamento Total", format::currency(kpis.total_value)),
        ("Caixas enviadas", format::thousands(kpis.total_boxes as f64, 0)),
        ("Ticket médio", format::currency(kpis.average_ticket)),
    ];

    ui.columns(cards.len(), |cols: &mut [Ui]| {
        for (col, (label, value)) in cols.iter_mut().zip(cards) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                ui.set_min_width(ui.available_width());
                ui.label(RichText::new(label).weak());
                ui.label(RichText::new(value).size(24.0).strong());
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} visible",
                ds.len(),
                state.report.rows.len()
            ));
            if let Some(path) = &state.source_path {
                ui.label(RichText::new(path.display().to_string()).weak());
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}
