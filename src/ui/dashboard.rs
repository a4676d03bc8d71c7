use eframe::egui::{Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{charts, format, panels, table};

// ---------------------------------------------------------------------------
// Central panel: KPIs, charts and the detailed table
// ---------------------------------------------------------------------------

pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| match &state.status_message {
            Some(msg) => {
                ui.heading(RichText::new(msg).color(Color32::RED));
            }
            None => {
                ui.heading("Open a file to view sales  (File → Open…)");
            }
        });
        return;
    };

    let report = &state.report;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Análise de Dados da Venda de Chocolates");
            ui.label(concat!(
                "Explore os dados sobre a venda de chocolates em alguns países ",
                "e utilize o filtro à esquerda.",
            ));
            ui.add_space(8.0);

            ui.strong("Métricas gerais");
            panels::kpi_row(ui, state);
            ui.separator();

            ui.strong("Gráficos");
            ui.columns(2, |cols: &mut [Ui]| {
                charts::category_bars(
                    &mut cols[0],
                    "revenue_by_country",
                    "Faturamento por País",
                    "Faturamento (R$ milhões)",
                    &report.revenue_by_country,
                    &state.country_colors,
                    format::millions,
                );
                charts::category_bars(
                    &mut cols[1],
                    "revenue_by_product",
                    "Faturamento por Produto",
                    "Faturamento (R$ milhões)",
                    &report.revenue_by_product,
                    &state.product_colors,
                    format::millions,
                );
            });
            ui.add_space(8.0);

            ui.columns(2, |cols: &mut [Ui]| {
                charts::revenue_over_time(&mut cols[0], &report.revenue_by_month);
                charts::category_bars(
                    &mut cols[1],
                    "boxes_by_country",
                    "Total de Caixas Enviadas por País",
                    "Caixas Enviadas",
                    &report.boxes_by_country,
                    &state.country_colors,
                    charts::whole_units,
                );
            });
            ui.add_space(8.0);

            charts::country_means_scatter(ui, &report.country_means, &state.country_colors);
            ui.separator();

            ui.heading("Dados Detalhados");
            if report.is_empty() {
                charts::no_data(ui);
            } else {
                table::records_table(ui, dataset, &report.rows);
            }
        });
}
