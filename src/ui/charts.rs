use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::aggregate::{CountryMeans, GroupTotal, MonthTotal};
use crate::data::model::YearMonth;
use crate::ui::format;

const CHART_HEIGHT: f32 = 260.0;
const NO_DATA: &str = "Nenhum dado disponível para exibir o gráfico.";

/// Warning shown in place of a chart when the filters exclude every row.
pub fn no_data(ui: &mut Ui) {
    ui.label(RichText::new(NO_DATA).color(Color32::from_rgb(0xE6, 0xA2, 0x3C)));
}

/// Non-interactive plot, so the surrounding page keeps the scroll wheel.
fn static_plot(id: &str) -> Plot<'_> {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_boxed_zoom(false)
}

/// Name of the category drawn at integer position `x`, or nothing between bars.
fn category_label(names: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    names.get(idx as usize).cloned().unwrap_or_default()
}

/// `YearMonth` label for a month ordinal, or nothing between months.
fn month_label(x: f64) -> String {
    let ordinal = x.round();
    if (x - ordinal).abs() > 1e-6 {
        return String::new();
    }
    YearMonth::from_ordinal(ordinal as i64).to_string()
}

// ---------------------------------------------------------------------------
// Bar chart by category (country or product)
// ---------------------------------------------------------------------------

/// One coloured bar per group, in the order given. Y ticks are rendered
/// with `tick_label`.
pub fn category_bars(
    ui: &mut Ui,
    id: &str,
    title: &str,
    y_label: &str,
    groups: &[GroupTotal],
    colors: &ColorMap,
    tick_label: fn(f64) -> String,
) {
    ui.strong(title);
    if groups.is_empty() {
        no_data(ui);
        return;
    }

    let names: Vec<String> = groups.iter().map(|g| g.key.clone()).collect();
    let bars: Vec<Bar> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Bar::new(i as f64, g.total)
                .name(&g.key)
                .fill(colors.color_for(&g.key))
                .width(0.7)
        })
        .collect();

    static_plot(id)
        .y_axis_label(y_label)
        .x_axis_formatter(move |mark: GridMark, _range| category_label(&names, mark.value))
        .y_axis_formatter(move |mark: GridMark, _range| tick_label(mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Revenue over time
// ---------------------------------------------------------------------------

/// Tick label rounded to whole units.
pub fn whole_units(value: f64) -> String {
    format::thousands(value, 0)
}

pub fn revenue_over_time(ui: &mut Ui, months: &[MonthTotal]) {
    ui.strong("Evolução do faturamento ao longo do tempo");
    if months.is_empty() {
        no_data(ui);
        return;
    }

    let points: Vec<[f64; 2]> = months
        .iter()
        .map(|m| [m.month.ordinal() as f64, m.total])
        .collect();
    let line_points: PlotPoints = points.iter().copied().collect();

    static_plot("revenue_over_time")
        .y_axis_label("Faturamento (R$)")
        .x_axis_formatter(|mark: GridMark, _range| month_label(mark.value))
        .y_axis_formatter(|mark: GridMark, _range| whole_units(mark.value))
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(line_points).name("Faturamento").width(2.0));
            plot_ui.points(Points::new(points).radius(3.0).name("Faturamento"));
        });
}

// ---------------------------------------------------------------------------
// Mean value vs mean boxes per country
// ---------------------------------------------------------------------------

/// Marker radius grows with the square root of the mean value, so marker
/// area is proportional to it.
fn marker_radius(value: f64, max_value: f64) -> f32 {
    if max_value <= 0.0 || value <= 0.0 {
        return 4.0;
    }
    4.0 + 14.0 * (value / max_value).sqrt() as f32
}

pub fn country_means_scatter(ui: &mut Ui, means: &[CountryMeans], colors: &ColorMap) {
    ui.strong("Valor Médio x Caixas Enviadas (por País)");
    if means.is_empty() {
        no_data(ui);
        return;
    }

    let max_value = means.iter().map(|m| m.mean_value).fold(0.0, f64::max);

    static_plot("country_means")
        .legend(Legend::default())
        .x_axis_label("Caixas Enviadas (média)")
        .y_axis_label("Valor Médio (R$)")
        .y_axis_formatter(|mark: GridMark, _range| whole_units(mark.value))
        .show(ui, |plot_ui| {
            for m in means {
                let marker = Points::new(vec![[m.mean_boxes, m.mean_value]])
                    .radius(marker_radius(m.mean_value, max_value))
                    .color(colors.color_for(&m.country))
                    .filled(true)
                    .name(&m.country);
                plot_ui.points(marker);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_on_bars() {
        let names = vec!["UK".to_string(), "USA".to_string()];
        assert_eq!(category_label(&names, 0.0), "UK");
        assert_eq!(category_label(&names, 1.0000001), "USA");
        assert_eq!(category_label(&names, 0.5), "");
        assert_eq!(category_label(&names, 2.0), "");
        assert_eq!(category_label(&names, -1.0), "");
    }

    #[test]
    fn month_labels_follow_ordinals() {
        let jan = YearMonth::new(2023, 1);
        assert_eq!(month_label(jan.ordinal() as f64), "2023-01");
        assert_eq!(month_label(jan.ordinal() as f64 - 1.0), "2022-12");
        assert_eq!(month_label(jan.ordinal() as f64 + 0.5), "");
    }

    #[test]
    fn tick_labels_in_millions_and_whole_units() {
        let revenue: fn(f64) -> String = format::millions;
        assert_eq!(revenue(2_500_000.0), "2.50");
        assert_eq!(revenue(0.0), "0.00");
        assert_eq!(whole_units(12_345.4), "12,345");
    }

    #[test]
    fn marker_radius_is_bounded() {
        assert_eq!(marker_radius(0.0, 0.0), 4.0);
        assert_eq!(marker_radius(100.0, 100.0), 18.0);
        assert!(marker_radius(25.0, 100.0) < marker_radius(50.0, 100.0));
    }
}
