use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{REQUIRED_COLUMNS, SalesDataset};
use crate::ui::format;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Detailed data table (filtered rows)
// ---------------------------------------------------------------------------

/// Render the rows at `rows` (positions into `dataset`) as a table.
pub fn records_table(ui: &mut Ui, dataset: &SalesDataset, rows: &[usize]) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(Column::auto().at_least(70.0), REQUIRED_COLUMNS.len() - 1)
        .column(Column::remainder())
        .max_scroll_height(420.0)
        .header(22.0, |mut header| {
            for name in REQUIRED_COLUMNS {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let Some(rec) = rows.get(row.index()).and_then(|&i| dataset.get(i)) else {
                    return;
                };
                let cells = [
                    rec.date.format("%Y-%m-%d").to_string(),
                    rec.year.to_string(),
                    rec.month.to_string(),
                    rec.country.clone(),
                    rec.product.clone(),
                    format::thousands(rec.value, 2),
                    format::thousands(rec.boxes_shipped as f64, 0),
                ];
                for text in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(text);
                    });
                }
            });
        });
}
