use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{dashboard, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalesDashboardApp {
    pub state: AppState,
}

impl SalesDashboardApp {
    /// Start with the configured dataset already loaded (or its load error).
    pub fn new(config: &DashboardConfig) -> Self {
        let mut state = AppState::default();
        state.load(&config.data_path);
        Self { state }
    }
}

impl eframe::App for SalesDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard::dashboard(ui, &self.state);
        });
    }
}
