mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::Path;

use app::SalesDashboardApp;
use config::{CONFIG_FILE, DashboardConfig};
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(SalesDashboardApp::new(&config)))),
    )
}
