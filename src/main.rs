mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::Path;

use anyhow::Context;
use app::LaunchDashApp;
use eframe::egui;

/// Launch table read once at startup, relative to the working directory.
const DATASET_PATH: &str = "spacex_launch_dash.csv";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dataset = match data::loader::load_file(Path::new(DATASET_PATH)) {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("Failed to load launch records: {e:#}");
            return Err(e);
        }
    };
    log::info!(
        "Loaded {} launches from {} sites, payload {}..{} kg",
        dataset.len(),
        dataset.sites.len(),
        dataset.min_payload,
        dataset.max_payload
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(ui::panels::DASHBOARD_TITLE)
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        ui::panels::DASHBOARD_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(LaunchDashApp::new(dataset)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("running dashboard window")
}
