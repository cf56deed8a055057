mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::SalesDashboardApp;
use clap::Parser;
use eframe::egui;

use config::Cli;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // A missing or malformed dataset ends the session before any window opens.
    let dataset = data::loader::load_file(&cli.data)
        .inspect_err(|e| log::error!("Failed to load dataset: {e:#}"))?;
    let state = AppState::new(dataset, cli.data.clone(), usize::from(cli.page_size))
        .context("building initial dashboard")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "E-Commerce Sales Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(SalesDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}
