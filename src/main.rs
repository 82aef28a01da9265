mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::CordExplorerApp;
use clap::Parser;
use config::{Cli, ExplorerConfig};
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ExplorerConfig::from(Cli::parse());
    log::info!(
        "Source {}, sample {}, row cap {}",
        config.source_path.display(),
        config.sample_path.display(),
        config.row_cap
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "CORD-19 Data Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(CordExplorerApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("running the explorer window: {e}"))
}
