mod app;
mod color;
mod config;
mod data;
mod error;
mod map;
mod pipeline;
mod state;
mod ui;

use anyhow::Result;
use app::QuakeMapApp;
use config::{CONFIG_FILE_NAME, DATA_FILE_NAME, DashboardConfig};
use eframe::egui;
use state::AppState;

const APP_TITLE: &str = "Earthquake Risk Map – Philippines";

/// Read settings and the catalogue from the executable's directory.
fn startup() -> Result<AppState> {
    let dir = config::app_dir()?;
    let config = DashboardConfig::load_or_default(&dir.join(CONFIG_FILE_NAME));
    let path = dir.join(DATA_FILE_NAME);
    let dataset = data::store::load(&path)?;
    Ok(AppState::new(dataset, path, config))
}

fn main() -> eframe::Result {
    env_logger::init();

    let state = match startup() {
        Ok(state) => state,
        Err(e) => {
            log::error!("Cannot start: {e:#}");
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Error)
                .set_title(APP_TITLE)
                .set_description(format!("{e:#}"))
                .set_buttons(rfd::MessageButtons::Ok)
                .show();
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([state.config.window_width, state.config.window_height])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(QuakeMapApp::new(state)))),
    )
}
