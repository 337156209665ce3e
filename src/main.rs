mod app;
mod color;
mod config;
mod data;
mod error;
mod forecast;
mod narrator;
mod state;
mod ui;

use std::sync::Arc;

use app::PlanetApp;
use config::AppConfig;
use eframe::egui;
use narrator::{GeminiNarrator, Narrator};
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load();
    let narrator: Arc<dyn Narrator> = Arc::new(GeminiNarrator::new(config.gemini.clone()));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Planet at Risk",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            let state = AppState::new(config, narrator);
            Ok(Box::new(PlanetApp::new(state)))
        }),
    )
}
