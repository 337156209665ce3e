use std::time::{Duration, Instant};

use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{panels, tabs};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PlanetApp {
    pub state: AppState,
}

impl PlanetApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for PlanetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Pending AI replies ----
        if self.state.tick(Instant::now()) {
            let interval = self.state.config.reveal_interval_ms.max(1);
            ctx.request_repaint_after(Duration::from_millis(interval));
        }

        // ---- Top panel: menu bar and tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: chart toggles ----
        if self.state.active_tab == Tab::Dashboard {
            egui::SidePanel::left("toggle_panel")
                .default_width(240.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
        }

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.active_tab {
            Tab::Dashboard => tabs::dashboard(ui, &mut self.state),
            Tab::Awareness => tabs::awareness(ui),
            Tab::AskAi => tabs::ask_ai(ui, &mut self.state),
            Tab::Forecast => tabs::forecast(ui, &self.state),
            Tab::Credits => tabs::credits(ui),
        });
    }
}
