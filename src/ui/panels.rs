use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::model::DatasetKind;
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – chart toggles
// ---------------------------------------------------------------------------

/// Render the dashboard's chart visibility toggles.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("📊 Dashboard Features");
    ui.separator();

    for kind in DatasetKind::ALL {
        let mut shown = state.is_visible(kind);
        if ui.checkbox(&mut shown, kind.toggle_label()).changed() {
            state.visible.insert(kind, shown);
        }
    }

    ui.separator();
    let loaded = state.tables.values().filter(|t| t.is_some()).count();
    ui.label(format!("{loaded}/{} datasets loaded", DatasetKind::ALL.len()));
    ui.small(state.config.data_dir.display().to_string());
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the menu, the title and the tab strip.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_data_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload data").clicked() {
                state.reload_data();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new("🌍 Planet at Risk")
                .size(40.0)
                .strong()
                .color(Color32::from_rgb(46, 139, 87)),
        );
    });

    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            if ui
                .selectable_label(state.active_tab == tab, tab.title())
                .clicked()
            {
                state.open_tab(tab);
            }
        }
    });
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_data_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open climate data folder")
        .set_directory(&state.config.data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        log::info!("Switching data folder to {}", dir.display());
        state.set_data_dir(dir);
        if state.tables.values().all(Option::is_none) {
            state.status_message = Some(format!(
                "No datasets found in {}",
                state.config.data_dir.display()
            ));
        }
    }
}
