use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use super::plot::{chart_metadata, forecast_metadata, line_chart};
use crate::data::model::DatasetKind;
use crate::state::{AnswerPhase, AppState};

const WARNING: Color32 = Color32::from_rgb(255, 193, 7);
const SUCCESS: Color32 = Color32::from_rgb(60, 179, 113);

fn warning(ui: &mut Ui, msg: &str) {
    ui.label(RichText::new(msg).color(WARNING));
}

fn error(ui: &mut Ui, msg: &str) {
    ui.label(RichText::new(msg).color(Color32::RED));
}

// ---------------------------------------------------------------------------
// 🌍 Dashboard
// ---------------------------------------------------------------------------

/// One section per visible dataset. A failing section shows its own
/// warning and never hides the others.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for kind in DatasetKind::ALL {
                if !state.is_visible(kind) {
                    continue;
                }
                dataset_section(ui, state, kind);
                ui.add_space(12.0);
            }
        });
}

fn dataset_section(ui: &mut Ui, state: &mut AppState, kind: DatasetKind) {
    if state.table(kind).is_none() {
        if let Some(w) = state.load_warnings.get(&kind) {
            warning(ui, w);
        }
        return;
    }

    if let Some(label) = kind.selector_label() {
        entity_selector(ui, state, kind, label);
    }

    match state.series(kind) {
        Some(Ok(series)) => {
            let meta = chart_metadata(kind, state.entity_for(kind));
            line_chart(ui, &format!("chart_{kind:?}"), &series, &meta);
        }
        Some(Err(w)) => warning(ui, &w),
        None => {}
    }
}

fn entity_selector(ui: &mut Ui, state: &mut AppState, kind: DatasetKind, label: &str) {
    let entities = state.entities(kind);
    let current = state.entity_for(kind).unwrap_or_default().to_string();

    ui.label(label);
    egui::ComboBox::from_id_salt(("entity", kind))
        .selected_text(&current)
        .width(260.0)
        .show_ui(ui, |ui: &mut Ui| {
            for entity in entities {
                if ui.selectable_label(current == entity, &entity).clicked() {
                    state.select_entity(kind, entity);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// 📢 Awareness & Solutions
// ---------------------------------------------------------------------------

const HELP_ITEMS: [&str; 6] = [
    "🚲 Use eco-friendly transport (bike, walk, carpool)",
    "🔌 Reduce energy consumption (turn off lights, efficient appliances)",
    "🌱 Plant more trees",
    "🍽 Reduce food waste",
    "🛍 Use reusable bags, bottles, and containers",
    "🗳 Support climate-positive policies and leaders",
];

pub fn awareness(ui: &mut Ui) {
    ui.heading("📢 Awareness and Ways to Help 🌎");
    ui.add_space(8.0);
    ui.strong("How You Can Help Fight Climate Change:");
    for item in HELP_ITEMS {
        ui.label(format!("• {item}"));
    }
    ui.add_space(8.0);
    ui.label("Together, small actions create a huge impact!");
}

// ---------------------------------------------------------------------------
// 🤖 Ask Planet AI
// ---------------------------------------------------------------------------

pub fn ask_ai(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🤖 Ask Planet AI about Climate, Earth & Solutions!");
    ui.label(
        "Feel free to ask anything about climate change, disasters, CO₂, deforestation, \
         OR current temperatures!",
    );
    ui.add_space(8.0);

    let mut submit = false;
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Ask your question:");
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.question)
                .desired_width(480.0)
                .hint_text("e.g. How fast are glaciers melting?"),
        );
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            submit = true;
        }
        let ask = ui.add_enabled(!state.answer.is_busy(), egui::Button::new("Ask"));
        submit |= ask.clicked();
    });
    if submit {
        state.ask();
    }

    ui.add_space(8.0);
    match &state.answer {
        AnswerPhase::Idle => {}
        AnswerPhase::Waiting { .. } => {
            ui.horizontal(|ui: &mut Ui| {
                ui.spinner();
                ui.label("Thinking... 🌎");
            });
        }
        AnswerPhase::Revealing { shown, .. } => {
            ui.label(format!("🧠 {shown}"));
        }
        AnswerPhase::Done(text) => {
            ui.label(format!("🧠 {text}"));
            ui.label(RichText::new("Done! ✅").color(SUCCESS));
        }
        AnswerPhase::Failed(msg) => error(ui, msg),
    }
}

// ---------------------------------------------------------------------------
// 🔮 Disaster Forecast
// ---------------------------------------------------------------------------

pub fn forecast(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("🔮 Disaster Forecast for the Future");

            match state.disaster_forecast() {
                None => {
                    if let Some(w) = state.load_warnings.get(&DatasetKind::Disasters) {
                        warning(ui, w);
                    }
                }
                Some(Err(w)) => warning(ui, &w),
                Some(Ok((fit, result))) => {
                    let f = state.config.forecast;
                    ui.strong(format!(
                        "📈 Projected Number of Natural Disasters ({}–{})",
                        f.first_year, f.last_year
                    ));
                    line_chart(ui, "forecast_chart", &result.to_series(), &forecast_metadata());
                    ui.label(format!(
                        "Linear trend: {:+.2} disasters per year (R² = {:.2})",
                        fit.slope, fit.r_squared
                    ));
                }
            }

            ui.add_space(12.0);
            match &state.forecast_summary {
                AnswerPhase::Idle => {}
                AnswerPhase::Waiting { .. } | AnswerPhase::Revealing { .. } => {
                    ui.horizontal(|ui: &mut Ui| {
                        ui.spinner();
                        ui.label("Generating future forecast...");
                    });
                }
                AnswerPhase::Done(text) => {
                    ui.label(RichText::new("Forecast ready! ✅").color(SUCCESS));
                    ui.strong("📝 AI Prediction Summary:");
                    ui.label(text);
                }
                AnswerPhase::Failed(msg) => error(ui, msg),
            }
        });
}

// ---------------------------------------------------------------------------
// 📚 Credits
// ---------------------------------------------------------------------------

const SOURCES: [(&str, &str); 5] = [
    ("Global Temperature Data", "NASA GISTEMP v4"),
    ("Natural Disaster Data", "Our World in Data"),
    ("Forest Area Change", "Our World in Data"),
    ("CO₂ Emissions", "Our World in Data"),
    ("Glacier Mass Loss", "Our World in Data"),
];

pub fn credits(ui: &mut Ui) {
    ui.heading("📚 Credits");
    ui.add_space(8.0);

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(200.0))
        .column(Column::remainder())
        .header(22.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("Dataset");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Source");
            });
        })
        .body(|mut body| {
            for (dataset, source) in SOURCES {
                body.row(20.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(dataset);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(source);
                    });
                });
            }
        });

    ui.add_space(8.0);
    ui.label(RichText::new("This dashboard is built for educational awareness. 🌏").italics());
}
