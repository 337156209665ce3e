use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Line, Plot, PlotPoints};

use crate::color::DisplayMetadata;
use crate::data::model::{CanonicalSeries, DatasetKind};

// ---------------------------------------------------------------------------
// Fixed chart theme
// ---------------------------------------------------------------------------

const CANVAS: Color32 = Color32::BLACK;
const INK: Color32 = Color32::WHITE;
const TITLE_SIZE: f32 = 18.0;
/// Width / height of the plotting area.
const ASPECT: f32 = 2.0;

// ---------------------------------------------------------------------------
// Per-dataset labelling
// ---------------------------------------------------------------------------

/// Title, axes and colour for a dataset's chart, optionally naming the entity.
pub fn chart_metadata(kind: DatasetKind, entity: Option<&str>) -> DisplayMetadata {
    let entity = entity.unwrap_or("");
    match kind {
        DatasetKind::Temperature => DisplayMetadata::new(
            "Global Temperature Anomalies",
            "Year",
            "Anomaly (°C)",
            "darkorange",
        ),
        DatasetKind::Disasters => DisplayMetadata::new(
            "Natural Disaster Events",
            "Year",
            "Number of Disasters",
            "crimson",
        ),
        DatasetKind::Forest => DisplayMetadata::new(
            format!("Forest Area Change in {entity}"),
            "Year",
            "Forest Change (hectares)",
            "forestgreen",
        ),
        DatasetKind::Co2 => DisplayMetadata::new(
            format!("CO₂ Emissions in {entity}"),
            "Year",
            "Emissions (tonnes)",
            "#CCCCCC",
        ),
        DatasetKind::Glacier => DisplayMetadata::new(
            format!("Mass Loss - {entity}"),
            "Year",
            "Cumulative Mass Loss (Gt)",
            "deepskyblue",
        ),
    }
}

pub fn forecast_metadata() -> DisplayMetadata {
    DisplayMetadata::new(
        "Projected Natural Disasters",
        "Year",
        "Predicted Number of Disasters",
        "violet",
    )
}

// ---------------------------------------------------------------------------
// Line chart
// ---------------------------------------------------------------------------

/// Series as plot coordinates, in period order.
pub fn plot_points(series: &CanonicalSeries) -> Vec<[f64; 2]> {
    series
        .points()
        .iter()
        .map(|&(p, v)| [f64::from(p), v])
        .collect()
}

/// Draw `series` as one connected line. An empty series draws empty axes.
pub fn line_chart(ui: &mut Ui, id: &str, series: &CanonicalSeries, meta: &DisplayMetadata) {
    egui::Frame::default()
        .fill(CANVAS)
        .inner_margin(8.0)
        .show(ui, |ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(RichText::new(&meta.title).size(TITLE_SIZE).strong().color(INK));
            });

            let points: PlotPoints = plot_points(series).into();
            let line = Line::new(points)
                .name(&meta.y_label)
                .color(meta.color)
                .width(2.0);

            Plot::new(id)
                .x_axis_label(RichText::new(&meta.x_label).color(INK))
                .y_axis_label(RichText::new(&meta.y_label).color(INK))
                .view_aspect(ASPECT)
                .allow_boxed_zoom(true)
                .allow_drag(true)
                .allow_scroll(false)
                .allow_zoom(true)
                .show(ui, |plot_ui| {
                    plot_ui.line(line);
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_follow_period_order() {
        let series = CanonicalSeries::from_observations(vec![
            (Some(2001), Some(2.0)),
            (Some(2000), Some(1.0)),
        ]);
        assert_eq!(plot_points(&series), vec![[2000.0, 1.0], [2001.0, 2.0]]);
        assert!(plot_points(&CanonicalSeries::default()).is_empty());
    }

    #[test]
    fn entity_appears_in_title() {
        let meta = chart_metadata(DatasetKind::Glacier, Some("Gulkana"));
        assert_eq!(meta.title, "Mass Loss - Gulkana");
        assert_eq!(meta.color, Color32::from_rgb(0, 191, 255));

        let co2 = chart_metadata(DatasetKind::Co2, Some("Chad"));
        assert_eq!(co2.title, "CO₂ Emissions in Chad");
        assert_eq!(co2.color, Color32::from_rgb(204, 204, 204));
    }
}
