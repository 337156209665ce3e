use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::data::extract::extract_or_warn;
use crate::data::loader;
use crate::data::model::{CanonicalSeries, DatasetKind, ForecastResult, RawTable, ALL_DISASTERS};
use crate::forecast::{self, LinearFit};
use crate::narrator::{self, Narrator, PendingAnswer, RevealSequence};

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Awareness,
    AskAi,
    Forecast,
    Credits,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Dashboard, Tab::Awareness, Tab::AskAi, Tab::Forecast, Tab::Credits];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "🌍 Dashboard",
            Tab::Awareness => "📢 Awareness & Solutions",
            Tab::AskAi => "🤖 Ask Planet AI",
            Tab::Forecast => "🔮 Disaster Forecast",
            Tab::Credits => "📚 Credits",
        }
    }
}

// ---------------------------------------------------------------------------
// AI answer lifecycle
// ---------------------------------------------------------------------------

/// Where one AI reply currently is.
pub enum AnswerPhase {
    Idle,
    Waiting { pending: PendingAnswer, reveal: bool },
    Revealing { frames: RevealSequence, shown: String, due: Instant },
    Done(String),
    Failed(String),
}

impl AnswerPhase {
    pub fn start(narrator: Arc<dyn Narrator>, prompt: String, reveal: bool) -> Self {
        AnswerPhase::Waiting {
            pending: PendingAnswer::spawn(narrator, prompt),
            reveal,
        }
    }

    /// Advance by the clock. Returns `true` while more frames are coming.
    pub fn tick(&mut self, now: Instant, interval: Duration) -> bool {
        match self {
            AnswerPhase::Idle | AnswerPhase::Done(_) | AnswerPhase::Failed(_) => false,
            AnswerPhase::Waiting { pending, reveal } => {
                let reveal = *reveal;
                match pending.poll() {
                    None => {}
                    Some(Err(e)) => *self = AnswerPhase::Failed(format!("⚠ Error: {e}")),
                    Some(Ok(text)) if reveal => {
                        *self = AnswerPhase::Revealing {
                            frames: RevealSequence::new(text),
                            shown: String::new(),
                            due: now,
                        }
                    }
                    Some(Ok(text)) => *self = AnswerPhase::Done(text),
                }
                true
            }
            AnswerPhase::Revealing { frames, shown, due } => {
                while *due <= now {
                    match frames.next() {
                        Some(frame) => *shown = frame,
                        None => break,
                    }
                    *due += interval;
                }
                if frames.is_done() {
                    let text = frames.text().to_string();
                    *self = AnswerPhase::Done(text);
                    return false;
                }
                true
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, AnswerPhase::Waiting { .. } | AnswerPhase::Revealing { .. })
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,
    narrator: Arc<dyn Narrator>,

    /// Loaded tables; `None` when the file could not be read.
    pub tables: BTreeMap<DatasetKind, Option<RawTable>>,

    /// Load warning per dataset, shown in that dataset's section only.
    pub load_warnings: BTreeMap<DatasetKind, String>,

    /// Per-chart visibility toggles.
    pub visible: BTreeMap<DatasetKind, bool>,

    /// Selected entity for datasets with a selector.
    pub selections: BTreeMap<DatasetKind, String>,

    pub active_tab: Tab,

    pub question: String,
    pub answer: AnswerPhase,
    pub forecast_summary: AnswerPhase,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig, narrator: Arc<dyn Narrator>) -> Self {
        let mut state = Self {
            config,
            narrator,
            tables: BTreeMap::new(),
            load_warnings: BTreeMap::new(),
            visible: DatasetKind::ALL.iter().map(|&k| (k, true)).collect(),
            selections: BTreeMap::new(),
            active_tab: Tab::Dashboard,
            question: String::new(),
            answer: AnswerPhase::Idle,
            forecast_summary: AnswerPhase::Idle,
            status_message: None,
        };
        state.reload_data();
        state
    }

    /// (Re)read every dataset from the data directory.
    pub fn reload_data(&mut self) {
        self.load_warnings.clear();
        for kind in DatasetKind::ALL {
            let path = self.config.dataset_path(kind.file_name());
            let mut warnings = Vec::new();
            let table = loader::load(&path, &kind.parse_options(), &mut warnings);
            if let Some(w) = warnings.pop() {
                self.load_warnings.insert(kind, w);
            }
            self.tables.insert(kind, table);
        }
        self.reset_selections();

        let loaded = self.tables.values().filter(|t| t.is_some()).count();
        log::info!(
            "{loaded}/{} datasets loaded from {}",
            DatasetKind::ALL.len(),
            self.config.data_dir.display()
        );
    }

    pub fn set_data_dir(&mut self, dir: PathBuf) {
        self.config.data_dir = dir;
        self.status_message = None;
        self.reload_data();
    }

    /// Keep a still-valid selection, otherwise pick the first entity.
    fn reset_selections(&mut self) {
        for kind in DatasetKind::ALL {
            if kind.selector_label().is_none() {
                continue;
            }
            let entities = self.entities(kind);
            let keep = self
                .selections
                .get(&kind)
                .is_some_and(|sel| entities.contains(sel));
            if !keep {
                match entities.into_iter().next() {
                    Some(first) => {
                        self.selections.insert(kind, first);
                    }
                    None => {
                        self.selections.remove(&kind);
                    }
                }
            }
        }
    }

    pub fn table(&self, kind: DatasetKind) -> Option<&RawTable> {
        self.tables.get(&kind).and_then(Option::as_ref)
    }

    pub fn entities(&self, kind: DatasetKind) -> Vec<String> {
        self.table(kind)
            .map(|t| t.entities(crate::data::model::ENTITY_COLUMN))
            .unwrap_or_default()
    }

    /// Entity the chart for `kind` is restricted to.
    pub fn entity_for(&self, kind: DatasetKind) -> Option<&str> {
        match kind {
            DatasetKind::Temperature => None,
            DatasetKind::Disasters => Some(ALL_DISASTERS),
            _ => self.selections.get(&kind).map(String::as_str),
        }
    }

    pub fn select_entity(&mut self, kind: DatasetKind, entity: String) {
        self.selections.insert(kind, entity);
    }

    pub fn is_visible(&self, kind: DatasetKind) -> bool {
        self.visible.get(&kind).copied().unwrap_or(true)
    }

    /// Series for one chart, recomputed on every call.
    ///
    /// `None` when the table never loaded; `Err` carries a schema warning.
    pub fn series(&self, kind: DatasetKind) -> Option<Result<CanonicalSeries, String>> {
        let table = self.table(kind)?;
        Some(extract_or_warn(kind, table, self.entity_for(kind)))
    }

    /// Fit the aggregate disaster series and project it over the horizon.
    pub fn disaster_forecast(&self) -> Option<Result<(LinearFit, ForecastResult), String>> {
        let series = self.series(DatasetKind::Disasters)?;
        let years = forecast::horizon(self.config.forecast.first_year, self.config.forecast.last_year);
        Some(series.and_then(|s| {
            let result = forecast::forecast(&s, &years).map_err(|e| format!("⚠ {e}"))?;
            let fit = LinearFit::fit(&s).map_err(|e| format!("⚠ {e}"))?;
            Ok((fit, result))
        }))
    }

    // ---- Tabs and AI requests ----

    /// Switch tab. Entering the forecast tab requests a fresh summary.
    pub fn open_tab(&mut self, tab: Tab) {
        if tab == Tab::Forecast && self.active_tab != Tab::Forecast && !self.forecast_summary.is_busy() {
            let f = self.config.forecast;
            self.forecast_summary = AnswerPhase::start(
                Arc::clone(&self.narrator),
                narrator::forecast_prompt(f.first_year, f.last_year),
                false,
            );
        }
        self.active_tab = tab;
    }

    /// Send the current question, unless it is blank or one is in flight.
    pub fn ask(&mut self) {
        if self.question.trim().is_empty() || self.answer.is_busy() {
            return;
        }
        self.answer = AnswerPhase::start(
            Arc::clone(&self.narrator),
            narrator::question_prompt(&self.question),
            true,
        );
    }

    /// Advance both AI replies. Returns `true` if a repaint is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let interval = Duration::from_millis(self.config.reveal_interval_ms);
        let a = self.answer.tick(now, interval);
        let b = self.forecast_summary.tick(now, interval);
        a || b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrator::CannedNarrator;
    use std::fs;

    fn write_data_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(DatasetKind::Temperature.file_name()),
            "Land-Ocean: Global Means\nYear,Jan,J-D\n2020,117,98\n2021,85,85\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(DatasetKind::Disasters.file_name()),
            "Entity,Code,Year,Disasters\n\
             All disasters,,2020,400\nAll disasters,,2021,420\nAll disasters,,2022,440\nFlood,,2021,150\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(DatasetKind::Forest.file_name()),
            "Entity,Code,Year,Annual net change in forest area\nBrazil,BRA,2000,-100\nChina,CHN,2000,200\n",
        )
        .unwrap();
        // CO2 and glacier files are deliberately absent.
        dir
    }

    fn state_with(dir: &tempfile::TempDir, narrator: CannedNarrator) -> AppState {
        let config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            reveal_interval_ms: 1,
            ..AppConfig::default()
        };
        AppState::new(config, Arc::new(narrator))
    }

    fn run_until_idle(phase: &mut AnswerPhase) {
        let start = Instant::now();
        while phase.tick(Instant::now(), Duration::from_millis(1)) {
            assert!(start.elapsed() < Duration::from_secs(5), "reply never settled");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn missing_files_degrade_only_their_sections() {
        let dir = write_data_dir();
        let state = state_with(&dir, CannedNarrator::replying("ok"));

        assert!(state.table(DatasetKind::Co2).is_none());
        assert!(state.table(DatasetKind::Glacier).is_none());
        assert!(state.load_warnings[&DatasetKind::Co2].contains("annual-co2-emissions-per-country.csv"));
        assert!(!state.load_warnings.contains_key(&DatasetKind::Temperature));

        assert!(state.series(DatasetKind::Co2).is_none());
        let temp = state.series(DatasetKind::Temperature).unwrap().unwrap();
        assert_eq!(temp.points(), &[(2020, 0.98), (2021, 0.85)]);
    }

    #[test]
    fn selectors_default_to_first_entity() {
        let dir = write_data_dir();
        let mut state = state_with(&dir, CannedNarrator::replying("ok"));

        assert_eq!(state.entity_for(DatasetKind::Forest), Some("Brazil"));
        assert_eq!(state.entity_for(DatasetKind::Disasters), Some(ALL_DISASTERS));
        assert_eq!(
            state.series(DatasetKind::Forest).unwrap().unwrap().points(),
            &[(2000, -100.0)]
        );

        state.select_entity(DatasetKind::Forest, "China".into());
        state.reload_data();
        assert_eq!(state.entity_for(DatasetKind::Forest), Some("China"));
    }

    #[test]
    fn disaster_forecast_covers_horizon() {
        let dir = write_data_dir();
        let state = state_with(&dir, CannedNarrator::replying("ok"));

        let (fit, result) = state.disaster_forecast().unwrap().unwrap();
        assert!((fit.slope - 20.0).abs() < 1e-9);
        assert_eq!(result.points.first().map(|p| p.0), Some(2025));
        assert_eq!(result.points.last().map(|p| p.0), Some(2040));
        assert!((result.points[0].1 - 500.0).abs() < 1e-6);
    }

    #[test]
    fn disaster_forecast_matches_engine_and_reports_short_history() {
        let dir = write_data_dir();
        fs::write(
            dir.path().join(DatasetKind::Disasters.file_name()),
            "Entity,Code,Year,Disasters\nAll disasters,,2020,400\nFlood,,2021,150\n",
        )
        .unwrap();
        let state = state_with(&dir, CannedNarrator::replying("ok"));

        let warning = state.disaster_forecast().unwrap().unwrap_err();
        assert!(warning.contains("Not enough data"), "got {warning}");

        let full = write_data_dir();
        let state = state_with(&full, CannedNarrator::replying("ok"));
        let series = state.series(DatasetKind::Disasters).unwrap().unwrap();
        let (_, result) = state.disaster_forecast().unwrap().unwrap();
        assert_eq!(result, forecast::forecast(&series, &forecast::horizon(2025, 2040)).unwrap());
    }

    #[test]
    fn question_is_revealed_then_done() {
        let dir = write_data_dir();
        let mut state = state_with(&dir, CannedNarrator::replying("Plant trees."));

        state.ask();
        assert!(matches!(state.answer, AnswerPhase::Idle));

        state.question = "How can I help?".into();
        state.ask();
        assert!(state.answer.is_busy());
        run_until_idle(&mut state.answer);
        assert!(matches!(&state.answer, AnswerPhase::Done(t) if t == "Plant trees."));
    }

    #[test]
    fn service_error_is_scoped_to_answer() {
        let dir = write_data_dir();
        let mut state = state_with(&dir, CannedNarrator::failing("quota exceeded"));

        state.question = "Why?".into();
        state.ask();
        run_until_idle(&mut state.answer);
        assert!(matches!(&state.answer, AnswerPhase::Failed(m) if m.contains("quota exceeded")));
        assert!(state.series(DatasetKind::Temperature).unwrap().is_ok());
    }

    #[test]
    fn opening_forecast_tab_requests_summary() {
        let dir = write_data_dir();
        let mut state = state_with(&dir, CannedNarrator::replying("More storms."));

        state.open_tab(Tab::Credits);
        assert!(matches!(state.forecast_summary, AnswerPhase::Idle));

        state.open_tab(Tab::Forecast);
        run_until_idle(&mut state.forecast_summary);
        assert!(matches!(&state.forecast_summary, AnswerPhase::Done(t) if t == "More storms."));
    }
}
