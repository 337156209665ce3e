use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// ParseOptions – how a delimited file is read
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Physical records to discard before the header row.
    pub skip_rows: usize,
    pub delimiter: u8,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            skip_rows: 0,
            delimiter: b',',
        }
    }
}

impl ParseOptions {
    pub fn skip_rows(mut self, n: usize) -> Self {
        self.skip_rows = n;
        self
    }
}

// ---------------------------------------------------------------------------
// RawTable – untyped rectangular data as read from disk
// ---------------------------------------------------------------------------

/// Named columns over rows of text cells. Every row has exactly
/// `headers.len()` cells; an empty cell means "missing".
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Index of the column whose header matches `name` exactly.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of the first column whose header contains `marker`.
    pub fn column_containing(&self, marker: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.contains(marker))
    }

    /// Cell at (`row`, `col`), `""` when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Unique values of a column in order of first appearance.
    pub fn entities(&self, column: &str) -> Vec<String> {
        let Some(idx) = self.column_index(column) else {
            return Vec::new();
        };
        let mut seen = BTreeSet::new();
        self.rows
            .iter()
            .filter_map(|r| r.get(idx))
            .filter(|v| seen.insert(v.as_str()))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CanonicalSeries – the numeric contract for charts and forecasts
// ---------------------------------------------------------------------------

/// `(year, value)` pairs, ascending by year, years unique, values finite.
///
/// The only way in is [`CanonicalSeries::from_observations`], which drops
/// incomplete rows rather than filling them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalSeries {
    points: Vec<(i32, f64)>,
}

impl CanonicalSeries {
    /// Build from possibly-missing observations in source order.
    ///
    /// Rows with a missing period, a missing value or a non-finite value are
    /// dropped. When a period repeats, its first observation wins.
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = (Option<i32>, Option<f64>)>,
    {
        let mut points: Vec<(i32, f64)> = observations
            .into_iter()
            .filter_map(|(period, value)| match (period, value) {
                (Some(p), Some(v)) if v.is_finite() => Some((p, v)),
                _ => None,
            })
            .collect();
        // Stable sort keeps source order among equal periods.
        points.sort_by_key(|&(p, _)| p);
        points.dedup_by_key(|&mut (p, _)| p);
        Self { points }
    }

    pub fn points(&self) -> &[(i32, f64)] {
        &self.points
    }

    pub fn periods(&self) -> impl Iterator<Item = i32> + '_ {
        self.points.iter().map(|&(p, _)| p)
    }

    pub fn last_period(&self) -> Option<i32> {
        self.points.last().map(|&(p, _)| p)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ForecastResult
// ---------------------------------------------------------------------------

/// Predicted `(year, value)` pairs, all strictly after the fitted history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastResult {
    pub points: Vec<(i32, f64)>,
}

impl ForecastResult {
    /// View the prediction as a series so it can be charted like any other.
    pub fn to_series(&self) -> CanonicalSeries {
        CanonicalSeries::from_observations(self.points.iter().map(|&(p, v)| (Some(p), Some(v))))
    }
}

// ---------------------------------------------------------------------------
// DatasetKind – the five climate datasets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatasetKind {
    Temperature,
    Disasters,
    Forest,
    Co2,
    Glacier,
}

/// Entity column shared by the Our World in Data tables.
pub const ENTITY_COLUMN: &str = "Entity";
pub const YEAR_COLUMN: &str = "Year";
/// Marker in the GISTEMP header naming the annual (Jan–Dec) mean.
pub const ANNUAL_MARKER: &str = "J-D";
/// The aggregate row group in the disaster table.
pub const ALL_DISASTERS: &str = "All disasters";

impl DatasetKind {
    pub const ALL: [DatasetKind; 5] = [
        DatasetKind::Temperature,
        DatasetKind::Disasters,
        DatasetKind::Forest,
        DatasetKind::Co2,
        DatasetKind::Glacier,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            DatasetKind::Temperature => "GLB.Ts+dSST.csv",
            DatasetKind::Disasters => "number-of-natural-disaster-events.csv",
            DatasetKind::Forest => "annual-change-forest-area.csv",
            DatasetKind::Co2 => "annual-co2-emissions-per-country.csv",
            DatasetKind::Glacier => "mass-us-glaciers.csv",
        }
    }

    pub fn parse_options(self) -> ParseOptions {
        match self {
            // GISTEMP carries a title line above the header.
            DatasetKind::Temperature => ParseOptions::default().skip_rows(1),
            _ => ParseOptions::default(),
        }
    }

    /// Name of the value column (exact match), or `None` for temperature,
    /// which locates its column by [`ANNUAL_MARKER`].
    pub fn value_column(self) -> Option<&'static str> {
        match self {
            DatasetKind::Temperature => None,
            DatasetKind::Disasters => Some("Disasters"),
            DatasetKind::Forest => Some("Annual net change in forest area"),
            DatasetKind::Co2 => Some("Annual CO₂ emissions"),
            DatasetKind::Glacier => Some("Cumulative mass balance"),
        }
    }

    /// Whether rows are grouped by an [`ENTITY_COLUMN`].
    pub fn has_entities(self) -> bool {
        !matches!(self, DatasetKind::Temperature)
    }

    /// Source unit divisor: GISTEMP stores hundredths of a degree.
    pub fn divisor(self) -> f64 {
        match self {
            DatasetKind::Temperature => 100.0,
            _ => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DatasetKind::Temperature => "temperature",
            DatasetKind::Disasters => "disaster",
            DatasetKind::Forest => "forest",
            DatasetKind::Co2 => "CO₂",
            DatasetKind::Glacier => "glacier",
        }
    }

    pub fn toggle_label(self) -> &'static str {
        match self {
            DatasetKind::Temperature => "🌡 Show Temperature Anomalies",
            DatasetKind::Disasters => "🌪 Show Natural Disasters",
            DatasetKind::Forest => "🌳 Show Forest Area Change",
            DatasetKind::Co2 => "💨 Show CO₂ Emissions",
            DatasetKind::Glacier => "🧊 Show Glacier Mass Loss",
        }
    }

    /// Prompt for the entity selector, for datasets the user may slice.
    pub fn selector_label(self) -> Option<&'static str> {
        match self {
            DatasetKind::Forest => Some("🌳 Select Country for Forest Area Change"),
            DatasetKind::Co2 => Some("💨 Select Country for CO₂ Emissions"),
            DatasetKind::Glacier => Some("🧊 Select Glacier for Mass Loss"),
            _ => None,
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_drops_incomplete_and_non_finite_rows() {
        let series = CanonicalSeries::from_observations(vec![
            (Some(2001), Some(1.0)),
            (None, Some(2.0)),
            (Some(2002), None),
            (Some(2003), Some(f64::NAN)),
            (Some(2004), Some(f64::INFINITY)),
            (Some(2000), Some(0.5)),
        ]);
        assert_eq!(series.points(), &[(2000, 0.5), (2001, 1.0)]);
    }

    #[test]
    fn series_keeps_first_observation_of_repeated_period() {
        let series = CanonicalSeries::from_observations(vec![
            (Some(2010), Some(3.0)),
            (Some(2009), Some(1.0)),
            (Some(2010), Some(9.0)),
        ]);
        assert_eq!(series.points(), &[(2009, 1.0), (2010, 3.0)]);
        assert_eq!(series.last_period(), Some(2010));
    }

    #[test]
    fn entities_follow_first_appearance() {
        let table = RawTable::new(
            vec!["Entity".into(), "Year".into()],
            vec![
                vec!["Norway".into(), "2000".into()],
                vec!["Brazil".into(), "2000".into()],
                vec!["Norway".into(), "2001".into()],
            ],
        );
        assert_eq!(table.entities("Entity"), vec!["Norway", "Brazil"]);
        assert!(table.entities("Country").is_empty());
    }

    #[test]
    fn cell_out_of_range_is_empty() {
        let table = RawTable::new(vec!["a".into()], vec![vec!["1".into()]]);
        assert_eq!(table.cell(0, 0), "1");
        assert_eq!(table.cell(0, 3), "");
        assert_eq!(table.cell(5, 0), "");
    }
}
