use super::model::{
    CanonicalSeries, DatasetKind, RawTable, ANNUAL_MARKER, ENTITY_COLUMN, YEAR_COLUMN,
};
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

/// Parse a cell as a number; blank, `***`, `NA` and other text are missing.
pub fn coerce_f64(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a cell as a whole year. `"2020"` and `"2020.0"` both qualify;
/// fractional or out-of-range values are missing.
pub fn coerce_year(cell: &str) -> Option<i32> {
    let cell = cell.trim();
    if let Ok(y) = cell.parse::<i32>() {
        return Some(y);
    }
    let v = coerce_f64(cell)?;
    if v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64 {
        Some(v as i32)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Turn one dataset's table into a canonical series.
///
/// For multi-entity datasets `entity` restricts rows to that entity; an
/// entity with no rows yields an empty series. `None` keeps every row.
/// The table is only read.
pub fn extract(kind: DatasetKind, table: &RawTable, entity: Option<&str>) -> Result<CanonicalSeries> {
    let missing = |column: &str| DashboardError::SchemaMismatch {
        dataset: kind.label().to_string(),
        column: column.to_string(),
    };

    let (year_idx, value_idx) = match kind.value_column() {
        None => {
            // Year is positional; the annual mean is found by marker.
            if table.headers.is_empty() {
                return Err(missing(YEAR_COLUMN));
            }
            let value_idx = table
                .column_containing(ANNUAL_MARKER)
                .ok_or_else(|| missing(ANNUAL_MARKER))?;
            (0, value_idx)
        }
        Some(value_col) => {
            let year_idx = table.column_index(YEAR_COLUMN).ok_or_else(|| missing(YEAR_COLUMN))?;
            let value_idx = table.column_index(value_col).ok_or_else(|| missing(value_col))?;
            (year_idx, value_idx)
        }
    };

    let entity_idx = match (kind.has_entities(), entity) {
        (true, Some(_)) => Some(
            table
                .column_index(ENTITY_COLUMN)
                .ok_or_else(|| missing(ENTITY_COLUMN))?,
        ),
        _ => None,
    };

    let divisor = kind.divisor();
    let observations = table
        .rows
        .iter()
        .filter(|row| match (entity_idx, entity) {
            (Some(idx), Some(wanted)) => row.get(idx).map(String::as_str) == Some(wanted),
            _ => true,
        })
        .map(|row| {
            let year = row.get(year_idx).and_then(|c| coerce_year(c));
            let value = row.get(value_idx).and_then(|c| coerce_f64(c)).map(|v| v / divisor);
            (year, value)
        });

    Ok(CanonicalSeries::from_observations(observations))
}

/// [`extract`], with failures turned into a displayable warning.
pub fn extract_or_warn(
    kind: DatasetKind,
    table: &RawTable,
    entity: Option<&str>,
) -> std::result::Result<CanonicalSeries, String> {
    extract(kind, table, entity).map_err(|e| format!("⚠ {e}"))
}
