use std::path::Path;

use super::model::{ParseOptions, RawTable};
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a delimited table, converting any failure into a warning.
///
/// This is the one boundary where errors become values: on failure a single
/// message naming `path` is pushed onto `warnings` and `None` is returned.
pub fn load(path: &Path, options: &ParseOptions, warnings: &mut Vec<String>) -> Option<RawTable> {
    match read_table(path, options) {
        Ok(table) => {
            log::info!(
                "Loaded {} rows with columns {:?} from {}",
                table.len(),
                table.headers,
                path.display()
            );
            Some(table)
        }
        Err(e) => {
            log::warn!("{e}");
            warnings.push(format!("⚠ {e}"));
            None
        }
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Layout: `skip_rows` records of preamble, one header record, then data.
///
/// Short rows are padded with empty (missing) cells; a row with more
/// fields than the header is malformed.
pub fn read_table(path: &Path, options: &ParseOptions) -> Result<RawTable> {
    let failure = |reason: String| DashboardError::LoadFailure {
        path: path.display().to_string(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_path(path)
        .map_err(|e| failure(e.to_string()))?;

    let mut records = reader.records().skip(options.skip_rows);

    let headers: Vec<String> = match records.next() {
        Some(rec) => rec
            .map_err(|e| failure(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect(),
        None => return Err(failure("no header row".to_string())),
    };

    let mut rows = Vec::new();
    for (row_no, result) in records.enumerate() {
        let record = result.map_err(|e| failure(e.to_string()))?;
        if record.len() > headers.len() {
            return Err(failure(format!(
                "row {}: expected {} fields, saw {}",
                row_no + 1,
                headers.len(),
                record.len()
            )));
        }
        let mut row: Vec<String> = record.iter().map(|c| c.trim().to_string()).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(RawTable::new(headers, rows))
}
