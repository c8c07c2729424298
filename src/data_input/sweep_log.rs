// src/data_input/sweep_log.rs

use std::error::Error;
use std::path::Path;

use crate::constants::{LOG_FILENAME_COLUMN, LOG_TEMPERATURE_COLUMN};
use crate::data_input::file_naming::matches_file;
use crate::data_input::table::{parse_cell, Table};
use crate::error::RenderError;

/// Per-sweep values recorded in the sweep log.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SweepLogEntry {
    /// Mixing-chamber temperature in mK.
    pub temperature_mk: Option<f64>,
    /// Value of the normalization column (e.g. drive amplitude).
    pub norm_value: Option<f64>,
}

/// Looks up the row describing `filename` in the sweep log at `log_path`.
pub fn lookup_sweep_log(
    log_path: &Path,
    filename: &str,
    norm_param: &str,
) -> Result<SweepLogEntry, Box<dyn Error>> {
    let table = Table::read(log_path)?;
    let name_col = table.require_column(LOG_FILENAME_COLUMN)?;
    let temp_col = table.column_index(LOG_TEMPERATURE_COLUMN);
    let norm_col = table.column_index(norm_param);

    let record = table
        .records
        .iter()
        .find(|r| r.get(name_col).is_some_and(|key| matches_file(key, filename)))
        .ok_or_else(|| RenderError::MissingEntry {
            key: filename.to_string(),
            filename: table.source.clone(),
        })?;

    Ok(SweepLogEntry {
        temperature_mk: temp_col.and_then(|c| parse_cell(record.get(c))),
        norm_value: norm_col.and_then(|c| parse_cell(record.get(c))),
    })
}
