// src/data_input/table.rs

use csv::{ReaderBuilder, StringRecord};
use std::error::Error;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::RenderError;

/// A comma-separated file with a header row, read eagerly.
#[derive(Debug, Clone)]
pub struct Table {
    pub source: String,
    pub headers: Vec<String>,
    pub records: Vec<StringRecord>,
}

impl Table {
    pub fn read(path: &Path) -> Result<Self, Box<dyn Error>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .comment(Some(b'#'))
            .from_path(path)?;
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_matches('"').to_string())
            .collect();
        debug!("Headers found in '{}': {:?}", path.display(), headers);

        let mut records = Vec::new();
        for (row_index, result) in reader.records().enumerate() {
            match result {
                Ok(record) => records.push(record),
                Err(e) => warn!(
                    "Skipping unreadable row {} in '{}': {}",
                    row_index + 1,
                    path.display(),
                    e
                ),
            }
        }
        Ok(Table {
            source: path.display().to_string(),
            headers,
            records,
        })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    }

    pub fn require_column(&self, name: &str) -> Result<usize, RenderError> {
        self.column_index(name)
            .ok_or_else(|| RenderError::MissingColumn {
                column: name.to_string(),
                filename: self.source.clone(),
            })
    }

    /// Numeric column; unparseable cells become NaN.
    pub fn numeric_column(&self, index: usize) -> Vec<f64> {
        self.records
            .iter()
            .map(|record| parse_cell(record.get(index)).unwrap_or(f64::NAN))
            .collect()
    }
}

pub fn parse_cell(cell: Option<&str>) -> Option<f64> {
    cell.and_then(|s| s.trim().trim_matches('"').parse::<f64>().ok())
}
