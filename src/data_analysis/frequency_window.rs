// src/data_analysis/frequency_window.rs

use ndarray::Array1;

use crate::error::{RenderError, RenderResult};

/// Inclusive frequency bounds used to restrict fitted curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyWindow {
    pub low: f64,
    pub high: f64,
}

impl Default for FrequencyWindow {
    fn default() -> Self {
        FrequencyWindow {
            low: f64::NEG_INFINITY,
            high: f64::INFINITY,
        }
    }
}

impl FrequencyWindow {
    pub fn new(low: Option<f64>, high: Option<f64>) -> RenderResult<Self> {
        let window = FrequencyWindow {
            low: low.unwrap_or(f64::NEG_INFINITY),
            high: high.unwrap_or(f64::INFINITY),
        };
        if window.low > window.high {
            return Err(RenderError::InvalidWindow {
                low: window.low,
                high: window.high,
            });
        }
        Ok(window)
    }

    pub fn contains(&self, f: f64) -> bool {
        f >= self.low && f <= self.high
    }

    /// Per-sample membership of `f` in the window.
    pub fn mask(&self, f: &Array1<f64>) -> Vec<bool> {
        f.iter().map(|&v| self.contains(v)).collect()
    }
}

/// Keeps the elements of `values` whose mask entry is set.
pub fn select(values: &Array1<f64>, mask: &[bool]) -> Array1<f64> {
    values
        .iter()
        .zip(mask)
        .filter_map(|(&v, &keep)| keep.then_some(v))
        .collect()
}
