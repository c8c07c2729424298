// src/data_analysis/gain_correction.rs

//! Frequency roll-off correction of the lock-in X/Y channels.

use std::fmt;

use crate::constants::DEFAULT_ROLLOFF_CORNER_HZ;

/// Removes the measurement chain's frequency response from a complex reading.
pub trait GainCorrection: fmt::Debug {
    /// Returns the corrected `(x, y)` pair measured at frequency `f`.
    fn correct(&self, f: f64, x: f64, y: f64) -> (f64, f64);
}

/// Leaves readings untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uncorrected;

impl GainCorrection for Uncorrected {
    fn correct(&self, _f: f64, x: f64, y: f64) -> (f64, f64) {
        (x, y)
    }
}

/// Single-pole low-pass response `H(f) = 1 / (1 + i f / fc)`, divided out.
#[derive(Debug, Clone, Copy)]
pub struct FirstOrderRolloff {
    pub corner_hz: f64,
}

impl Default for FirstOrderRolloff {
    fn default() -> Self {
        FirstOrderRolloff {
            corner_hz: DEFAULT_ROLLOFF_CORNER_HZ,
        }
    }
}

impl GainCorrection for FirstOrderRolloff {
    fn correct(&self, f: f64, x: f64, y: f64) -> (f64, f64) {
        if !self.corner_hz.is_finite() || self.corner_hz <= 0.0 {
            return (x, y);
        }
        // (x + iy) * (1 + i f/fc)
        let w = f / self.corner_hz;
        (x - y * w, y + x * w)
    }
}
