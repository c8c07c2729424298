// src/axis_names.rs

//! Centralized axis labelling
//!
//! Labels are derived from the stripped axis character of a plot mode, so gain
//! correction and normalization modifiers never change the label text.

use crate::plot_mode::{NmrAxis, SweepAxis};

pub const LABEL_FREQUENCY: &str = "Frequency (Hz)";
pub const LABEL_X_CHANNEL: &str = "X-channel (Vpp)";
pub const LABEL_Y_CHANNEL: &str = "Y-channel (Vpp)";
pub const LABEL_R_CHANNEL: &str = "R-channel (Vpp)";
pub const LABEL_RESIDUAL: &str = "Residual (Vpp)";

pub const LABEL_TIME: &str = "Time (s)";
pub const LABEL_FID: &str = "FID Amplitude (a.u.)";
pub const LABEL_FFT_REAL: &str = "FFT Real (a.u.)";
pub const LABEL_FFT_IMAG: &str = "FFT Imaginary (a.u.)";
pub const LABEL_FFT_MAGNITUDE: &str = "FFT Magnitude (a.u.)";
pub const LABEL_FFT_PHASE: &str = "FFT Phase (rad)";

/// Axis label for a sweep channel
pub fn sweep_axis_label(axis: SweepAxis) -> &'static str {
    match axis {
        SweepAxis::Frequency => LABEL_FREQUENCY,
        SweepAxis::X => LABEL_X_CHANNEL,
        SweepAxis::Y => LABEL_Y_CHANNEL,
        SweepAxis::R => LABEL_R_CHANNEL,
    }
}

/// Axis label for an NMR channel
pub fn nmr_axis_label(axis: NmrAxis) -> &'static str {
    match axis {
        NmrAxis::Time => LABEL_TIME,
        NmrAxis::Fid => LABEL_FID,
        NmrAxis::Frequency => LABEL_FREQUENCY,
        NmrAxis::FftReal => LABEL_FFT_REAL,
        NmrAxis::FftImag => LABEL_FFT_IMAG,
        NmrAxis::FftMagnitude => LABEL_FFT_MAGNITUDE,
        NmrAxis::FftPhase => LABEL_FFT_PHASE,
    }
}


// src/axis_names.rs
