// src/data_analysis/mod.rs

pub mod decomposition;
pub mod fft_utils;
pub mod fid_model;
pub mod fit_model;
pub mod frequency_window;
pub mod gain_correction;

// src/data_analysis/mod.rs
