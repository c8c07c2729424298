// src/data_input/mod.rs

pub mod file_naming;
pub mod fit_params;
pub mod nmr_data;
pub mod sweep_data;
pub mod sweep_log;
pub mod table;

// src/data_input/mod.rs
