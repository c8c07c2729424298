// src/error.rs

use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Unrecognizable input pltmode: '{mode}'")]
    UnrecognizedMode { mode: String },

    #[error("Plot mode '{mode}' needs two axis characters, found {found}")]
    ModeTooShort { mode: String, found: usize },

    #[error("Numbers of filenums and folds do not match ({filenums} filenums, {folds} folds)")]
    FoldCountMismatch { filenums: usize, folds: usize },

    #[error("Fold must be finite and non-zero, got {value}")]
    InvalidFold { value: f64 },

    #[error("Shared parameter count {sharenum} is never reached by the {available} parameters of the model")]
    SharedCountUnreachable { sharenum: usize, available: usize },

    #[error("{what}: expected {expected} parameters, got {got}")]
    ParamCount {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Unknown basis function '{name}'")]
    UnknownFunction { name: String },

    #[error("Normalized channel requested but '{filename}' has no normalization value")]
    NormalizationUnavailable { filename: String },

    #[error("Unknown legend location '{name}'")]
    UnknownLegendLocation { name: String },

    #[error("Expected {expected} panels, got {got}")]
    PanelCount { expected: usize, got: usize },

    #[error("No data rows in '{filename}'")]
    EmptyData { filename: String },

    #[error("Missing column '{column}' in '{filename}'")]
    MissingColumn { column: String, filename: String },

    #[error("No entry for '{key}' in '{filename}'")]
    MissingEntry { key: String, filename: String },

    #[error("Channel '{channel}' of '{filename}' has {got} values, expected {expected}")]
    ChannelLength {
        filename: String,
        channel: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Invalid NMR time step {value}")]
    InvalidTimeStep { value: f64 },

    #[error("Invalid zero-fill count {value} in '{filename}'")]
    InvalidZeroFill { value: f64, filename: String },

    #[error("Non-numeric value '{value}' in column {column} of '{filename}'")]
    InvalidNumber {
        value: String,
        column: usize,
        filename: String,
    },

    #[error("Invalid frequency window: low {low} > high {high}")]
    InvalidWindow { low: f64, high: f64 },
}

// src/error.rs
