// crates/eddyflux-core/src/error.rs

use thiserror::Error;

/// Deterministic numeric faults raised by the estimation core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Empty input: {0} has no values")]
    EmptyInput(&'static str),

    #[error("Length mismatch: {left} has {left_len} values, {right} has {right_len}")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    #[error("Degenerate series: {0} has zero variance")]
    DegenerateSeries(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient data: need {required} values, have {available}")]
    InsufficientData { required: usize, available: usize },
}

pub type StatsResult<T> = std::result::Result<T, StatsError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing failed: {0}")]
    Parser(#[from] eddyflux_parser::ParserError),

    #[error("Statistics failed: {0}")]
    Stats(#[from] StatsError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
