// crates/traverse-core/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Glob pattern error: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Glob walk error: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("Parser error: {0}")]
    Parser(#[from] traverse_parser::ParserError),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("no logger file matching '{pattern}' in {day}")]
    MissingLoggerFile { day: String, pattern: String },

    #[error("no usable GPS fixes for day {day}")]
    EmptyTrack { day: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
