//! Error types for StorePulse
//!
//! The analytics engine itself is total and never returns these; they cover the
//! collaborators around it (config, import, report assembly).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Narrative error: {0}")]
    Narrative(String),
}

pub type Result<T> = std::result::Result<T, Error>;
