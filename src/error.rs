use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConstMapError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid regex pattern: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Class '{class}' not found in {file}")]
    ClassNotFound { file: String, class: String },

    #[error("Unsupported initializer for constant {class}.{field}: {text}")]
    InvalidInitializer {
        class: String,
        field: String,
        text: String,
    },

    #[error("Report not found: {0}")]
    ReportNotFound(PathBuf),

    #[error("Report inconsistent with source tree at {file}:{line}: {reason}")]
    ReportMismatch {
        file: String,
        line: usize,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, ConstMapError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
