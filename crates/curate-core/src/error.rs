//! Error types for curate

use thiserror::Error;

/// The main error type for curate operations
#[derive(Debug, Error)]
pub enum CurateError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config load error: {0}")]
    ConfigLoad(String),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Invalid pattern: {0}")]
    Pattern(String),

    #[error("Discovery error: {0}")]
    Discovery(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("YAML error: {0}")]
    Yaml(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Tidy error: {0}")]
    Tidy(String),
}

/// Result type alias for curate operations
pub type Result<T> = std::result::Result<T, CurateError>;

impl From<serde_json::Error> for CurateError {
    fn from(err: serde_json::Error) -> Self {
        CurateError::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for CurateError {
    fn from(err: serde_yaml::Error) -> Self {
        CurateError::Yaml(err.to_string())
    }
}
