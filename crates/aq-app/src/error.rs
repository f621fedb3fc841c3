//! Error types for the aq-app service layer.

use std::path::PathBuf;

/// Hard failures of a run.
///
/// Stage status codes are never turned into errors; they are recorded in the
/// run result. Only problems that stop a run from starting, or from being
/// persisted, end up here.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid run configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read configuration file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to write input file: {path}")]
    InputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Hydraulics file not found: {path}")]
    MissingHydraulicsFile { path: PathBuf },

    #[error("Toolkit error: {0}")]
    Toolkit(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for aq-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<aq_core::AqError> for AppError {
    fn from(err: aq_core::AqError) -> Self {
        AppError::InvalidConfig(err.to_string())
    }
}

impl From<aq_toolkit::ToolkitError> for AppError {
    fn from(err: aq_toolkit::ToolkitError) -> Self {
        AppError::Toolkit(err.to_string())
    }
}

impl From<aq_results::ResultsError> for AppError {
    fn from(err: aq_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}

impl From<aq_results::DecodeError> for AppError {
    fn from(err: aq_results::DecodeError) -> Self {
        AppError::Results(err.to_string())
    }
}
