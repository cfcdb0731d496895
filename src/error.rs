//! Error types for the dashboard core

use thiserror::Error;

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {

    // =============================
    // Upload Errors
    // =============================

    /// Uploaded text is not valid JSON
    #[error("File is not valid JSON: {0}")]
    ParseError(#[source] serde_json::Error),

    /// JSON is valid but a required top-level field is missing or not an array
    #[error("Invalid record set: {0}")]
    ShapeError(String),

    // =============================
    // Remote Call Errors
    // =============================

    #[error("Backend error: {0}")]
    BackendError(String),

    // =============================
    // Local Errors
    // =============================

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DashboardError {
    /// Field-level shape error, phrased the way the inline error region shows it
    pub fn missing_field(field: &str) -> Self {
        DashboardError::ShapeError(format!(
            "required field '{}' is missing or is not an array \
             (expected assets, liabilities, goals, transactions)",
            field
        ))
    }

    pub fn backend(context: &str, cause: impl std::fmt::Display) -> Self {
        DashboardError::BackendError(format!("{}: {}", context, cause))
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(e: reqwest::Error) -> Self {
        DashboardError::BackendError(format!("network or backend error: {}", e))
    }
}
