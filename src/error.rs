//! Application error types

use serde::Serialize;
use thiserror::Error;

/// Application-wide error type
///
/// Variants map onto the failure taxonomy of the monitor: transient external
/// failures (HTTP/API), insufficient data conditions (which skip the forecast
/// rather than abort the process), schema/validation problems, and model
/// artifact failures. The core never returns sentinel values in place of
/// these; only the presentation boundary renders them as warnings.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Insufficient history: need at least {needed} samples, have {got}")]
    InsufficientHistory { needed: usize, got: usize },

    #[error("Not enough data for window: need {needed} values, have {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("Model load error: {0}")]
    ModelLoad(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Serializable error response for the presentation boundary
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        let code = match &err {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Http(_) => "HTTP_ERROR",
            AppError::Api(_) => "API_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InsufficientHistory { .. } => "INSUFFICIENT_HISTORY",
            AppError::InsufficientData { .. } => "INSUFFICIENT_DATA",
            AppError::ModelLoad(_) => "MODEL_LOAD_ERROR",
            AppError::Model(_) => "MODEL_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        };

        ErrorResponse {
            code: code.to_string(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
