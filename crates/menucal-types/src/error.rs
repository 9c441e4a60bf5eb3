//! Error types for menucal

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Gemini API key is not configured")]
    MissingApiKey,
}

/// Persistence-related errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("No text found in image")]
    NoTextFound,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Estimation response format error: {0}")]
    EstimationFormat(String),

    #[error("No dishes found in menu text")]
    NoDishesFound,

    #[error("Estimation service rate limited, try again later")]
    RateLimited,

    #[error("Estimation service error (HTTP {status}): {body}")]
    EstimationService { status: u16, body: String },

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Daily free scan limit reached")]
    QuotaExhausted,

    #[error("A scan is already in progress")]
    ScanInProgress,
}

pub type Result<T> = std::result::Result<T, ScanError>;
