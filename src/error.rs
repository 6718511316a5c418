/// Centralized error types for the volatility tracker
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VolaError {
    // Network Errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Upstream data source error: {0}")]
    UpstreamError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    // Data Errors
    #[error("Unknown interval: {0}")]
    UnknownInterval(String),

    #[error("Deserialization failed: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // Configuration Errors
    #[error("Missing configuration: {0} is not set")]
    MissingConfig(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    // Authentication Errors
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Token signing failed: {0}")]
    TokenSigningFailed(#[from] jsonwebtoken::errors::Error),

    // Export Errors
    #[error("Excel export failed: {0}")]
    ExcelError(#[from] rust_xlsxwriter::XlsxError),

    #[error("Spreadsheet API error: {status} - {message}")]
    SheetsApiError { status: u16, message: String },

    // File I/O Errors
    #[error("File I/O error: {0}")]
    FileError(#[from] std::io::Error),
}

impl From<config::ConfigError> for VolaError {
    fn from(e: config::ConfigError) -> Self {
        VolaError::ConfigError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VolaError>;

impl VolaError {
    /// Check if a later refresh may succeed without operator action
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            VolaError::HttpError(_)
                | VolaError::UpstreamError(_)
                | VolaError::RateLimitExceeded(_)
        )
    }

    /// Get error code for logging
    pub fn error_code(&self) -> &str {
        match self {
            VolaError::HttpError(_) => "NET_001",
            VolaError::UpstreamError(_) => "NET_002",
            VolaError::RateLimitExceeded(_) => "NET_003",
            VolaError::UnknownInterval(_) => "DATA_001",
            VolaError::DeserializationError(_) => "DATA_002",
            VolaError::CsvError(_) => "DATA_003",
            VolaError::MissingConfig(_) => "CFG_001",
            VolaError::ConfigError(_) => "CFG_002",
            VolaError::InvalidParameter(_) => "CFG_003",
            VolaError::AuthenticationFailed(_) => "AUTH_001",
            VolaError::TokenSigningFailed(_) => "AUTH_002",
            VolaError::ExcelError(_) => "EXPORT_001",
            VolaError::SheetsApiError { .. } => "EXPORT_002",
            VolaError::FileError(_) => "FILE_001",
        }
    }
}
