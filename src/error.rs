use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("Failed to parse URL: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Failed to fetch content: {0}")]
    FetchError(String),

    #[error("Request timeout: {0}")]
    TimeoutError(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("External service error: {service} - {message}")]
    ExternalServiceError { service: String, message: String },
}

impl EnrichError {
    pub fn log(&self) {
        match self {
            EnrichError::UrlParseError(e) => {
                warn!(error = %e, "URL parsing failed");
            }
            EnrichError::FetchError(e) => {
                error!(error = %e, "Content fetch failed");
            }
            EnrichError::TimeoutError(e) => {
                warn!(error = %e, "Request timed out");
            }
            EnrichError::ParseError(e) => {
                warn!(error = %e, "Response parsing failed");
            }
            EnrichError::StoreError(e) => {
                error!(error = %e, "Store operation failed");
            }
            EnrichError::InvalidConfiguration(e) => {
                error!(error = %e, "Invalid configuration");
            }
            EnrichError::ExternalServiceError { service, message } => {
                error!(
                    service = %service,
                    error = %message,
                    "External service error occurred"
                );
            }
        }
    }
}
