use super::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Invalid HTTP method: '{method}'.")]
    InvalidMethod { method: String },
    #[error("Invalid header format: '{value}'. Expected 'Key: Value'")]
    InvalidHeaderFormat { value: String },
    #[error("Header key cannot be empty in '{value}'.")]
    EmptyHeaderKey { value: String },
    #[error("Configuration validation failed: {source}")]
    ConfigValidation {
        #[source]
        source: ConfigError,
    },
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to build request: {source}")]
    BuildRequestFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Transport error: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to read response: {source}")]
    ResponseReadFailed {
        #[source]
        source: reqwest::Error,
    },
    #[cfg(test)]
    #[error("Mock transport failure for '{url}'.")]
    MockFailure { url: String },
}
