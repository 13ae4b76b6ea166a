use super::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Request '{name}' depends on unknown request '{dependency}'.")]
    UnknownDependency { name: String, dependency: String },
    #[error("Cyclic dependency detected with request '{name}'.")]
    CyclicDependency { name: String },
    #[error("Failed to create request: {source}")]
    RequestCreation {
        #[source]
        source: Box<AppError>,
    },
    #[error("Request execution failed: {source}")]
    RequestExecution {
        #[source]
        source: Box<AppError>,
    },
    #[error("Response is nil.")]
    NilResponse,
    #[error("Response body exceeds maximum allowed size of {limit} bytes.")]
    ResponseTooLarge { limit: u64 },
    #[error("Failed to read response body: {source}")]
    ReadResponseBody {
        #[source]
        source: std::io::Error,
    },
    #[error("Path '{path}' not found for variable '{variable}'.")]
    PathNotFound { variable: String, path: String },
    #[error("Variable name cannot be empty.")]
    EmptyVariableName,
    #[error("Failed to extract variables (status {status}): {source}")]
    VariableExtraction {
        status: u16,
        #[source]
        source: Box<AppError>,
    },
    #[error("Failed to process request '{name}': {source}")]
    RequestFailed {
        name: String,
        #[source]
        source: Box<AppError>,
    },
    #[error("Batch request '{name}' failed: {source}")]
    BatchRequestFailed {
        name: String,
        #[source]
        source: Box<AppError>,
    },
}
