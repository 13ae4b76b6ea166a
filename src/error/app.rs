use thiserror::Error;

use super::{ChainError, ConfigError, ContextError, HttpError, ValidationError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
    #[error("{0}")]
    Chain(#[from] ChainError),
    #[error("{0}")]
    Context(#[from] ContextError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn http<E>(error: E) -> Self
    where
        E: Into<HttpError>,
    {
        error.into().into()
    }

    pub fn chain<E>(error: E) -> Self
    where
        E: Into<ChainError>,
    {
        error.into().into()
    }

    /// Follows request-name and extraction wrappers down to the error that
    /// caused them.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        let mut current = self;
        while let Self::Chain(
            ChainError::RequestFailed { source, .. }
            | ChainError::BatchRequestFailed { source, .. }
            | ChainError::VariableExtraction { source, .. },
        ) = current
        {
            current = source;
        }
        current
    }

    /// Status code of a response that arrived before the request failed,
    /// if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        let mut current = self;
        while let Self::Chain(
            ChainError::RequestFailed { source, .. }
            | ChainError::BatchRequestFailed { source, .. },
        ) = current
        {
            current = source;
        }
        if let Self::Chain(ChainError::VariableExtraction { status, .. }) = current {
            return Some(*status);
        }
        None
    }
}
