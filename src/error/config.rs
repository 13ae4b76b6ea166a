use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML config '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to parse JSON config '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported config extension '{ext}'. Use .toml or .json.")]
    UnsupportedExtension { ext: String },
    #[error("Config file must have .toml or .json extension.")]
    MissingExtension,
    #[error("base_url is required in config.")]
    MissingBaseUrl,
    #[error("At least one request must be defined.")]
    NoRequests,
    #[error("Request at index {index} has no name.")]
    MissingRequestName { index: usize },
    #[error("Duplicate request name: {name}.")]
    DuplicateRequestName { name: String },
    #[error("Method is required for request '{name}'.")]
    MissingMethod { name: String },
    #[error("Path is required for request '{name}'.")]
    MissingPath { name: String },
    #[error("Multiple body types specified for request '{name}'.")]
    MultipleBodies { name: String },
}

impl ConfigError {
    /// True for the variants produced by config validation, as opposed to
    /// loading and parsing.
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        matches!(
            self,
            Self::MissingBaseUrl
                | Self::NoRequests
                | Self::MissingRequestName { .. }
                | Self::DuplicateRequestName { .. }
                | Self::MissingMethod { .. }
                | Self::MissingPath { .. }
                | Self::MultipleBodies { .. }
        )
    }
}
