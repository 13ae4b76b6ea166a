use std::path::Path;

use tracing::debug;

use crate::error::{AppError, AppResult, ConfigError};

use super::types::{DEFAULT_TIMEOUT_SECS, RunConfig};

/// Loads a run configuration from a `.toml` or `.json` file.
///
/// # Errors
///
/// Returns an error when the config file cannot be read or parsed.
pub fn load_config(path: &Path) -> AppResult<RunConfig> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::config(ConfigError::ReadConfig {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    let mut config: RunConfig = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseToml {
                path: path.to_path_buf(),
                source: err,
            })
        })?,
        Some("json") => serde_json::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseJson {
                path: path.to_path_buf(),
                source: err,
            })
        })?,
        Some(ext) => {
            return Err(AppError::config(ConfigError::UnsupportedExtension {
                ext: ext.to_owned(),
            }));
        }
        None => return Err(AppError::config(ConfigError::MissingExtension)),
    };

    if config.timeout == 0 {
        config.timeout = DEFAULT_TIMEOUT_SECS;
    }
    debug!(
        "Loaded {} request(s) from {}",
        config.requests.len(),
        path.display()
    );
    Ok(config)
}

/// Loads a configuration file and checks it before any request runs.
///
/// # Errors
///
/// Returns an error when loading fails or the config is invalid.
pub fn load_and_validate(path: &Path) -> AppResult<RunConfig> {
    let config = load_config(path)?;
    config.validate()?;
    Ok(config)
}
