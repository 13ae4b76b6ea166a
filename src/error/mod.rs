mod app;
mod chain;
mod config;
mod context;
mod http;
mod validation;

pub use app::{AppError, AppResult};
pub use chain::ChainError;
pub use config::ConfigError;
pub use context::ContextError;
pub use http::HttpError;
pub use validation::ValidationError;
