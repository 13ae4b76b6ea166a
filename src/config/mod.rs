//! Run configuration: file loading, types and validation.
mod loader;
pub mod types;
mod validate;


pub use loader::{load_and_validate, load_config};
pub use types::{BodyKind, DEFAULT_TIMEOUT_SECS, ExecutionOrder, RequestSpec, RunConfig};
