//! Dependency-ordered request chains with variable extraction.
mod dependency;
mod executor;
mod extractor;
pub mod limits;
mod processor;
mod variables;

#[cfg(test)]
mod tests;

pub use dependency::DependencyGraph;
pub use executor::{ChainExecutor, ChainReport};
pub use extractor::{JsonExtractor, PathExtractor, extract_variables};
pub use processor::{ExecutionResult, RequestProcessor};
pub use variables::{VariableResolver, VariableStore};
