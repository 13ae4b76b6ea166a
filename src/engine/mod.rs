//! Batch execution and the per-request result callback shared with chains.
mod batch;
mod collector;


pub use batch::{BatchExecutor, DEFAULT_MAX_WORKERS};
pub use collector::{RequestReport, ResultCollector};
