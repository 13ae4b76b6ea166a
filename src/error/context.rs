use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("Run cancelled.")]
    Cancelled,
    #[error("Run deadline exceeded.")]
    DeadlineExceeded,
}
