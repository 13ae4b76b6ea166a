use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::AppError;

/// What a run tells its collector about one finished request.
#[derive(Debug, Clone, Copy)]
pub struct RequestReport<'run> {
    pub name: &'run str,
    pub method: &'run str,
    pub url: &'run str,
    pub status_code: Option<u16>,
    pub error: Option<&'run AppError>,
    pub duration: Duration,
    /// Variables extracted by the request; only chain runs fill this in.
    pub variables: Option<&'run BTreeMap<String, String>>,
}

impl RequestReport<'_> {
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Synchronous per-request callback. It must return quickly; concurrent
/// batch workers call it from their own tasks.
pub type ResultCollector = Arc<dyn Fn(&RequestReport<'_>) + Send + Sync>;
