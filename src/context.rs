//! Run-wide cancellation and deadline signal shared by every executor.
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, sleep_until};

use crate::error::ContextError;

/// Cooperative cancellation handle for one run.
///
/// Clones share the same signal: cancelling any clone cancels all of them.
#[derive(Debug, Clone)]
pub struct RunContext {
    deadline: Option<Instant>,
    cancel_tx: Arc<watch::Sender<bool>>,
}

impl Default for RunContext {
    fn default() -> Self {
        Self::background()
    }
}

impl RunContext {
    /// A context that is only ever done through [`RunContext::cancel`].
    #[must_use]
    pub fn background() -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self {
            deadline: None,
            cancel_tx: Arc::new(cancel_tx),
        }
    }

    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        let mut context = Self::background();
        context.deadline = Instant::now().checked_add(timeout);
        context
    }

    pub fn cancel(&self) {
        self.cancel_tx.send_replace(true);
    }

    /// Why the context is done, or `None` while it is still live.
    #[must_use]
    pub fn err(&self) -> Option<ContextError> {
        if *self.cancel_tx.borrow() {
            return Some(ContextError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            Some(_) | None => None,
        }
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Resolves once the context is cancelled or its deadline passes.
    pub async fn done(&self) -> ContextError {
        let mut cancel_rx = self.cancel_tx.subscribe();
        let cancelled = async move {
            drop(cancel_rx.wait_for(|cancelled| *cancelled).await);
        };
        match self.deadline {
            Some(deadline) => tokio::select! {
                () = cancelled => ContextError::Cancelled,
                () = sleep_until(deadline) => ContextError::DeadlineExceeded,
            },
            None => {
                cancelled.await;
                ContextError::Cancelled
            }
        }
    }
}
