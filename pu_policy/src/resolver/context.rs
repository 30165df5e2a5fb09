use crate::error::{PolicyError, Result};
use std::future::Future;
use tokio::sync::watch;
use uuid::Uuid;

/// Per-call context for a resolution: request metadata plus cancellation
#[derive(Debug, Clone)]
pub struct ResolveContext {
    request_id: Uuid,
    correlation_id: Option<Uuid>,
    cancel_rx: Option<watch::Receiver<bool>>,
}

/// Cancels every context cloned from the one it was created with
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl ResolveContext {
    /// Context that is never cancelled
    pub fn background() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            correlation_id: None,
            cancel_rx: None,
        }
    }

    /// Cancellable context and the handle that cancels it
    pub fn with_cancel() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = Self {
            cancel_rx: Some(rx),
            ..Self::background()
        };
        (ctx, CancelHandle { tx })
    }

    /// Tag the context with an upstream correlation ID
    pub fn correlated(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn correlation_id(&self) -> Option<Uuid> {
        self.correlation_id
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_rx
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or(false)
    }

    /// Completes once the context is cancelled. Never completes for a
    /// background context, or once the handle is dropped uncancelled.
    pub async fn cancelled(&self) {
        let Some(rx) = self.cancel_rx.as_ref() else {
            return std::future::pending().await;
        };

        let mut rx = rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return std::future::pending().await;
            }
        }
    }

    /// Drive `fut` to completion unless the context is cancelled first
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = T>,
    {
        if self.is_cancelled() {
            return Err(PolicyError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = self.cancelled() => Err(PolicyError::Cancelled),
            out = fut => Ok(out),
        }
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::background()
    }
}
