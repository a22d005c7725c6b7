//! One-shot completion signal for event handling.
//!
//! ```text
//!  Deferred::new(raw) ──> (Deferred, Completion)
//!        │                       │
//!   resolve(x) / drop            │ .await
//!        └──────── oneshot ──────┘
//! ```
//!
//! `resolve` consumes the `Deferred`, so a handler cannot resolve twice.
//! Dropping it unresolved sends the raw payload it was created with.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde_json::Value;
use tokio::sync::oneshot;

use super::event::Resolved;

/// The resolving half.
#[derive(Debug)]
pub struct Deferred {
    sender: Option<oneshot::Sender<Resolved>>,
    raw: Value,
}

/// The awaiting half; yields exactly one [`Resolved`].
#[derive(Debug)]
pub struct Completion {
    receiver: oneshot::Receiver<Resolved>,
}

impl Deferred {
    /// Create a signal whose fallback resolution is `raw`.
    pub fn new(raw: Value) -> (Self, Completion) {
        let (sender, receiver) = oneshot::channel();
        (
            Self {
                sender: Some(sender),
                raw,
            },
            Completion { receiver },
        )
    }

    /// The payload this signal falls back to.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn resolve(mut self, outcome: impl Into<Resolved>) {
        self.send(outcome.into());
    }

    /// Resolve with the unchanged payload ("not found locally").
    pub fn resolve_raw(mut self) {
        let raw = std::mem::take(&mut self.raw);
        self.send(Resolved::Raw(raw));
    }

    fn send(&mut self, outcome: Resolved) {
        if let Some(sender) = self.sender.take() {
            // the waiter may have given up; that is not an error here
            let _ = sender.send(outcome);
        }
    }
}

impl Drop for Deferred {
    fn drop(&mut self) {
        if self.sender.is_some() {
            let raw = std::mem::take(&mut self.raw);
            self.send(Resolved::Raw(raw));
        }
    }
}

impl Future for Completion {
    type Output = Resolved;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // the sender always sends before it is dropped
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| result.unwrap_or(Resolved::Raw(Value::Null)))
    }
}
