//! Gateway Event Handling
//!
//! Push-driven cache mutation. The transport (frames, heartbeats,
//! reconnects) lives elsewhere; this module receives decoded payloads with
//! their event tag.
//!
//! ```text
//! (tag, payload) ──> EventDispatcher ──> handler ──> nested repositories
//!                          │                 │
//!                          │            Deferred::resolve
//!                          v                 │
//!                    Completion <────────────┘ ──> broadcast subscribers
//! ```

pub mod deferred;
pub mod dispatcher;
pub mod event;
pub mod handlers;

pub use deferred::{Completion, Deferred};
pub use dispatcher::{DispatchedEvent, EventDispatcher};
pub use event::{AnyPart, Event, EventType, Resolved};
