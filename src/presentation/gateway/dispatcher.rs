//! Event Dispatcher
//!
//! Routes decoded gateway payloads to their handler, waits for the
//! completion signal and fans the outcome out to subscribers.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, instrument};

use super::deferred::Deferred;
use super::event::{Event, EventType, Resolved};
use super::handlers;
use crate::application::Client;
use crate::config::EventSettings;
use crate::infrastructure::metrics;

/// A handled event as seen by subscribers.
#[derive(Debug, Clone)]
pub struct DispatchedEvent {
    /// Wire tag, including tags without a handler
    pub event: String,
    pub resolved: Resolved,
}

pub struct EventDispatcher {
    client: Arc<Client>,
    /// Handlers by event type
    handlers: DashMap<EventType, Arc<dyn Event>>,
    /// Broadcast channel for handled events
    event_tx: broadcast::Sender<DispatchedEvent>,
}

impl EventDispatcher {
    /// Build a dispatcher with every built-in handler registered.
    pub fn new(client: Arc<Client>, settings: &EventSettings) -> Self {
        let (event_tx, _) = broadcast::channel(settings.channel_capacity.max(1));
        let dispatcher = Self {
            client,
            handlers: DashMap::new(),
            event_tx,
        };
        for handler in handlers::defaults() {
            dispatcher.register(handler);
        }
        dispatcher
    }

    pub fn client(&self) -> &Arc<Client> {
        &self.client
    }

    /// Register a handler, replacing the one for the same event type.
    pub fn register(&self, handler: Arc<dyn Event>) {
        self.handlers.insert(handler.event_type(), handler);
    }

    /// Subscribe to handled events
    pub fn subscribe(&self) -> broadcast::Receiver<DispatchedEvent> {
        self.event_tx.subscribe()
    }

    /// Handle one event and return what its completion signal resolved with.
    ///
    /// Tags without a handler resolve with the raw payload.
    #[instrument(skip(self, data))]
    pub async fn dispatch(&self, tag: &str, data: Value) -> Resolved {
        let (deferred, completion) = Deferred::new(data.clone());

        let event = EventType::from_tag(tag);
        let handler = event
            .and_then(|event| self.handlers.get(&event).map(|entry| Arc::clone(entry.value())));

        match handler {
            Some(handler) => handler.handle(&self.client, data, deferred).await,
            None => {
                debug!("No handler registered");
                deferred.resolve_raw();
            }
        }

        let resolved = completion.await;
        // unknown tags share one label
        metrics::record_event(event.map_or("unknown", |event| event.as_str()), resolved.outcome());
        debug!(outcome = resolved.outcome(), "Event resolved");

        // no subscribers is fine
        let _ = self.event_tx.send(DispatchedEvent {
            event: tag.to_string(),
            resolved: resolved.clone(),
        });
        resolved
    }
}
