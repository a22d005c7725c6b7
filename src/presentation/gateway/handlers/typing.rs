//! Typing indicator events.

use async_trait::async_trait;
use serde_json::Value;

use crate::application::Client;
use crate::domain::TypingStart as TypingStartKind;
use crate::presentation::gateway::deferred::Deferred;
use crate::presentation::gateway::event::{Event, EventType};

/// `TYPING_START`: hydrate the indicator; nothing is cached.
pub struct TypingStart;

#[async_trait]
impl Event for TypingStart {
    fn event_type(&self) -> EventType {
        EventType::TypingStart
    }

    async fn handle(&self, client: &Client, data: Value, deferred: Deferred) {
        match client.factory().create_value::<TypingStartKind>(data, true) {
            Ok(typing) => deferred.resolve(typing),
            Err(_) => deferred.resolve_raw(),
        }
    }
}
