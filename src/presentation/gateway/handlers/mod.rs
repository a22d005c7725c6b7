//! One stateless handler per gateway event type.

mod channel;
mod guild;
mod message;
mod thread;
mod typing;

pub use channel::{ChannelCreate, ChannelDelete};
pub use guild::{GuildCreate, GuildDelete};
pub use message::{MessageCreate, MessageDelete, MessageDeleteBulk, MessageUpdate};
pub use thread::ThreadCreate;
pub use typing::TypingStart;

use std::sync::Arc;

use serde_json::Value;

use super::event::Event;
use crate::domain::{key_of, Attributes};

/// Every built-in handler.
pub fn defaults() -> Vec<Arc<dyn Event>> {
    vec![
        Arc::new(MessageCreate),
        Arc::new(MessageUpdate),
        Arc::new(MessageDelete),
        Arc::new(MessageDeleteBulk),
        Arc::new(ChannelCreate),
        Arc::new(ChannelDelete),
        Arc::new(GuildCreate),
        Arc::new(GuildDelete),
        Arc::new(ThreadCreate),
        Arc::new(TypingStart),
    ]
}

/// An id field of the payload as a cache key.
fn id(data: &Value, field: &str) -> Option<String> {
    data.get(field).and_then(key_of)
}

fn object(data: &Value) -> Option<Attributes> {
    data.as_object().cloned()
}
