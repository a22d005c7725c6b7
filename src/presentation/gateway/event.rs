//! Gateway event types, resolution values and the handler trait.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::deferred::Deferred;
use crate::application::Client;
use crate::domain::{Channel, Guild, Message, Part, Thread, TypingStart};

/// Gateway event tags with a dedicated handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    // Message events
    MessageCreate,
    MessageUpdate,
    MessageDelete,
    MessageDeleteBulk,

    // Channel events
    ChannelCreate,
    ChannelDelete,

    // Guild events
    GuildCreate,
    GuildDelete,

    // Thread events
    ThreadCreate,

    // Presence events
    TypingStart,
}

impl EventType {
    pub const ALL: [EventType; 10] = [
        Self::MessageCreate,
        Self::MessageUpdate,
        Self::MessageDelete,
        Self::MessageDeleteBulk,
        Self::ChannelCreate,
        Self::ChannelDelete,
        Self::GuildCreate,
        Self::GuildDelete,
        Self::ThreadCreate,
        Self::TypingStart,
    ];

    /// Get the event name for dispatch
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MessageCreate => "MESSAGE_CREATE",
            Self::MessageUpdate => "MESSAGE_UPDATE",
            Self::MessageDelete => "MESSAGE_DELETE",
            Self::MessageDeleteBulk => "MESSAGE_DELETE_BULK",
            Self::ChannelCreate => "CHANNEL_CREATE",
            Self::ChannelDelete => "CHANNEL_DELETE",
            Self::GuildCreate => "GUILD_CREATE",
            Self::GuildDelete => "GUILD_DELETE",
            Self::ThreadCreate => "THREAD_CREATE",
            Self::TypingStart => "TYPING_START",
        }
    }

    /// Parse a wire tag; unknown tags have no handler.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.as_str() == tag)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A part of any kind an event can resolve with.
#[derive(Debug, Clone)]
pub enum AnyPart {
    Message(Part<Message>),
    Channel(Part<Channel>),
    Guild(Part<Guild>),
    Thread(Part<Thread>),
    TypingStart(Part<TypingStart>),
}

impl AnyPart {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message(_) => "Message",
            Self::Channel(_) => "Channel",
            Self::Guild(_) => "Guild",
            Self::Thread(_) => "Thread",
            Self::TypingStart(_) => "TypingStart",
        }
    }

    pub fn discriminator(&self) -> Option<String> {
        match self {
            Self::Message(part) => part.discriminator(),
            Self::Channel(part) => part.discriminator(),
            Self::Guild(part) => part.discriminator(),
            Self::Thread(part) => part.discriminator(),
            Self::TypingStart(part) => part.discriminator(),
        }
    }

    pub fn deleted(&self) -> bool {
        match self {
            Self::Message(part) => part.deleted(),
            Self::Channel(part) => part.deleted(),
            Self::Guild(part) => part.deleted(),
            Self::Thread(part) => part.deleted(),
            Self::TypingStart(part) => part.deleted(),
        }
    }

    /// The persisted attribute view as JSON.
    pub fn to_value(&self) -> Value {
        let attributes = match self {
            Self::Message(part) => part.attributes(),
            Self::Channel(part) => part.attributes(),
            Self::Guild(part) => part.attributes(),
            Self::Thread(part) => part.attributes(),
            Self::TypingStart(part) => part.attributes(),
        };
        Value::Object(attributes.clone())
    }
}

macro_rules! any_part_from {
    ($($kind:ident),* $(,)?) => {
        $(
            impl From<Part<$kind>> for AnyPart {
                fn from(part: Part<$kind>) -> Self {
                    Self::$kind(part)
                }
            }

            impl From<Part<$kind>> for Resolved {
                fn from(part: Part<$kind>) -> Self {
                    Self::Part(AnyPart::$kind(part))
                }
            }
        )*
    };
}

any_part_from!(Message, Channel, Guild, Thread, TypingStart);

/// What an event's completion signal resolves with.
#[derive(Debug, Clone)]
pub enum Resolved {
    /// The affected part
    Part(AnyPart),
    /// One result per sub-operation, in input order
    Parts(Vec<Resolved>),
    /// Nothing matched locally; the payload, unchanged
    Raw(Value),
}

impl Resolved {
    /// Short label for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Part(_) => "part",
            Self::Parts(_) => "parts",
            Self::Raw(_) => "raw",
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    pub fn part(&self) -> Option<&AnyPart> {
        match self {
            Self::Part(part) => Some(part),
            _ => None,
        }
    }

    pub fn parts(&self) -> Option<&[Resolved]> {
        match self {
            Self::Parts(parts) => Some(parts),
            _ => None,
        }
    }

    pub fn raw(&self) -> Option<&Value> {
        match self {
            Self::Raw(value) => Some(value),
            _ => None,
        }
    }

    /// JSON rendering: attribute maps for parts, arrays for batches.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Part(part) => part.to_value(),
            Self::Parts(parts) => Value::Array(parts.iter().map(Resolved::to_value).collect()),
            Self::Raw(value) => value.clone(),
        }
    }
}

/// A stateless handler for one gateway event type.
///
/// Implementations must resolve `deferred` with the affected part(s) or with
/// the raw payload. A `Deferred` that is dropped unresolved resolves itself
/// with the raw payload, so an early return never leaves a waiter hanging.
#[async_trait]
pub trait Event: Send + Sync {
    fn event_type(&self) -> EventType;

    async fn handle(&self, client: &Client, data: Value, deferred: Deferred);
}
