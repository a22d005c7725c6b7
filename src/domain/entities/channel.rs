//! Channel part and its child repositories.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{scope, Message, Thread};
use crate::domain::part::{Attributes, Computed, Part, PartKind, Wire};
use crate::infrastructure::cache::{Factory, Repository};
use crate::infrastructure::http::{routes, Endpoints, Operation};
use crate::shared::error::CacheResult;

/// Channel types as sent in the numeric `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    /// A text channel within a guild
    #[default]
    Text,
    /// A direct message between two users
    Dm,
    /// A voice channel within a guild
    Voice,
    /// A direct message between multiple users
    GroupDm,
    /// A category that contains channels
    Category,
    /// A thread under a text channel
    Thread,
}

impl ChannelType {
    /// Convert from the wire code; unknown codes fall back to `Text`.
    pub fn from_code(code: u64) -> Self {
        match code {
            1 => Self::Dm,
            2 => Self::Voice,
            3 => Self::GroupDm,
            4 => Self::Category,
            10..=12 => Self::Thread,
            _ => Self::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Dm => "dm",
            Self::Voice => "voice",
            Self::GroupDm => "group_dm",
            Self::Category => "category",
            Self::Thread => "thread",
        }
    }

    /// Whether the channel lives outside any guild.
    pub fn is_private(&self) -> bool {
        matches!(self, Self::Dm | Self::GroupDm)
    }
}

impl std::fmt::Display for ChannelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A guild channel or a private (DM) channel.
pub struct Channel;

/// Repositories owned by a channel.
#[derive(Debug, Clone)]
pub struct ChannelRelations {
    pub messages: Arc<Repository<Message>>,
    pub threads: Arc<Repository<Thread>>,
}

impl Wire for ChannelRelations {
    fn wire(factory: &Factory, attributes: &Attributes) -> CacheResult<Self> {
        Ok(Self {
            messages: factory.repository(Message::endpoints(), scope("channel_id", attributes))?,
            threads: factory.repository(Thread::endpoints(), scope("channel_id", attributes))?,
        })
    }
}

fn mention(part: &Part<Channel>) -> Option<Value> {
    Some(json!(format!("<#{}>", part.discriminator()?)))
}

fn channel_type(part: &Part<Channel>) -> Option<Value> {
    let code = part.attribute("type")?.as_u64()?;
    Some(json!(ChannelType::from_code(code).as_str()))
}

impl PartKind for Channel {
    const NAME: &'static str = "Channel";
    const FILLABLE: &'static [&'static str] = &[
        "name",
        "type",
        "guild_id",
        "position",
        "topic",
        "nsfw",
        "parent_id",
        "recipients",
        "last_message_id",
    ];
    const COMPUTED: &'static [Computed<Self>] = &[
        Computed::readonly("mention", mention),
        Computed::readonly("channel_type", channel_type),
    ];
    type Relations = ChannelRelations;

    fn repository_keys() -> Vec<&'static str> {
        vec!["channel_id"]
    }

    fn repository_attributes(part: &Part<Self>) -> Attributes {
        let mut attributes = Attributes::new();
        if let Some(id) = part.attribute("id") {
            attributes.insert("channel_id".into(), id.clone());
        }
        attributes
    }
}

impl Channel {
    /// Endpoints of a guild's channel repository (`vars` carry `guild_id`).
    pub fn endpoints() -> Endpoints {
        Endpoints::new()
            .with(Operation::All, routes::GUILD_CHANNELS)
            .with(Operation::Get, routes::CHANNEL)
            .with(Operation::Create, routes::GUILD_CHANNELS)
            .with(Operation::Update, routes::CHANNEL)
            .with(Operation::Delete, routes::CHANNEL)
    }

    /// Endpoints of the client's private channel repository.
    pub fn private_endpoints() -> Endpoints {
        Endpoints::new()
            .with(Operation::All, routes::PRIVATE_CHANNELS)
            .with(Operation::Get, routes::CHANNEL)
            .with(Operation::Create, routes::PRIVATE_CHANNELS)
            .with(Operation::Delete, routes::CHANNEL)
    }
}

impl Part<Channel> {
    pub fn messages(&self) -> &Arc<Repository<Message>> {
        &self.relations().messages
    }

    pub fn threads(&self) -> &Arc<Repository<Thread>> {
        &self.relations().threads
    }

    pub fn channel_type(&self) -> ChannelType {
        self.attribute("type")
            .and_then(Value::as_u64)
            .map(ChannelType::from_code)
            .unwrap_or_default()
    }
}
