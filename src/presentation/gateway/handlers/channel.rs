//! Channel events.

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use super::{id, object};
use crate::application::Client;
use crate::domain::{Channel, Part};
use crate::presentation::gateway::deferred::Deferred;
use crate::presentation::gateway::event::{Event, EventType};
use crate::shared::error::CacheResult;

/// `CHANNEL_CREATE`: attach the channel to its guild, or to the private
/// channels when it has no guild. Already-cached channels are kept as-is.
pub struct ChannelCreate;

#[async_trait]
impl Event for ChannelCreate {
    fn event_type(&self) -> EventType {
        EventType::ChannelCreate
    }

    async fn handle(&self, client: &Client, data: Value, deferred: Deferred) {
        let Some(channel_id) = id(&data, "id") else {
            return deferred.resolve_raw();
        };

        let channel: CacheResult<Part<Channel>> = match client.channels_of(id(&data, "guild_id").as_deref()) {
            Some(channels) => match channels.get(&channel_id) {
                Some(existing) => Ok(existing),
                None => channels
                    .hydrate(object(&data).unwrap_or_default())
                    .and_then(|channel| channels.push(channel.clone()).map(|_| channel)),
            },
            // guild not cached: hand the part out without attaching it
            None => client.factory().create_value(data.clone(), true),
        };

        match channel {
            Ok(channel) => deferred.resolve(channel),
            Err(error) => {
                warn!(%error, "CHANNEL_CREATE payload could not be hydrated");
                deferred.resolve_raw();
            }
        }
    }
}

/// `CHANNEL_DELETE`: remove the channel from its scope.
pub struct ChannelDelete;

#[async_trait]
impl Event for ChannelDelete {
    fn event_type(&self) -> EventType {
        EventType::ChannelDelete
    }

    async fn handle(&self, client: &Client, data: Value, deferred: Deferred) {
        let Some(channel_id) = id(&data, "id") else {
            return deferred.resolve_raw();
        };

        let removed = client
            .channels_of(id(&data, "guild_id").as_deref())
            .and_then(|channels| channels.pull(&channel_id));

        match removed {
            Some(mut channel) => {
                channel.mark_deleted();
                deferred.resolve(channel);
            }
            None => deferred.resolve_raw(),
        }
    }
}
