//! Guild events.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::{id, object};
use crate::application::Client;
use crate::domain::{Guild, Part, Thread};
use crate::presentation::gateway::deferred::Deferred;
use crate::presentation::gateway::event::{Event, EventType};
use crate::shared::error::CacheResult;

/// `GUILD_CREATE`: cache the guild together with the channels and threads
/// embedded in the payload. A guild that is already cached is kept.
pub struct GuildCreate;

impl GuildCreate {
    fn build(client: &Client, data: &Value) -> CacheResult<Part<Guild>> {
        let mut attributes = object(data).unwrap_or_default();
        let channels = attributes.remove("channels");
        let threads = attributes.remove("threads");

        let guild = client.guilds().hydrate(attributes)?;

        for channel in channels.iter().flat_map(embedded) {
            let channel = guild.channels().hydrate(channel)?;
            guild.channels().push(channel)?;
        }

        for thread in threads.iter().flat_map(embedded) {
            let thread: Part<Thread> = guild.channels().factory().create(thread, true)?;
            let parent = thread.parent_id().and_then(|parent| guild.channels().get(&parent));
            match parent {
                Some(parent) => parent.threads().push(thread)?,
                None => debug!(thread = %thread, "Embedded thread without a cached parent"),
            }
        }

        Ok(guild)
    }
}

/// Object entries of an embedded array.
fn embedded(value: &Value) -> impl Iterator<Item = serde_json::Map<String, Value>> + '_ {
    value
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.as_object().cloned())
}

#[async_trait]
impl Event for GuildCreate {
    fn event_type(&self) -> EventType {
        EventType::GuildCreate
    }

    async fn handle(&self, client: &Client, data: Value, deferred: Deferred) {
        let Some(guild_id) = id(&data, "id") else {
            return deferred.resolve_raw();
        };
        if let Some(existing) = client.guild(&guild_id) {
            return deferred.resolve(existing);
        }

        match Self::build(client, &data).and_then(|guild| {
            client.guilds().push(guild.clone())?;
            Ok(guild)
        }) {
            Ok(guild) => deferred.resolve(guild),
            Err(error) => {
                warn!(%error, "GUILD_CREATE payload could not be hydrated");
                deferred.resolve_raw();
            }
        }
    }
}

/// `GUILD_DELETE`: an `unavailable` guild is flagged in place (outage);
/// otherwise the guild is removed from the cache.
pub struct GuildDelete;

#[async_trait]
impl Event for GuildDelete {
    fn event_type(&self) -> EventType {
        EventType::GuildDelete
    }

    async fn handle(&self, client: &Client, data: Value, deferred: Deferred) {
        let Some(guild_id) = id(&data, "id") else {
            return deferred.resolve_raw();
        };

        let unavailable = data.get("unavailable").and_then(Value::as_bool).unwrap_or(false);
        let guild = if unavailable {
            client
                .guilds()
                .modify(&guild_id, |guild| {
                    guild.set("unavailable", true);
                    guild.clone()
                })
                .ok()
                .flatten()
        } else {
            client.guilds().pull(&guild_id).map(|mut guild| {
                guild.mark_deleted();
                guild
            })
        };

        match guild {
            Some(guild) => deferred.resolve(guild),
            None => deferred.resolve_raw(),
        }
    }
}
