//! Message events.

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{id, object};
use crate::application::Client;
use crate::domain::{Channel, Message, Part};
use crate::presentation::gateway::deferred::Deferred;
use crate::presentation::gateway::event::{Event, EventType, Resolved};
use crate::shared::error::CacheResult;

/// `MESSAGE_CREATE`: cache the message in its channel when the channel is known.
pub struct MessageCreate;

#[async_trait]
impl Event for MessageCreate {
    fn event_type(&self) -> EventType {
        EventType::MessageCreate
    }

    async fn handle(&self, client: &Client, data: Value, deferred: Deferred) {
        let Some(channel_id) = id(&data, "channel_id") else {
            return deferred.resolve_raw();
        };

        let message = match client.channel(id(&data, "guild_id").as_deref(), &channel_id) {
            Some(channel) => cache_in(&channel, &data),
            None => client.factory().create_value::<Message>(data.clone(), true),
        };

        match message {
            Ok(message) => deferred.resolve(message),
            Err(error) => {
                warn!(%error, "MESSAGE_CREATE payload could not be hydrated");
                deferred.resolve_raw();
            }
        }
    }
}

fn cache_in(channel: &Part<Channel>, data: &Value) -> CacheResult<Part<Message>> {
    let message = channel.messages().hydrate(object(data).unwrap_or_default())?;
    channel.messages().push(message.clone())?;
    Ok(message)
}

/// `MESSAGE_UPDATE`: merge the partial payload into the cached message.
pub struct MessageUpdate;

#[async_trait]
impl Event for MessageUpdate {
    fn event_type(&self) -> EventType {
        EventType::MessageUpdate
    }

    async fn handle(&self, client: &Client, data: Value, deferred: Deferred) {
        let (Some(message_id), Some(channel_id)) = (id(&data, "id"), id(&data, "channel_id")) else {
            return deferred.resolve_raw();
        };
        let Some(channel) = client.channel(id(&data, "guild_id").as_deref(), &channel_id) else {
            return deferred.resolve_raw();
        };

        let updated = channel.messages().modify(&message_id, |message| {
            message.fill_value(data.clone());
            message.clone()
        });

        match updated {
            Ok(Some(message)) => deferred.resolve(message),
            Ok(None) => deferred.resolve_raw(),
            Err(error) => {
                warn!(%error, "MESSAGE_UPDATE payload could not be applied");
                deferred.resolve_raw();
            }
        }
    }
}

/// `MESSAGE_DELETE`: guild (or private scope) → channel → message.
///
/// Any missing link resolves with the raw payload.
pub struct MessageDelete;

#[async_trait]
impl Event for MessageDelete {
    fn event_type(&self) -> EventType {
        EventType::MessageDelete
    }

    async fn handle(&self, client: &Client, data: Value, deferred: Deferred) {
        let (Some(message_id), Some(channel_id)) = (id(&data, "id"), id(&data, "channel_id")) else {
            return deferred.resolve_raw();
        };
        let guild_id = id(&data, "guild_id");

        let message = client
            .channel(guild_id.as_deref(), &channel_id)
            .and_then(|channel| channel.messages().pull(&message_id));

        match message {
            Some(mut message) => {
                message.mark_deleted();
                deferred.resolve(message);
            }
            None => {
                debug!(%message_id, %channel_id, "Deleted message not cached");
                deferred.resolve_raw();
            }
        }
    }
}

/// `MESSAGE_DELETE_BULK`: one `MESSAGE_DELETE` per id, joined in input order.
pub struct MessageDeleteBulk;

#[async_trait]
impl Event for MessageDeleteBulk {
    fn event_type(&self) -> EventType {
        EventType::MessageDeleteBulk
    }

    async fn handle(&self, client: &Client, data: Value, deferred: Deferred) {
        let Some(ids) = data.get("ids").and_then(Value::as_array) else {
            return deferred.resolve_raw();
        };

        let deletions = ids.iter().map(|message_id| {
            let mut single = Map::new();
            single.insert("id".into(), message_id.clone());
            for field in ["channel_id", "guild_id"] {
                if let Some(value) = data.get(field) {
                    single.insert(field.into(), value.clone());
                }
            }
            let single = Value::Object(single);

            let (sub, completion) = Deferred::new(single.clone());
            async move {
                MessageDelete.handle(client, single, sub).await;
                completion.await
            }
        });

        let results = join_all(deletions).await;
        deferred.resolve(Resolved::Parts(results));
    }
}
