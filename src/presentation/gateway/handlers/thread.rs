//! Thread events.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::{id, object};
use crate::application::Client;
use crate::domain::{Channel, Part, Thread};
use crate::presentation::gateway::deferred::Deferred;
use crate::presentation::gateway::event::{Event, EventType};
use crate::shared::error::CacheResult;

/// `THREAD_CREATE`: attach the thread, with any embedded members, under its
/// parent channel. If the parent already has it, the cached thread wins.
pub struct ThreadCreate;

fn attach(parent: &Part<Channel>, data: &Value) -> CacheResult<Part<Thread>> {
    let thread = parent.threads().hydrate(object(data).unwrap_or_default())?;

    let members = data.get("members").and_then(Value::as_array).into_iter().flatten();
    for member in members.chain(data.get("member")) {
        let Some(member) = object(member) else { continue };
        let member = thread.members().hydrate(member)?;
        thread.members().push(member)?;
    }

    parent.threads().push(thread.clone())?;
    Ok(thread)
}

#[async_trait]
impl Event for ThreadCreate {
    fn event_type(&self) -> EventType {
        EventType::ThreadCreate
    }

    async fn handle(&self, client: &Client, data: Value, deferred: Deferred) {
        let Some(thread_id) = id(&data, "id") else {
            return deferred.resolve_raw();
        };
        let parent = id(&data, "parent_id")
            .and_then(|parent_id| client.channel(id(&data, "guild_id").as_deref(), &parent_id));

        let thread = match parent {
            Some(parent) => match parent.threads().get(&thread_id) {
                Some(existing) => {
                    debug!(%thread_id, "Thread already cached");
                    Ok(existing)
                }
                None => attach(&parent, &data),
            },
            None => client.factory().create_value(data.clone(), true),
        };

        match thread {
            Ok(thread) => deferred.resolve(thread),
            Err(error) => {
                warn!(%error, "THREAD_CREATE payload could not be hydrated");
                deferred.resolve_raw();
            }
        }
    }
}
