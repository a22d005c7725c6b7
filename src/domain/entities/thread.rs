//! Thread part.
//!
//! A thread is a channel nested under a parent channel (`parent_id`).

use std::sync::Arc;

use super::{scope, ThreadMember};
use crate::domain::part::{Attributes, Part, PartKind, Wire};
use crate::infrastructure::cache::{Factory, Repository};
use crate::infrastructure::http::{routes, Endpoints, Operation};
use crate::shared::error::CacheResult;

pub struct Thread;

/// Repositories owned by a thread.
#[derive(Debug, Clone)]
pub struct ThreadRelations {
    pub members: Arc<Repository<ThreadMember>>,
}

impl Wire for ThreadRelations {
    fn wire(factory: &Factory, attributes: &Attributes) -> CacheResult<Self> {
        Ok(Self {
            members: factory
                .repository(ThreadMember::endpoints(), scope("thread_id", attributes))?,
        })
    }
}

impl PartKind for Thread {
    const NAME: &'static str = "Thread";
    const FILLABLE: &'static [&'static str] = &[
        "name",
        "type",
        "guild_id",
        "parent_id",
        "owner_id",
        "message_count",
        "member_count",
        "thread_metadata",
    ];
    type Relations = ThreadRelations;

    fn repository_keys() -> Vec<&'static str> {
        vec!["thread_id"]
    }

    fn repository_attributes(part: &Part<Self>) -> Attributes {
        let mut attributes = Attributes::new();
        if let Some(id) = part.attribute("id") {
            attributes.insert("thread_id".into(), id.clone());
        }
        attributes
    }
}

impl Thread {
    /// Endpoints of a channel's thread repository (`vars` carry `channel_id`).
    pub fn endpoints() -> Endpoints {
        Endpoints::new()
            .with(Operation::All, routes::CHANNEL_THREADS)
            .with(Operation::Get, routes::THREAD)
            .with(Operation::Create, routes::CHANNEL_THREADS)
            .with(Operation::Update, routes::THREAD)
            .with(Operation::Delete, routes::THREAD)
    }
}

impl Part<Thread> {
    pub fn members(&self) -> &Arc<Repository<ThreadMember>> {
        &self.relations().members
    }

    /// Id of the channel this thread was started in.
    pub fn parent_id(&self) -> Option<String> {
        self.key("parent_id")
    }
}
