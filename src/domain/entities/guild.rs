//! Guild part.

use std::sync::Arc;

use super::{scope, Channel};
use crate::domain::part::{Attributes, Part, PartKind, Wire};
use crate::infrastructure::cache::{Factory, Repository};
use crate::infrastructure::http::{routes, Endpoints, Operation};
use crate::shared::error::CacheResult;

/// A guild (server) the bot is a member of.
pub struct Guild;

/// Repositories owned by a guild.
#[derive(Debug, Clone)]
pub struct GuildRelations {
    pub channels: Arc<Repository<Channel>>,
}

impl Wire for GuildRelations {
    fn wire(factory: &Factory, attributes: &Attributes) -> CacheResult<Self> {
        Ok(Self {
            channels: factory.repository(Channel::endpoints(), scope("guild_id", attributes))?,
        })
    }
}

impl PartKind for Guild {
    const NAME: &'static str = "Guild";
    const FILLABLE: &'static [&'static str] =
        &["name", "icon", "owner_id", "member_count", "unavailable"];
    type Relations = GuildRelations;

    fn repository_keys() -> Vec<&'static str> {
        vec!["guild_id"]
    }

    fn repository_attributes(part: &Part<Self>) -> Attributes {
        let mut attributes = Attributes::new();
        if let Some(id) = part.attribute("id") {
            attributes.insert("guild_id".into(), id.clone());
        }
        attributes
    }
}

impl Guild {
    pub fn endpoints() -> Endpoints {
        Endpoints::new()
            .with(Operation::All, routes::GUILDS)
            .with(Operation::Get, routes::GUILD)
    }
}

impl Part<Guild> {
    pub fn channels(&self) -> &Arc<Repository<Channel>> {
        &self.relations().channels
    }
}
