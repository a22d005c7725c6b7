//! Client
//!
//! Root of the nested cache graph.
//!
//! ```text
//! Client
//! +-- application            (loaded from oauth2/applications/@me)
//! +-- players                Repository<Player>
//! +-- parties                Repository<Party>
//! +-- private_channels       Repository<Channel> ──> messages, threads
//! +-- guilds                 Repository<Guild>
//!       +-- channels         Repository<Channel> ──> messages, threads ──> members
//! ```

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, instrument};

use crate::config::CacheSettings;
use crate::domain::{Application, Attributes, Channel, Guild, Part, Party, Player, Thread};
use crate::infrastructure::cache::{Factory, Repository};
use crate::infrastructure::http::{routes, Http};
use crate::shared::error::{CacheError, CacheResult};

/// Top-level repositories that `freshen` accepts by name.
pub const REPOSITORY_NAMES: &[&str] = &["players", "parties", "guilds", "private_channels"];

/// Owner of every top-level repository.
#[derive(Debug)]
pub struct Client {
    factory: Factory,
    application: RwLock<Option<Part<Application>>>,
    players: Arc<Repository<Player>>,
    parties: Arc<Repository<Party>>,
    guilds: Arc<Repository<Guild>>,
    private_channels: Arc<Repository<Channel>>,
}

impl Client {
    /// Build the client and its (empty) top-level repositories.
    pub fn new(http: Arc<dyn Http>, settings: CacheSettings) -> CacheResult<Self> {
        let factory = Factory::new(http, settings);

        Ok(Self {
            players: factory.repository(Player::endpoints(), Attributes::new())?,
            parties: factory.repository(Party::endpoints(), Attributes::new())?,
            guilds: factory.repository(Guild::endpoints(), Attributes::new())?,
            private_channels: factory.repository(Channel::private_endpoints(), Attributes::new())?,
            application: RwLock::new(None),
            factory,
        })
    }

    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    pub fn players(&self) -> &Arc<Repository<Player>> {
        &self.players
    }

    pub fn parties(&self) -> &Arc<Repository<Party>> {
        &self.parties
    }

    pub fn guilds(&self) -> &Arc<Repository<Guild>> {
        &self.guilds
    }

    pub fn private_channels(&self) -> &Arc<Repository<Channel>> {
        &self.private_channels
    }

    /// The bot's application, once loaded.
    pub fn application(&self) -> Option<Part<Application>> {
        self.application.read().clone()
    }

    /// Fetch the current application and keep it on the client.
    #[instrument(skip(self))]
    pub async fn load_application(&self) -> CacheResult<Part<Application>> {
        let response = self.factory.http().get(routes::APPLICATION_CURRENT).await?;
        let application: Part<Application> = self.factory.create_value(response, true)?;

        info!(application = %application, "Application loaded");
        *self.application.write() = Some(application.clone());
        Ok(application)
    }

    pub fn guild(&self, guild_id: &str) -> Option<Part<Guild>> {
        self.guilds.get(guild_id)
    }

    /// Resolve a channel: private when `guild_id` is `None`, else through the guild.
    pub fn channel(&self, guild_id: Option<&str>, channel_id: &str) -> Option<Part<Channel>> {
        match guild_id {
            None => self.private_channels.get(channel_id),
            Some(guild_id) => self.guild(guild_id)?.channels().get(channel_id),
        }
    }

    /// The repository a channel lives in.
    pub fn channels_of(&self, guild_id: Option<&str>) -> Option<Arc<Repository<Channel>>> {
        match guild_id {
            None => Some(self.private_channels.clone()),
            Some(guild_id) => Some(self.guild(guild_id)?.channels().clone()),
        }
    }

    pub fn thread(
        &self,
        guild_id: Option<&str>,
        channel_id: &str,
        thread_id: &str,
    ) -> Option<Part<Thread>> {
        self.channel(guild_id, channel_id)?.threads().get(thread_id)
    }

    /// Freshen the named top-level repositories, in order.
    ///
    /// # Returns
    /// * `Ok(Vec<(name, count)>)` - Cached count per repository
    /// * `Err(CacheError::Configuration)` - An unknown repository name
    /// * `Err(_)` - The first failing freshen; later names are not attempted
    #[instrument(skip(self))]
    pub async fn freshen(&self, names: &[String]) -> CacheResult<Vec<(String, usize)>> {
        let mut counts = Vec::with_capacity(names.len());
        for name in names {
            let count = match name.as_str() {
                "players" => self.players.freshen().await?,
                "parties" => self.parties.freshen().await?,
                "guilds" => self.guilds.freshen().await?,
                "private_channels" => self.private_channels.freshen().await?,
                other => {
                    return Err(CacheError::Configuration(format!(
                        "unknown repository `{}`, expected one of: {}",
                        other,
                        REPOSITORY_NAMES.join(", ")
                    )))
                }
            };
            counts.push((name.clone(), count));
        }
        Ok(counts)
    }
}
