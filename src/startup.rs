//! Application Startup
//!
//! Wiring of the HTTP client, the cache graph and the event dispatcher.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::application::Client;
use crate::config::Settings;
use crate::infrastructure::http::RestClient;
use crate::presentation::gateway::EventDispatcher;

/// Everything a running bot shares.
pub struct Runtime {
    pub client: Arc<Client>,
    pub dispatcher: Arc<EventDispatcher>,
    pub settings: Arc<Settings>,
}

impl Runtime {
    /// Build the runtime from settings; performs no network I/O.
    pub fn build(settings: Settings) -> Result<Self> {
        let http = RestClient::new(&settings.api)?;
        info!(base_url = %settings.api.base_url, "REST client ready");

        let client = Arc::new(Client::new(Arc::new(http), settings.cache.clone())?);
        let dispatcher = Arc::new(EventDispatcher::new(client.clone(), &settings.events));

        Ok(Self {
            client,
            dispatcher,
            settings: Arc::new(settings),
        })
    }

    /// Load the application part and freshen the configured repositories.
    pub async fn start(&self) -> Result<()> {
        let application = self.client.load_application().await?;
        if let Ok(invite) = application.get("invite_url") {
            info!(%invite, "Invite URL");
        }

        let counts = self
            .client
            .freshen(&self.settings.cache.freshen_on_start)
            .await?;
        for (repository, count) in counts {
            info!(%repository, count, "Repository freshened");
        }
        Ok(())
    }
}
