//! # Part Cache
//!
//! Entry point of the cache daemon.
//!
//! This initializes:
//! - Configuration loading
//! - Tracing/logging subsystem
//! - The REST client and the cache graph
//! - Startup loading (application part, configured repositories)
//!
//! The gateway transport is not part of this binary; decoded events are fed
//! to `EventDispatcher::dispatch` by whatever owns the connection.

use anyhow::Result;
use tracing::info;

use part_cache::config::Settings;
use part_cache::infrastructure::metrics;
use part_cache::startup::Runtime;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment and config files
    let settings = Settings::load()?;

    // Initialize tracing subscriber for structured logging
    part_cache::telemetry::init_tracing(&settings.environment);

    info!(
        base_url = %settings.api.base_url,
        environment = %settings.environment,
        "Configuration loaded"
    );

    let runtime = Runtime::build(settings)?;
    runtime.start().await?;

    info!(
        players = runtime.client.players().len(),
        parties = runtime.client.parties().len(),
        "Cache ready"
    );
    tracing::debug!(metrics = %metrics::gather_metrics(), "Startup metrics");

    Ok(())
}
