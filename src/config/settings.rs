//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Remote API client configuration
    pub api: ApiSettings,

    /// Cache behaviour
    pub cache: CacheSettings,

    /// Event dispatch configuration
    pub events: EventSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Remote API client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    /// Base URL every bound endpoint path is joined onto; must end with `/`
    pub base_url: String,

    /// Bot token sent as `Authorization: Bot <token>`
    pub token: Option<String>,

    /// User agent header value
    pub user_agent: String,

    /// Per-request timeout in seconds, enforced by the HTTP client
    pub timeout_secs: u64,
}

/// Cache behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Remove deleted parts from their repository instead of flagging them
    pub prune_on_delete: bool,

    /// Top-level repositories refreshed at startup
    pub freshen_on_start: Vec<String>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            prune_on_delete: false,
            freshen_on_start: vec!["players".into(), "parties".into()],
        }
    }
}

/// Event dispatch configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EventSettings {
    /// Capacity of the broadcast channel feeding event subscribers
    pub channel_capacity: usize,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
        }
    }
}

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1/";

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if the API base URL is unusable.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default(
                "api.user_agent",
                concat!("part-cache/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("api.timeout_secs", 30)?
            .set_default("cache.prune_on_delete", false)?
            .set_default("cache.freshen_on_start", vec!["players", "parties"])?
            .set_default("events.channel_capacity", 1024_i64)?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__API__TIMEOUT_SECS=10 -> api.timeout_secs = 10
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("api.base_url", std::env::var("API_BASE_URL").ok())?
            .set_override_option("api.token", std::env::var("API_TOKEN").ok())?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| {
                settings.api.validate()?;
                Ok(settings)
            })
    }
}

impl ApiSettings {
    /// Check that `base_url` parses and can have relative paths joined onto it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        reqwest::Url::parse(&self.base_url).map_err(|e| {
            ConfigError::Message(format!("api.base_url `{}` is not a URL: {}", self.base_url, e))
        })?;
        if !self.base_url.ends_with('/') {
            return Err(ConfigError::Message(format!(
                "api.base_url `{}` must end with `/`",
                self.base_url
            )));
        }
        Ok(())
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            token: None,
            user_agent: concat!("part-cache/", env!("CARGO_PKG_VERSION")).into(),
            timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_api_settings_are_valid() {
        assert!(ApiSettings::default().validate().is_ok());
    }

    #[test]
    fn test_base_url_without_trailing_slash_is_rejected() {
        let settings = ApiSettings {
            base_url: "http://localhost:8080/api/v1".into(),
            ..ApiSettings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("must end with"));
    }

    #[test]
    fn test_unparseable_base_url_is_rejected() {
        let settings = ApiSettings {
            base_url: "::not a url::/".into(),
            ..ApiSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_cache_defaults() {
        let cache = CacheSettings::default();
        assert!(!cache.prune_on_delete);
        assert_eq!(cache.freshen_on_start, vec!["players", "parties"]);
        assert_eq!(EventSettings::default().channel_capacity, 1024);
    }
}
