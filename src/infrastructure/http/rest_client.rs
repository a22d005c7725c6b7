//! Reqwest-backed implementation of the [`Http`] collaborator.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use serde_json::Value;
use tracing::{instrument, warn};

use super::client::{Http, HttpMethod};
use super::rate_limit::RateLimit;
use crate::config::ApiSettings;
use crate::shared::error::{CacheError, CacheResult};

/// REST client for the remote API.
///
/// Bound endpoint paths are joined onto `api.base_url`. Timeouts are
/// enforced here; the cache layer itself never times out a request.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl RestClient {
    /// Build a client from API settings.
    pub fn new(settings: &ApiSettings) -> CacheResult<Self> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            CacheError::Configuration(format!("invalid api.base_url `{}`: {}", settings.base_url, e))
        })?;

        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| CacheError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            token: settings.token.clone(),
        })
    }

    /// Resolve a bound endpoint path against the base URL.
    pub fn url(&self, path: &str) -> CacheResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| CacheError::Configuration(format!("invalid path `{}`: {}", path, e)))
    }
}

fn transport_error(error: reqwest::Error) -> CacheError {
    CacheError::RemoteRequestFailed {
        status: error.status().map(|s| s.as_u16()),
        body: error.to_string(),
    }
}

#[async_trait]
impl Http for RestClient {
    #[instrument(skip(self, body))]
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> CacheResult<Value> {
        let mut request = self.client.request(method.into(), self.url(path)?);

        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bot {}", token));
        }
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").json(&body);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            let limit = serde_json::from_str(&text)
                .ok()
                .and_then(|body: Value| RateLimit::from_body(&body))
                .unwrap_or_else(|| RateLimit::new(false, 0.0));
            warn!(%limit, path, "Rate limited by remote API");
            return Err(CacheError::RateLimited(limit));
        }

        if !status.is_success() {
            return Err(CacheError::RemoteRequestFailed {
                status: Some(status.as_u16()),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base_url: &str) -> ApiSettings {
        ApiSettings {
            base_url: base_url.into(),
            token: Some("secret".into()),
            user_agent: "part-cache-tests".into(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_url_joins_relative_and_rooted_paths() {
        let client = RestClient::new(&settings("http://localhost:8080/api/v1/")).unwrap();

        assert_eq!(
            client.url("players/42").unwrap().as_str(),
            "http://localhost:8080/api/v1/players/42"
        );
        assert_eq!(
            client.url("/players/42").unwrap().as_str(),
            "http://localhost:8080/api/v1/players/42"
        );
        assert_eq!(
            client.url("oauth2/applications/@me").unwrap().as_str(),
            "http://localhost:8080/api/v1/oauth2/applications/@me"
        );
    }

    #[test]
    fn test_invalid_base_url_is_configuration_error() {
        let result = RestClient::new(&settings("not a url"));
        assert!(matches!(result, Err(CacheError::Configuration(_))));
    }
}
