//! HTTP collaborator boundary.
//!
//! Repositories never talk to the network directly: they issue one of
//! {GET, POST, PATCH, DELETE} against a fully bound path through the [`Http`]
//! trait and get back a decoded JSON value or a [`CacheError`].

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::infrastructure::metrics;
use crate::shared::error::CacheResult;

/// HTTP verbs used by the cache layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// The remote API client.
///
/// Implementations own transport concerns (base URL, auth, timeouts).
/// Empty success bodies decode to `Value::Null`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Http: Send + Sync {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> CacheResult<Value>;
}

impl dyn Http {
    async fn send(&self, method: HttpMethod, path: &str, body: Option<Value>) -> CacheResult<Value> {
        debug!(%method, path, "Issuing remote request");
        let result = self.request(method, path, body).await;
        metrics::record_remote_request(method.as_str(), result.is_ok());
        result
    }

    pub async fn get(&self, path: &str) -> CacheResult<Value> {
        self.send(HttpMethod::Get, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> CacheResult<Value> {
        self.send(HttpMethod::Post, path, Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: Value) -> CacheResult<Value> {
        self.send(HttpMethod::Patch, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> CacheResult<Value> {
        self.send(HttpMethod::Delete, path, None).await
    }

    /// Issue `method` with an optional body.
    pub async fn call(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> CacheResult<Value> {
        self.send(method, path, body).await
    }
}
