//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use part_cache::application::Client;
use part_cache::config::CacheSettings;
use part_cache::domain::Attributes;
use part_cache::infrastructure::http::{Http, HttpMethod};
use part_cache::shared::{CacheError, CacheResult};

/// A request seen by [`FakeHttp`].
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
}

enum Scripted {
    Respond(Value),
    Fail(u16, String),
}

/// Scripted HTTP collaborator that records every request.
///
/// Unscripted routes answer 404.
#[derive(Default)]
pub struct FakeHttp {
    routes: Mutex<HashMap<(HttpMethod, String), Scripted>>,
    requests: Mutex<Vec<Recorded>>,
}

impl FakeHttp {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer `method path` with `body` (every time).
    pub fn respond(&self, method: HttpMethod, path: &str, body: Value) {
        self.routes
            .lock()
            .insert((method, path.to_string()), Scripted::Respond(body));
    }

    /// Answer `method path` with an HTTP error.
    pub fn fail(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
        self.routes
            .lock()
            .insert((method, path.to_string()), Scripted::Fail(status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    /// Number of requests issued for `method path`.
    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|request| request.method == method && request.path == path)
            .count()
    }
}

#[async_trait]
impl Http for FakeHttp {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> CacheResult<Value> {
        self.requests.lock().push(Recorded {
            method,
            path: path.to_string(),
            body,
        });

        match self.routes.lock().get(&(method, path.to_string())) {
            Some(Scripted::Respond(value)) => Ok(value.clone()),
            Some(Scripted::Fail(status, body)) => Err(CacheError::RemoteRequestFailed {
                status: Some(*status),
                body: body.clone(),
            }),
            None => Err(CacheError::RemoteRequestFailed {
                status: Some(404),
                body: format!("no route for {} {}", method, path),
            }),
        }
    }
}

/// A client backed by `http` with default cache settings.
pub fn client(http: Arc<FakeHttp>) -> Client {
    Client::new(http, CacheSettings::default()).expect("client builds")
}

/// Unwrap a JSON object literal into attributes.
pub fn object(value: Value) -> Attributes {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}
