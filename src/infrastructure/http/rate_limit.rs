//! Rate limit information returned by the remote API on HTTP 429.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A rate limit reported by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateLimit {
    /// Whether the limit applies to every route
    #[serde(default)]
    pub global: bool,
    /// Seconds to wait before the route accepts requests again
    pub retry_after: f64,
}

impl RateLimit {
    pub fn new(global: bool, retry_after: f64) -> Self {
        Self {
            global,
            retry_after,
        }
    }

    /// Parse a 429 response body.
    pub fn from_body(body: &Value) -> Option<Self> {
        serde_json::from_value(body.clone()).ok()
    }

    pub fn is_global(&self) -> bool {
        self.global
    }

    pub fn retry_after(&self) -> f64 {
        self.retry_after
    }
}

impl fmt::Display for RateLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RATELIMIT {}, retry after {} s",
            if self.global { "Global" } else { "Non-global" },
            self.retry_after
        )
    }
}
