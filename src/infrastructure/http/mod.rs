//! HTTP Module
//!
//! Everything the cache layer needs to reach the remote API:
//! - The `Http` trait, the boundary with the HTTP collaborator
//! - `Endpoint` templates and per-repository `Endpoints`
//! - `RateLimit` details for HTTP 429 responses
//! - `RestClient`, the reqwest implementation of `Http`

mod client;
mod endpoint;
mod rate_limit;
mod rest_client;

#[cfg(test)]
pub use client::MockHttp;
pub use client::{Http, HttpMethod};
pub use endpoint::{routes, Endpoint, Endpoints, Operation};
pub use rate_limit::RateLimit;
pub use rest_client::RestClient;
