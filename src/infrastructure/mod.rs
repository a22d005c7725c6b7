//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - The remote API client and endpoint templates
//! - The in-memory part cache
//! - Prometheus metrics

pub mod cache;
pub mod http;
pub mod metrics;
