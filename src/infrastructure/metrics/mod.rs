//! Prometheus Metrics Module
//!
//! Provides cache-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - Repository lookups by part kind and outcome (hit/miss)
//! - Remote requests by HTTP method and outcome
//! - Gateway events by type and resolution kind

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Repository lookup counter - tracks `fetch` cache hits and misses per part kind
pub static CACHE_LOOKUPS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("cache_lookups_total", "Total number of repository cache lookups")
            .namespace("part_cache"),
        &["kind", "outcome"],
    )
    .expect("Failed to create CACHE_LOOKUPS_TOTAL metric")
});

/// Remote request counter - tracks requests by method and outcome
pub static REMOTE_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("remote_requests_total", "Total number of remote API requests")
            .namespace("part_cache"),
        &["method", "outcome"],
    )
    .expect("Failed to create REMOTE_REQUESTS_TOTAL metric")
});

/// Gateway event counter - tracks handled events by type and resolution
pub static EVENTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("events_total", "Total number of handled gateway events")
            .namespace("part_cache"),
        &["event", "outcome"], // "part", "parts", "raw"
    )
    .expect("Failed to create EVENTS_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(CACHE_LOOKUPS_TOTAL.clone()))
        .expect("Failed to register CACHE_LOOKUPS_TOTAL");
    registry
        .register(Box::new(REMOTE_REQUESTS_TOTAL.clone()))
        .expect("Failed to register REMOTE_REQUESTS_TOTAL");
    registry
        .register(Box::new(EVENTS_TOTAL.clone()))
        .expect("Failed to register EVENTS_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Metrics should be valid UTF-8")
}

/// Helper to record a repository lookup
pub fn record_cache_lookup(kind: &str, hit: bool) {
    Lazy::force(&REGISTRY);
    CACHE_LOOKUPS_TOTAL
        .with_label_values(&[kind, if hit { "hit" } else { "miss" }])
        .inc();
}

/// Helper to record a remote request
pub fn record_remote_request(method: &str, success: bool) {
    Lazy::force(&REGISTRY);
    REMOTE_REQUESTS_TOTAL
        .with_label_values(&[method, if success { "ok" } else { "error" }])
        .inc();
}

/// Helper to record a handled gateway event
pub fn record_event(event: &str, outcome: &str) {
    Lazy::force(&REGISTRY);
    EVENTS_TOTAL.with_label_values(&[event, outcome]).inc();
}
