//! # Part Cache Library
//!
//! A lazily hydrated local mirror of a remote chat/game API:
//! - Generic attribute-driven parts with computed attributes
//! - Repositories with endpoint templating and cache-or-fetch reads
//! - A nested cache graph (guild → channel → message, thread → member)
//! - Gateway event handlers with exactly-once completion signals
//!
//! ## Architecture
//!
//! - **Domain Layer**: the part model and concrete kinds
//! - **Application Layer**: the client owning the cache graph
//! - **Infrastructure Layer**: HTTP client, repositories, metrics
//! - **Presentation Layer**: gateway event dispatch and handlers
//!
//! ## Module Structure
//!
//! ```text
//! part_cache/
//! +-- config/         Configuration management
//! +-- domain/         Parts, kinds and value objects
//! +-- application/    The client
//! +-- infrastructure/ HTTP, cache and metrics
//! +-- presentation/   Gateway event handling
//! +-- shared/         Errors
//! ```

// Configuration module
pub mod config;

// Domain layer - parts and kinds
pub mod domain;

// Application layer - the client
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - gateway events
pub mod presentation;

// Shared utilities
pub mod shared;

// Runtime wiring
pub mod startup;

// Telemetry and observability
pub mod telemetry;
