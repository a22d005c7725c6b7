//! Application Layer
//!
//! The client that owns the nested cache graph and orchestrates startup
//! loading on top of the infrastructure repositories.

pub mod client;

pub use client::{Client, REPOSITORY_NAMES};
