//! # Configuration Module
//!
//! This module handles application configuration loading and management.
//! Configuration can be loaded from:
//! - Environment variables (prefixed with APP__, plus `API_BASE_URL` and `API_TOKEN`)
//! - Configuration files (config/default.toml, config/{environment}.toml)
//! - .env files (via dotenvy)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use part_cache::config::Settings;
//!
//! let settings = Settings::load()?;
//! println!("Remote API at {}", settings.api.base_url);
//! ```

mod settings;

pub use settings::*;
