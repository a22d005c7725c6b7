//! # Domain Layer
//!
//! The part model and the concrete kinds mirrored from the remote API.
//!
//! ## Structure
//!
//! - **part**: the generic `Part<K>` and the `PartKind` description trait
//! - **entities**: concrete kinds (Player, Party, Guild, Channel, Message, ...)
//! - **value_objects**: immutable value types (Snowflake)
//!
//! ## Design Principles
//!
//! - Parts are plain data plus derivation logic; they perform no I/O
//! - Per-kind behaviour is declared once through `PartKind` constants
//! - Parents own their child repositories, children only hold parent ids

pub mod entities;
pub mod part;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use part::{key_of, Attributes, Computed, Part, PartKind, Resolver, Wire};
pub use value_objects::*;
