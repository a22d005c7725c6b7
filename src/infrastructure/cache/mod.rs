//! Cache Module
//!
//! The local mirror of remote state.
//!
//! This module provides:
//! - `Collection`, the ordered discriminator-keyed storage of one kind
//! - `Repository`, a collection plus the CRUD protocol against the remote API
//! - `Factory`, which builds parts and wires their child repositories
//!
//! # Architecture
//!
//! ```text
//! +-------------------+
//! |   Client          |  <-- root of the nested graph
//! +-------------------+
//!          |
//!          v
//! +-------------------+        +-------------------+
//! |   Repository<K>   | -----> |   dyn Http        |
//! +-------------------+        +-------------------+
//!          |
//!          v
//! +-------------------+
//! |   Part<K>         |  <-- may own child repositories
//! +-------------------+
//! ```

mod collection;
mod factory;
mod repository;

pub use collection::Collection;
pub use factory::Factory;
pub use repository::Repository;
