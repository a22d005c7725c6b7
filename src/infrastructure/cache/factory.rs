//! Part Factory
//!
//! Builds parts from raw key-value data and wires the dependencies each
//! kind's child repositories need before the part is handed out.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::repository::Repository;
use crate::config::CacheSettings;
use crate::domain::{Attributes, Part, PartKind, Wire};
use crate::infrastructure::http::{Endpoints, Http};
use crate::shared::error::{CacheError, CacheResult};

/// Shared construction context for parts and repositories.
///
/// Cloning a factory clones two `Arc` handles; every part built from the
/// same factory shares one HTTP collaborator and one settings block and
/// nothing else.
#[derive(Clone)]
pub struct Factory {
    http: Arc<dyn Http>,
    settings: Arc<CacheSettings>,
}

impl Factory {
    pub fn new(http: Arc<dyn Http>, settings: CacheSettings) -> Self {
        Self {
            http,
            settings: Arc::new(settings),
        }
    }

    pub fn http(&self) -> &Arc<dyn Http> {
        &self.http
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// Build a part of kind `K`.
    ///
    /// Child repositories are wired first, then `data` is filled. When
    /// `created` is set the part is hydrated as persisted, which requires a
    /// discriminator in `data`.
    ///
    /// # Arguments
    /// * `data` - Raw fields, filtered through the kind's whitelist
    /// * `created` - Whether the data came from a remote response
    ///
    /// # Returns
    /// * `Ok(Part<K>)` - A fully wired part
    /// * `Err(CacheError::PreconditionFailed)` - `created` without a discriminator
    /// * `Err(CacheError::Configuration)` - A child repository could not be built
    pub fn create<K: PartKind>(&self, data: Attributes, created: bool) -> CacheResult<Part<K>> {
        let relations = K::Relations::wire(self, &data)?;
        let mut part = Part::assemble(data, relations);
        if created {
            part.mark_persisted()?;
        }
        Ok(part)
    }

    /// Like [`Factory::create`], for a JSON value that must be an object.
    pub fn create_value<K: PartKind>(&self, data: Value, created: bool) -> CacheResult<Part<K>> {
        match data {
            Value::Object(map) => self.create(map, created),
            other => Err(CacheError::UnexpectedResponse(format!(
                "expected an object to build a {}, got {}",
                K::NAME,
                other
            ))),
        }
    }

    /// Build a repository of `K` sharing this factory.
    pub fn repository<K: PartKind>(
        &self,
        endpoints: Endpoints,
        vars: Attributes,
    ) -> CacheResult<Arc<Repository<K>>> {
        Repository::new(self.clone(), endpoints, vars).map(Arc::new)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
