//! Repository
//!
//! An ordered keyed cache of parts of one kind, synchronized with the remote
//! API through a set of endpoint templates.
//!
//! # Lifecycle
//!
//! ```text
//!   Factory::create(.., false)        save / freshen / fetch / fresh
//!  ───────────────────────> Transient ─────────────────────────> Persisted
//!                                                                   │
//!                                                    delete         │
//!                                     Deleted <─────────────────────┘
//! ```
//!
//! The cache is only touched after a response has arrived (or synchronously
//! for local operations); the lock is never held across an `.await`.

use std::fmt;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, instrument};

use super::collection::Collection;
use super::factory::Factory;
use crate::domain::{key_of, Attributes, Part, PartKind};
use crate::infrastructure::http::{Endpoint, Endpoints, HttpMethod, Operation};
use crate::infrastructure::metrics;
use crate::shared::error::{CacheError, CacheResult};

/// Cache of `K` parts plus the CRUD protocol that keeps it in sync.
pub struct Repository<K: PartKind> {
    factory: Factory,
    endpoints: Endpoints,
    vars: Attributes,
    items: RwLock<Collection<K>>,
}

impl<K: PartKind> Repository<K> {
    /// Build a repository, validating every endpoint template.
    ///
    /// Placeholders must be covered by the ambient `vars` keys or by the
    /// keys the kind contributes through its repository attributes.
    pub fn new(factory: Factory, endpoints: Endpoints, vars: Attributes) -> CacheResult<Self> {
        let mut known: Vec<&str> = vars.keys().map(String::as_str).collect();
        known.extend(K::repository_keys());
        endpoints.validate(&known)?;

        Ok(Self {
            factory,
            endpoints,
            vars,
            items: RwLock::new(Collection::new()),
        })
    }

    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Ambient variables bound into every endpoint of this repository.
    pub fn vars(&self) -> &Attributes {
        &self.vars
    }

    fn endpoint(&self, operation: Operation) -> CacheResult<&Endpoint> {
        self.endpoints
            .get(operation)
            .ok_or_else(|| CacheError::unsupported(operation, K::NAME))
    }

    /// Bind `operation`'s template from the part's repository attributes,
    /// overridden by the ambient vars.
    fn bind(&self, operation: Operation, part: &Part<K>) -> CacheResult<String> {
        let endpoint = self.endpoint(operation)?;
        let mut vars = part.repository_attributes();
        vars.extend(self.vars.clone());
        endpoint.bind_assoc(&vars)
    }

    /// A response may fill in a missing discriminator but never clear or change one.
    fn check_identity(before: Option<&str>, after: &Part<K>) -> CacheResult<()> {
        match (before, after.discriminator()) {
            (_, None) => Err(CacheError::UnexpectedResponse(format!(
                "response for {} has no usable `{}`",
                K::NAME,
                K::DISCRIMINATOR
            ))),
            (Some(before), Some(after)) if before != after => {
                Err(CacheError::UnexpectedResponse(format!(
                    "response for {} `{}` carries a different `{}`: {}",
                    K::NAME,
                    before,
                    K::DISCRIMINATOR,
                    after
                )))
            }
            _ => Ok(()),
        }
    }

    fn placeholder(&self, id: Value, created: bool) -> CacheResult<Part<K>> {
        let mut data = self.vars.clone();
        data.insert(K::DISCRIMINATOR.to_string(), id);
        self.factory.create(data, created)
    }

    // ------------------------------------------------------------------
    // Local operations
    // ------------------------------------------------------------------

    pub fn get(&self, key: &str) -> Option<Part<K>> {
        self.items.read().get(key).cloned()
    }

    pub fn has(&self, key: &str) -> bool {
        self.items.read().has(key)
    }

    /// Cache a part, replacing any entry with the same discriminator.
    pub fn push(&self, part: Part<K>) -> CacheResult<()> {
        self.items.write().push(part).map(|_| ())
    }

    pub fn pull(&self, key: &str) -> Option<Part<K>> {
        self.items.write().pull(key)
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Snapshot of every cached part, in insertion order.
    pub fn values(&self) -> Vec<Part<K>> {
        self.items.read().iter().cloned().collect()
    }

    pub fn keys(&self) -> Vec<String> {
        self.items.read().keys().collect()
    }

    pub fn first(&self) -> Option<Part<K>> {
        self.items.read().iter().next().cloned()
    }

    pub fn find(&self, predicate: impl Fn(&Part<K>) -> bool) -> Option<Part<K>> {
        self.items.read().iter().find(|part| predicate(part)).cloned()
    }

    pub fn filter(&self, predicate: impl Fn(&Part<K>) -> bool) -> Vec<Part<K>> {
        self.items
            .read()
            .iter()
            .filter(|part| predicate(part))
            .cloned()
            .collect()
    }

    /// Apply `f` to the cached part; see [`Collection::modify`] for how a
    /// changed discriminator is handled.
    pub fn modify<R>(
        &self,
        key: &str,
        f: impl FnOnce(&mut Part<K>) -> R,
    ) -> CacheResult<Option<R>> {
        self.items.write().modify(key, f)
    }

    pub fn clear(&self) {
        self.items.write().clear();
    }

    /// Drop stale entries (flipped by `delete`); returns how many were removed.
    pub fn prune(&self) -> usize {
        let pruned = self.items.write().retain(|part| !part.is_stale());
        if pruned > 0 {
            debug!(kind = K::NAME, pruned, "Pruned stale entries");
        }
        pruned
    }

    // ------------------------------------------------------------------
    // Remote operations
    // ------------------------------------------------------------------

    /// Build a transient part with the ambient vars merged over `attributes`.
    pub fn create(&self, attributes: Attributes) -> CacheResult<Part<K>> {
        let mut data = attributes;
        data.extend(self.vars.clone());
        self.factory.create(data, false)
    }

    /// Build a persisted part from remote data, ambient vars first.
    ///
    /// Used for listing records, fetch responses and gateway payloads. The
    /// part is not cached.
    pub fn hydrate(&self, data: Attributes) -> CacheResult<Part<K>> {
        let mut merged = self.vars.clone();
        merged.extend(data);
        self.factory.create(merged, true)
    }

    /// Replace the whole cache with the listing response.
    ///
    /// Every record is hydrated before the cache is touched, so a malformed
    /// listing leaves the previous contents in place.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of cached parts after the refresh
    /// * `Err(CacheError::UnsupportedOperation)` - No `all` endpoint
    /// * `Err(CacheError::UnexpectedResponse)` - The listing is not an array of objects
    #[instrument(skip_all, fields(kind = K::NAME))]
    pub async fn freshen(&self) -> CacheResult<usize> {
        let path = self.endpoint(Operation::All)?.bind_assoc(&self.vars)?;
        let response = self.factory.http().get(&path).await?;

        let Value::Array(records) = response else {
            return Err(CacheError::UnexpectedResponse(format!(
                "listing for {} is not an array",
                K::NAME
            )));
        };

        let mut parts = Vec::with_capacity(records.len());
        for record in records {
            let Value::Object(record) = record else {
                return Err(CacheError::UnexpectedResponse(format!(
                    "listing for {} contains a non-object record",
                    K::NAME
                )));
            };
            parts.push(self.hydrate(record)?);
        }

        let count = {
            let mut items = self.items.write();
            items.clear();
            for part in parts {
                items.push(part)?;
            }
            items.len()
        };

        debug!(count, "Repository freshened");
        Ok(count)
    }

    /// Persist `part` remotely.
    ///
    /// Transient parts are POSTed to the `create` endpoint with their
    /// creatable attributes; persisted parts are PATCHed to the `update`
    /// endpoint with their updatable attributes. On success the response is
    /// merged into `part`, which is then cached and returned. A response that
    /// clears or changes the discriminator is rejected and `part` is left as
    /// it was.
    #[instrument(skip_all, fields(kind = K::NAME, created = part.created()))]
    pub async fn save(&self, part: &mut Part<K>) -> CacheResult<Part<K>> {
        let (method, operation, body) = if part.created() {
            (HttpMethod::Patch, Operation::Update, part.updatable_attributes())
        } else {
            (HttpMethod::Post, Operation::Create, part.creatable_attributes())
        };
        let path = self.bind(operation, part)?;

        let response = self
            .factory
            .http()
            .call(method, &path, Some(Value::Object(body)))
            .await?;

        let before = part.discriminator();
        let mut saved = part.clone();
        saved.fill_value(response);
        Self::check_identity(before.as_deref(), &saved)?;
        saved.mark_persisted()?;
        if before.is_none() {
            saved.rewire(&self.factory)?;
        }

        self.push(saved.clone())?;
        debug!(key = ?saved.discriminator(), "Part saved");
        *part = saved.clone();
        Ok(saved)
    }

    /// Delete `part` remotely.
    ///
    /// The part must be persisted; otherwise this fails before any request
    /// is issued. On success both `part` and the cached copy are flagged
    /// deleted, or the cached copy is dropped when `prune_on_delete` is set.
    #[instrument(skip_all, fields(kind = K::NAME, key = ?part.discriminator()))]
    pub async fn delete(&self, part: &mut Part<K>) -> CacheResult<()> {
        if !part.created() {
            return Err(CacheError::PreconditionFailed(format!(
                "cannot delete a {} that has not been created",
                K::NAME
            )));
        }
        let path = self.bind(Operation::Delete, part)?;

        self.factory.http().delete(&path).await?;
        part.mark_deleted();

        if let Some(key) = part.discriminator() {
            let mut items = self.items.write();
            if self.factory.settings().prune_on_delete {
                items.pull(&key);
            } else if let Some(cached) = items.get_mut(&key) {
                cached.mark_deleted();
            }
        }
        Ok(())
    }

    /// Delete by discriminator.
    ///
    /// Uses the cached part when there is one; otherwise a hydrated
    /// placeholder carrying only the discriminator and the ambient vars.
    pub async fn delete_by_id(&self, id: impl Into<Value>) -> CacheResult<Part<K>> {
        let id = id.into();
        let mut part = match key_of(&id).and_then(|key| self.get(&key)) {
            Some(part) => part,
            None => self.placeholder(id, true)?,
        };
        self.delete(&mut part).await?;
        Ok(part)
    }

    /// Re-read a persisted part and merge the response into it in place.
    #[instrument(skip_all, fields(kind = K::NAME, key = ?part.discriminator()))]
    pub async fn fresh(&self, part: &mut Part<K>) -> CacheResult<Part<K>> {
        if !part.created() {
            return Err(CacheError::PreconditionFailed(format!(
                "cannot refresh a {} that has not been created",
                K::NAME
            )));
        }
        let path = self.bind(Operation::Get, part)?;

        let response = self.factory.http().get(&path).await?;
        let mut refreshed = part.clone();
        refreshed.fill_value(response);
        Self::check_identity(part.discriminator().as_deref(), &refreshed)?;

        if let Some(key) = refreshed.discriminator() {
            let mut items = self.items.write();
            if items.has(&key) {
                items.push(refreshed.clone())?;
            }
        }
        *part = refreshed.clone();
        Ok(refreshed)
    }

    /// Cache-or-network read by discriminator.
    ///
    /// A live cached entry is returned without a request unless `force` is
    /// set; stale entries count as misses. A fetched part is cached before
    /// it is returned, so repeated calls issue at most one request.
    #[instrument(skip(self, id), fields(kind = K::NAME))]
    pub async fn fetch(&self, id: impl Into<Value>, force: bool) -> CacheResult<Part<K>> {
        let id = id.into();
        let key = key_of(&id).ok_or_else(|| {
            CacheError::PreconditionFailed(format!("`{}` cannot identify a {}", id, K::NAME))
        })?;

        if !force {
            let cached = self.items.read().get(&key).filter(|part| !part.is_stale()).cloned();
            if let Some(part) = cached {
                metrics::record_cache_lookup(K::NAME, true);
                debug!(%key, "Cache hit");
                return Ok(part);
            }
        }
        metrics::record_cache_lookup(K::NAME, false);

        let path = self.bind(Operation::Get, &self.placeholder(id.clone(), false)?)?;
        let response = self.factory.http().get(&path).await?;

        let mut data = self.vars.clone();
        data.insert(K::DISCRIMINATOR.to_string(), id);
        if let Value::Object(response) = response {
            data.extend(response);
        }
        let mut part = self.factory.create(data, false)?;
        Self::check_identity(Some(key.as_str()), &part)?;
        part.mark_persisted()?;

        self.push(part.clone())?;
        debug!(%key, "Fetched from remote");
        Ok(part)
    }
}

impl<K: PartKind> fmt::Debug for Repository<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("kind", &K::NAME)
            .field("vars", &self.vars)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
