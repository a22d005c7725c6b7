//! Parts: locally cached, attribute-holding mirrors of remote objects.
//!
//! A [`Part`] is plain data. Its shape is described once per kind by a
//! [`PartKind`] implementation: the discriminator, the fillable whitelist,
//! the computed attribute table and the child repositories a part of that
//! kind owns. No per-kind getters or setters are needed.
//!
//! ```text
//!  raw JSON ──fill──> attributes (whitelisted + discriminator)
//!                 └─> extra      (everything else, readable by resolvers)
//! ```

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::infrastructure::cache::Factory;
use crate::shared::error::{CacheError, CacheResult};

/// Ordered attribute map (`serde_json` is built with `preserve_order`).
pub type Attributes = Map<String, Value>;

/// Normalize a discriminator value into a cache key.
///
/// Strings are used as-is, numbers are rendered in decimal. Anything else
/// (null, bools, empty strings, containers) cannot identify a part.
pub fn key_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Resolver signature for computed attributes.
pub type Resolver<K> = fn(&Part<K>) -> Option<Value>;

/// A computed attribute: a value derived on read from stored attributes.
pub struct Computed<K: PartKind> {
    pub name: &'static str,
    pub resolve: Resolver<K>,
    /// Whether the value is sent back to the API on create/update.
    pub updatable: bool,
}

impl<K: PartKind> Computed<K> {
    /// A read-only computed attribute.
    pub const fn readonly(name: &'static str, resolve: Resolver<K>) -> Self {
        Self {
            name,
            resolve,
            updatable: false,
        }
    }

    /// A computed attribute that is included in create/update payloads.
    pub const fn updatable(name: &'static str, resolve: Resolver<K>) -> Self {
        Self {
            name,
            resolve,
            updatable: true,
        }
    }
}

/// Child repositories owned by a part, wired by the [`Factory`].
pub trait Wire: Clone + fmt::Debug + Send + Sync + Sized + 'static {
    /// Build the relations for a part from the data it is being built from.
    fn wire(factory: &Factory, attributes: &Attributes) -> CacheResult<Self>;
}

impl Wire for () {
    fn wire(_factory: &Factory, _attributes: &Attributes) -> CacheResult<Self> {
        Ok(())
    }
}

/// Type-level definition of a part kind.
pub trait PartKind: Send + Sync + Sized + 'static {
    /// Human readable kind name, used in errors and logs.
    const NAME: &'static str;

    /// Attribute that identifies a part within its repository.
    const DISCRIMINATOR: &'static str = "id";

    /// Attributes accepted into the persisted view by `fill`.
    const FILLABLE: &'static [&'static str];

    /// Computed attributes, consulted by `get` after stored attributes.
    const COMPUTED: &'static [Computed<Self>] = &[];

    /// Child repositories owned by parts of this kind.
    type Relations: Wire;

    /// Keys produced by [`PartKind::repository_attributes`]; used to validate
    /// endpoint templates when a repository is built.
    fn repository_keys() -> Vec<&'static str> {
        vec![Self::DISCRIMINATOR]
    }

    /// Values bound into this kind's endpoint templates.
    fn repository_attributes(part: &Part<Self>) -> Attributes {
        let mut attributes = Attributes::new();
        if let Some(value) = part.attribute(Self::DISCRIMINATOR) {
            attributes.insert(Self::DISCRIMINATOR.to_string(), value.clone());
        }
        attributes
    }

    /// Payload sent when creating the part remotely.
    fn creatable_attributes(part: &Part<Self>) -> Attributes {
        part.outbound_view()
    }

    /// Payload sent when updating the part remotely.
    fn updatable_attributes(part: &Part<Self>) -> Attributes {
        part.outbound_view()
    }
}

/// A cached, lazily hydrated representation of a remote object.
pub struct Part<K: PartKind> {
    attributes: Attributes,
    extra: Attributes,
    created: bool,
    deleted: bool,
    relations: K::Relations,
}

impl<K: PartKind> Part<K> {
    /// Split raw data into whitelisted attributes and extras, then attach relations.
    pub(crate) fn assemble(data: Attributes, relations: K::Relations) -> Self {
        let mut part = Self {
            attributes: Attributes::new(),
            extra: Attributes::new(),
            created: false,
            deleted: false,
            relations,
        };
        part.fill(data);
        part
    }

    fn is_fillable(key: &str) -> bool {
        key == K::DISCRIMINATOR || K::FILLABLE.contains(&key)
    }

    /// Merge raw fields into the part.
    ///
    /// Whitelisted keys (and the discriminator) land in the persisted view;
    /// every other key is kept aside for computed attributes. Applying the
    /// same data twice yields the same state.
    pub fn fill(&mut self, data: Attributes) {
        for (key, value) in data {
            if Self::is_fillable(&key) {
                self.attributes.insert(key, value);
            } else {
                self.extra.insert(key, value);
            }
        }
    }

    /// Merge a JSON value into the part; non-objects are ignored.
    pub fn fill_value(&mut self, data: Value) {
        if let Value::Object(map) = data {
            self.fill(map);
        }
    }

    /// Set a single attribute, subject to the same whitelist as `fill`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let mut data = Attributes::new();
        data.insert(name.into(), value.into());
        self.fill(data);
    }

    /// Read an attribute: stored value first, then a computed resolver.
    pub fn get(&self, name: &str) -> CacheResult<Value> {
        if let Some(value) = self.attributes.get(name) {
            return Ok(value.clone());
        }

        K::COMPUTED
            .iter()
            .find(|computed| computed.name == name)
            .and_then(|computed| (computed.resolve)(self))
            .ok_or_else(|| CacheError::AttributeNotFound {
                part: K::NAME,
                attribute: name.to_string(),
            })
    }

    /// Stored attribute, without consulting resolvers.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Stored attribute or retained extra. Intended for resolvers.
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name).or_else(|| self.extra.get(name))
    }

    /// Stored attribute rendered as a cache key (see [`key_of`]).
    pub fn key(&self, name: &str) -> Option<String> {
        self.raw(name).and_then(key_of)
    }

    /// The persisted attribute view.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Keys that were dropped by the whitelist but retained.
    pub fn extra(&self) -> &Attributes {
        &self.extra
    }

    /// The discriminator value as a cache key.
    pub fn discriminator(&self) -> Option<String> {
        self.attributes.get(K::DISCRIMINATOR).and_then(key_of)
    }

    /// Whether the part has a persisted remote counterpart.
    pub fn created(&self) -> bool {
        self.created
    }

    /// Whether the remote counterpart has been removed.
    pub fn deleted(&self) -> bool {
        self.deleted
    }

    /// A cached entry that no longer mirrors a live remote object.
    pub fn is_stale(&self) -> bool {
        !self.created
    }

    /// Child repositories owned by this part.
    pub fn relations(&self) -> &K::Relations {
        &self.relations
    }

    pub fn creatable_attributes(&self) -> Attributes {
        K::creatable_attributes(self)
    }

    pub fn updatable_attributes(&self) -> Attributes {
        K::updatable_attributes(self)
    }

    pub fn repository_attributes(&self) -> Attributes {
        K::repository_attributes(self)
    }

    /// Fillable attributes minus the discriminator, plus updatable computed values.
    pub fn outbound_view(&self) -> Attributes {
        let mut view: Attributes = self
            .attributes
            .iter()
            .filter(|(key, _)| key.as_str() != K::DISCRIMINATOR)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        for computed in K::COMPUTED.iter().filter(|c| c.updatable) {
            if let Some(value) = (computed.resolve)(self) {
                view.insert(computed.name.to_string(), value);
            }
        }
        view
    }

    /// Mark the part as persisted remotely.
    ///
    /// Fails if the part has no discriminator: a live remote identity
    /// always has a key.
    pub(crate) fn mark_persisted(&mut self) -> CacheResult<()> {
        if self.discriminator().is_none() {
            return Err(CacheError::PreconditionFailed(format!(
                "{} has no `{}` and cannot be marked as created",
                K::NAME,
                K::DISCRIMINATOR
            )));
        }
        self.created = true;
        self.deleted = false;
        Ok(())
    }

    /// Mark the part as removed remotely.
    pub(crate) fn mark_deleted(&mut self) {
        self.created = false;
        self.deleted = true;
    }

    /// Rebuild child repositories, e.g. once a transient part learns its id.
    pub(crate) fn rewire(&mut self, factory: &Factory) -> CacheResult<()> {
        self.relations = K::Relations::wire(factory, &self.attributes)?;
        Ok(())
    }
}

impl<K: PartKind> Clone for Part<K> {
    fn clone(&self) -> Self {
        Self {
            attributes: self.attributes.clone(),
            extra: self.extra.clone(),
            created: self.created,
            deleted: self.deleted,
            relations: self.relations.clone(),
        }
    }
}

/// Attribute-equal state; relations are handles and are not compared.
impl<K: PartKind> PartialEq for Part<K> {
    fn eq(&self, other: &Self) -> bool {
        self.attributes == other.attributes
            && self.extra == other.extra
            && self.created == other.created
            && self.deleted == other.deleted
    }
}

impl<K: PartKind> fmt::Debug for Part<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(K::NAME)
            .field("attributes", &self.attributes)
            .field("created", &self.created)
            .field("deleted", &self.deleted)
            .field("relations", &self.relations)
            .finish()
    }
}

/// Renders the `mention` computed attribute when the kind has one.
impl<K: PartKind> fmt::Display for Part<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get("mention") {
            Ok(Value::String(mention)) => f.write_str(&mention),
            _ => write!(
                f,
                "{}({})",
                K::NAME,
                self.discriminator().unwrap_or_else(|| "?".into())
            ),
        }
    }
}

impl<K: PartKind> Serialize for Part<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.attributes.serialize(serializer)
    }
}
