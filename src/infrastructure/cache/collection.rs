//! Ordered, discriminator-keyed storage for parts of one kind.

use indexmap::IndexMap;

use crate::domain::{Part, PartKind};
use crate::shared::error::{CacheError, CacheResult};

/// Insertion-ordered map from discriminator to part.
///
/// Pushing a part whose discriminator is already present replaces the
/// stored value in place (last write wins, no merge). Every stored part's
/// discriminator equals the key it is stored under.
pub struct Collection<K: PartKind> {
    items: IndexMap<String, Part<K>>,
}

impl<K: PartKind> Collection<K> {
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Part<K>> {
        self.items.get(key)
    }

    /// Mutable access for changes that keep the discriminator; use
    /// [`Collection::modify`] for anything else.
    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Part<K>> {
        self.items.get_mut(key)
    }

    /// Insert or replace; returns the replaced part.
    pub fn push(&mut self, part: Part<K>) -> CacheResult<Option<Part<K>>> {
        let key = part.discriminator().ok_or_else(|| {
            CacheError::PreconditionFailed(format!(
                "cannot cache a {} without `{}`",
                K::NAME,
                K::DISCRIMINATOR
            ))
        })?;
        Ok(self.items.insert(key, part))
    }

    /// Apply `f` to the part stored under `key`.
    ///
    /// When `f` changes the discriminator the entry is re-keyed in place.
    /// If the new discriminator is missing or already taken by another
    /// entry, the stored part is left untouched and an error is returned.
    pub fn modify<R>(
        &mut self,
        key: &str,
        f: impl FnOnce(&mut Part<K>) -> R,
    ) -> CacheResult<Option<R>> {
        let Some((index, _, stored)) = self.items.get_full(key) else {
            return Ok(None);
        };
        let mut part = stored.clone();
        let result = f(&mut part);

        match part.discriminator() {
            Some(new_key) if new_key == key => {
                if let Some((_, slot)) = self.items.get_index_mut(index) {
                    *slot = part;
                }
            }
            Some(new_key) if !self.items.contains_key(&new_key) => {
                self.items.shift_remove_index(index);
                self.items.shift_insert(index, new_key, part);
            }
            new_key => {
                return Err(CacheError::PreconditionFailed(format!(
                    "cannot re-key {} `{}` to {:?}: `{}` must stay present and unique",
                    K::NAME,
                    key,
                    new_key,
                    K::DISCRIMINATOR
                )))
            }
        }
        Ok(Some(result))
    }

    /// Remove and return the part stored under `key`, keeping the order of the rest.
    pub fn pull(&mut self, key: &str) -> Option<Part<K>> {
        self.items.shift_remove(key)
    }

    /// Keep only the parts matching `keep`; returns how many were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&Part<K>) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|_, part| keep(part));
        before - self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Part<K>> {
        self.items.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.items.keys().cloned()
    }
}

impl<K: PartKind> Default for Collection<K> {
    fn default() -> Self {
        Self::new()
    }
}
