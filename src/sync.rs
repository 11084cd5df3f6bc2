use std::borrow::Borrow;

use parking_lot::RwLock;
use rand::{RngCore, rngs::SmallRng};

use crate::{error::Result, options::SkipListConfig, skip_list::SkipList};

/// A [`SkipList`] behind one reader/writer lock.
///
/// Lookups and length queries share the lock; `insert` and `remove` hold it
/// exclusively for the whole traversal and splice, so the predecessor scratch
/// buffer is never visible outside a single write.
pub struct SyncSkipList<K, V, R = SmallRng> {
    inner: RwLock<SkipList<K, V, R>>,
}

impl<K, V> SyncSkipList<K, V>
where
    K: Ord,
{
    pub fn new(max_level: usize, skip_factor: u32) -> Result<Self> {
        Ok(Self::from_list(SkipList::new(max_level, skip_factor)?))
    }

    pub fn with_config(config: SkipListConfig) -> Self {
        Self::from_list(SkipList::with_config(config))
    }

    pub fn with_seed(config: SkipListConfig, seed: u64) -> Self {
        Self::from_list(SkipList::with_seed(config, seed))
    }
}

impl<K, V> Default for SyncSkipList<K, V>
where
    K: Ord,
{
    fn default() -> Self {
        Self::from_list(SkipList::default())
    }
}

impl<K, V, R> From<SkipList<K, V, R>> for SyncSkipList<K, V, R> {
    fn from(list: SkipList<K, V, R>) -> Self {
        Self::from_list(list)
    }
}

impl<K, V, R> SyncSkipList<K, V, R> {
    pub fn from_list(list: SkipList<K, V, R>) -> Self {
        Self {
            inner: RwLock::new(list),
        }
    }

    pub fn into_inner(self) -> SkipList<K, V, R> {
        self.inner.into_inner()
    }
}

impl<K, V, R> SyncSkipList<K, V, R>
where
    K: Ord,
    R: RngCore,
{
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Clone,
    {
        self.inner.read().get(key).cloned()
    }

    /// Runs `f` on the value under the read lock, for values that are costly
    /// to clone.
    pub fn get_with<Q, F, T>(&self, key: &Q, f: F) -> Option<T>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        F: FnOnce(&V) -> T,
    {
        self.inner.read().get(key).map(f)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.read().contains_key(key)
    }

    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.write().insert(key, value)
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.write().remove(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn level(&self) -> usize {
        self.inner.read().level()
    }

    pub fn max_level(&self) -> usize {
        self.inner.read().max_level()
    }

    pub fn skip_factor(&self) -> u32 {
        self.inner.read().skip_factor()
    }
}

impl<K, V, R> std::fmt::Debug for SyncSkipList<K, V, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSkipList")
            .field("inner", &*self.inner.read())
            .finish()
    }
}
