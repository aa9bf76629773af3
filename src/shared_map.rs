use parking_lot::Mutex;
use std::{
    borrow::Borrow,
    fmt,
    hash::{BuildHasher, Hash},
    marker::PhantomData,
    sync::Arc,
};

use crate::{map::Map, ordered_map::OrderedHashMap};

/// Wrapper for a map which is shareable across thread boundaries. Every call,
/// reads included, holds the one lock for its whole duration; the map inside
/// has no idea it's being shared.
pub struct SharedMap<M, K, V>(Arc<Mutex<M>>, PhantomData<K>, PhantomData<V>)
where
    M: Map<K, V>,
    K: Eq + Hash,
    V: Clone;

impl<M, K, V> SharedMap<M, K, V>
where
    M: Map<K, V>,
    K: Eq + Hash,
    V: Clone,
{
    /// Wraps a map into a shared map accessor, making it safe to move across
    /// thread boundaries. Enforces an additional constraint of Clone on
    /// values.
    pub fn with_map(map: M) -> Self {
        Self(Arc::new(Mutex::new(map)), PhantomData, PhantomData)
    }

    /// Stores a value, returning the previous one.
    pub fn put(&self, k: K, v: V) -> Option<V> {
        self.0.lock().put(k, v)
    }

    /// Get an item from the map. This clones it to minimize the time the lock
    /// is held.
    pub fn get<Q>(&self, k: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.0.lock().get(k).cloned()
    }

    /// Remove an item from the map, returning the removed item if it existed.
    pub fn remove<Q>(&self, k: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.0.lock().remove(k)
    }

    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.0.lock().contains_key(k)
    }

    /// Clears the map.
    pub fn clear(&self) {
        self.0.lock().clear()
    }

    /// The number of elements in the map at present.
    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }
}

impl<K, V, S> SharedMap<OrderedHashMap<K, V, S>, K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    /// A snapshot of the keys in insertion order.
    pub fn keys(&self) -> Vec<K> {
        self.0.lock().keys()
    }

    /// A snapshot of the values in insertion order.
    pub fn values(&self) -> Vec<V> {
        self.0.lock().values()
    }

    pub fn contains_value(&self, v: &V) -> bool
    where
        V: PartialEq,
    {
        self.0.lock().contains_value(v)
    }
}

impl<K, V, S> fmt::Display for SharedMap<OrderedHashMap<K, V, S>, K, V>
where
    K: Eq + Hash + fmt::Display,
    V: Clone + fmt::Display,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0.lock(), f)
    }
}

impl<M, K, V> Clone for SharedMap<M, K, V>
where
    M: Map<K, V>,
    K: Eq + Hash,
    V: Clone,
{
    fn clone(&self) -> Self {
        SharedMap(self.0.clone(), PhantomData, PhantomData)
    }
}
