use std::{borrow::Borrow, hash::Hash};

/// Describes what a map is.
pub trait Map<K, V>
where
    K: Eq + Hash,
{
    /// Store a value under a key. Returns the previous value if the key
    /// already had one.
    fn put(&mut self, k: K, v: V) -> Option<V>;

    /// Get a reference to the value stored under a key.
    fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    /// Get a mutable reference to the value stored under a key.
    fn get_mut<Q>(&mut self, k: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    /// Take the entry for a key out of the map, returning its value.
    fn remove<Q>(&mut self, k: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    /// Whether anything is stored under a key.
    fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(k).is_some()
    }

    /// Empties the map entirely.
    fn clear(&mut self);

    /// The number of items stored in the map right now.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
