//! Flat storage for map entries. Every entry lives in one contiguous Vec and is
//! addressed by its position in it, so the bucket chains and the order list can
//! both point at the same entry without either of them owning it.

use std::{
    collections::TryReserveError,
    ops::{Index, IndexMut},
};

/// Alias for the index of an entry in the arena's storage vec.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct EntryHandle(usize);

/// A single key-value pair and the links that thread it through the map.
#[derive(Clone, Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,

    pub(crate) value: V,

    /// The full hash of the key, kept around so chain scans can reject
    /// mismatches without comparing keys.
    pub(crate) hash: u64,

    /// The next entry in the same bucket.
    pub(crate) chain_next: Option<EntryHandle>,

    /// The entry inserted just before this one.
    pub(crate) order_prev: Option<EntryHandle>,

    /// The entry inserted just after this one.
    pub(crate) order_next: Option<EntryHandle>,
}

impl<K, V> Entry<K, V> {
    /// A fresh, unlinked entry.
    pub(crate) fn new(key: K, value: V, hash: u64) -> Self {
        Self {
            key,
            value,
            hash,
            chain_next: None,
            order_prev: None,
            order_next: None,
        }
    }
}

#[cold]
#[inline(never)]
fn assert_free() -> ! {
    panic!("Attempted to access an entry in a free slot");
}

/// A Vec of entries with a freelist. Slots that have been vacated are handed
/// out again before the Vec grows, and nothing is ever compacted, so a handle
/// stays valid for exactly as long as its entry does.
#[derive(Clone, Debug)]
pub(crate) struct Arena<K, V> {
    /// The entries, or `None` where a slot has been freed.
    store: Vec<Option<Entry<K, V>>>,

    /// Slots which aren't in use anymore. These will be reused.
    free: Vec<EntryHandle>,

    /// Makes the next growth of the store fail as if memory ran out.
    #[cfg(test)]
    pub(crate) fail_reserve: bool,
}

impl<K, V> Arena<K, V> {
    /// Creates a new arena with room for `capacity` entries.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            store: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
            #[cfg(test)]
            fail_reserve: false,
        }
    }

    /// The number of live entries.
    pub(crate) fn len(&self) -> usize {
        self.store.len() - self.free.len()
    }

    /// Stores an entry, reusing a freed slot if there is one. Fails only when
    /// the storage can't grow; the arena is untouched in that case.
    pub(crate) fn try_insert(
        &mut self,
        entry: Entry<K, V>,
    ) -> Result<EntryHandle, TryReserveError> {
        if let Some(handle) = self.free.pop() {
            self.store[handle.0] = Some(entry);
            return Ok(handle);
        }

        #[cfg(test)]
        {
            if self.fail_reserve {
                let overflow = Vec::<u8>::new().try_reserve(usize::MAX);
                return Err(overflow.unwrap_err());
            }
        }

        // removal pushes onto the freelist and must never have to allocate,
        // so it needs room for every slot that could end up on it
        self.store.try_reserve(1)?;
        self.free.try_reserve(self.store.len() + 1)?;

        let handle = EntryHandle(self.store.len());
        self.store.push(Some(entry));
        Ok(handle)
    }

    /// Takes an entry out of the arena and freelists its slot.
    pub(crate) fn remove(
        &mut self,
        handle: EntryHandle,
    ) -> Option<Entry<K, V>> {
        let entry = self.store.get_mut(handle.0)?.take()?;
        self.free.push(handle);
        Some(entry)
    }

    /// Drops every entry. Does not free the underlying buffers.
    pub(crate) fn clear(&mut self) {
        self.store.clear();
        self.free.clear();
    }
}

impl<K, V> Index<EntryHandle> for Arena<K, V> {
    type Output = Entry<K, V>;

    fn index(&self, handle: EntryHandle) -> &Self::Output {
        match &self.store[handle.0] {
            Some(entry) => entry,
            None => assert_free(),
        }
    }
}

impl<K, V> IndexMut<EntryHandle> for Arena<K, V> {
    fn index_mut(&mut self, handle: EntryHandle) -> &mut Self::Output {
        match &mut self.store[handle.0] {
            Some(entry) => entry,
            None => assert_free(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Arena, Entry};

    #[test]
    fn test_freelist_reuse() {
        let mut arena: Arena<u64, &str> = Arena::with_capacity(2);

        let a = arena.try_insert(Entry::new(1, "a", 1)).unwrap();
        let b = arena.try_insert(Entry::new(2, "b", 2)).unwrap();
        assert_eq!(2, arena.len());

        let removed = arena.remove(a).unwrap();
        assert_eq!("a", removed.value);
        assert_eq!(1, arena.len());

        // removing twice is a no-op rather than a double free
        assert!(arena.remove(a).is_none());
        assert_eq!(1, arena.len());

        // the vacated slot gets handed out again before the vec grows
        let c = arena.try_insert(Entry::new(3, "c", 3)).unwrap();
        assert_eq!(a, c);
        assert_eq!(2, arena.store.len());
        assert_eq!("c", arena[c].value);
        assert_eq!("b", arena[b].value);
    }

    #[test]
    #[should_panic]
    fn test_index_free_slot() {
        let mut arena: Arena<u64, u64> = Arena::with_capacity(1);
        let a = arena.try_insert(Entry::new(1, 1, 1)).unwrap();
        arena.remove(a);

        let _ = &arena[a];
    }

    #[test]
    fn test_failed_insert_leaves_arena_alone() {
        let mut arena: Arena<u64, u64> = Arena::with_capacity(1);
        let a = arena.try_insert(Entry::new(1, 1, 1)).unwrap();

        arena.fail_reserve = true;
        assert!(arena.try_insert(Entry::new(2, 2, 2)).is_err());
        assert_eq!(1, arena.len());
        assert_eq!(1, arena.store.len());
        assert_eq!(1, arena[a].value);

        // a freed slot needs no allocation, so it still gets reused
        arena.remove(a);
        let b = arena.try_insert(Entry::new(3, 3, 3)).unwrap();
        assert_eq!(a, b);
        assert_eq!(3, arena[b].value);
    }

    #[test]
    fn test_clear() {
        let mut arena: Arena<u64, u64> = Arena::with_capacity(4);
        for i in 0..4 {
            arena.try_insert(Entry::new(i, i, i)).unwrap();
        }
        arena.clear();

        assert_eq!(0, arena.len());
        assert!(arena.store.is_empty());
        assert!(arena.free.is_empty());
    }
}
