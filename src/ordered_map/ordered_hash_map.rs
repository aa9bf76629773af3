use super::{KeyHash, DEFAULT_CAPACITY};
use crate::{
    arena::{Arena, Entry, EntryHandle},
    error::Result,
    map::Map,
};
use std::{
    borrow::Borrow,
    collections::hash_map::RandomState,
    fmt,
    hash::{BuildHasher, Hash, Hasher},
    iter::{self, FromIterator, FusedIterator},
    mem,
};

/// A hash map with a fixed number of buckets whose entries are also linked
/// together in the order their keys were first inserted.
///
/// Each bucket holds a singly linked chain of the entries whose hash lands in
/// it. Independently of that, every entry is threaded onto an order list
/// running from the oldest key (`head`) to the newest (`tail`). Iteration,
/// [`keys`](Self::keys), [`values`](Self::values) and the [`Display`] rendering
/// all walk the order list, so bucket layout is never visible from outside.
///
/// The bucket count is chosen at construction and never changes. Nothing is
/// ever rehashed; chains just get longer as the map fills up, so lookups are
/// O(1) on average only while `len() / capacity()` stays small.
///
/// Updating the value of a key which is already present does not move it in
/// the order list.
///
/// [`Display`]: fmt::Display
#[derive(Clone)]
pub struct OrderedHashMap<K, V, S = RandomState>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    hash_builder: S,
    buckets: Vec<Option<EntryHandle>>,
    entries: Arena<K, V>,
    head: Option<EntryHandle>,
    tail: Option<EntryHandle>,
}

/// Walks an [`OrderedHashMap`] from its oldest key to its newest.
pub struct OrderedHashMapIter<'a, K, V> {
    idx: Option<EntryHandle>,
    remaining: usize,
    entries: &'a Arena<K, V>,
}

impl<K, V> OrderedHashMap<K, V, RandomState>
where
    K: Eq + Hash,
{
    /// Makes a new map with the default number of buckets.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Makes a new map with `capacity` buckets. A capacity of zero is bumped
    /// up to a single bucket.
    pub fn with_capacity(capacity: usize) -> Self {
        OrderedHashMap::with_capacity_and_hash_builder(
            capacity,
            Default::default(),
        )
    }
}

impl<K, V, S> OrderedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Makes a new map with the default number of buckets and a specific
    /// hasher.
    pub fn with_hash_builder(hash_builder: S) -> Self {
        Self::with_capacity_and_hash_builder(DEFAULT_CAPACITY, hash_builder)
    }

    /// Makes a new map with `capacity` buckets and a specific hasher.
    pub fn with_capacity_and_hash_builder(
        capacity: usize,
        hash_builder: S,
    ) -> Self {
        let capacity = capacity.max(1);
        log::debug!("new ordered hash map with {} buckets", capacity);

        Self {
            hash_builder,
            buckets: vec![None; capacity],
            entries: Arena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    /// The number of entries in the map.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Same as [`len`](Self::len).
    pub fn size(&self) -> usize {
        self.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of buckets, which is fixed for the life of the map.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// A reference to the value stored under `k`, if there is one.
    pub fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(k).map(|handle| &self.entries[handle].value)
    }

    pub fn get_mut<Q>(&mut self, k: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.find(k)?;
        Some(&mut self.entries[handle].value)
    }

    /// Whether there's an entry for `k`. Since absence is an `Option` rather
    /// than a special value, this is exact: a map of `Option<T>` holding
    /// `None` under `k` still contains `k`.
    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(k).is_some()
    }

    /// Whether any entry holds `v`. This visits every bucket chain, so it's
    /// O(n) in the number of entries plus the number of buckets.
    pub fn contains_value(&self, v: &V) -> bool
    where
        V: PartialEq,
    {
        self.buckets.iter().any(|&bucket_head| {
            self.chain(bucket_head)
                .any(|handle| self.entries[handle].value == *v)
        })
    }

    /// Stores `v` under `k`, returning the value that was there before.
    ///
    /// A new key is appended to the end of its bucket's chain and to the end
    /// of the order list. An existing key has its value swapped in place and
    /// keeps its position.
    ///
    /// # Panics
    ///
    /// If a new entry can't be allocated. Use [`try_put`](Self::try_put) to
    /// get that back as an error instead.
    pub fn put(&mut self, k: K, v: V) -> Option<V> {
        match self.try_put(k, v) {
            Ok(previous) => previous,
            Err(e) => panic!("{}", e),
        }
    }

    /// Same as [`put`](Self::put).
    pub fn insert(&mut self, k: K, v: V) -> Option<V> {
        self.put(k, v)
    }

    /// Stores `v` under `k`, returning the value that was there before, or an
    /// error if there was no memory for a new entry. The map is left exactly
    /// as it was when this fails.
    pub fn try_put(&mut self, k: K, v: V) -> Result<Option<V>> {
        #[cfg(test)]
        let original_len = self.len();
        let k_hash = self.k_hash(&k);
        let bucket = self.bucket_of(k_hash);

        // look for the key, keeping hold of the last node in the chain so a
        // new entry can be hung off of it
        let mut chain_tail = None;
        let mut cursor = self.buckets[bucket];
        while let Some(handle) = cursor {
            let entry = &mut self.entries[handle];
            if entry.hash == k_hash && entry.key == k {
                return Ok(Some(mem::replace(&mut entry.value, v)));
            }
            chain_tail = Some(handle);
            cursor = entry.chain_next;
        }

        let mut entry = Entry::new(k, v, k_hash);
        entry.order_prev = self.tail;
        let handle = self.entries.try_insert(entry)?;

        match chain_tail {
            Some(chain_tail) => {
                self.entries[chain_tail].chain_next = Some(handle)
            }
            None => self.buckets[bucket] = Some(handle),
        }

        match self.tail {
            Some(tail) => self.entries[tail].order_next = Some(handle),
            None => self.head = Some(handle),
        }
        self.tail = Some(handle);

        log::trace!("linked new entry into bucket {}", bucket);

        #[cfg(test)]
        {
            assert_eq!(original_len + 1, self.len());
            assert!(self.head.is_some());
            assert!(self.tail.is_some());
            self.continuity_test();
        }

        Ok(None)
    }

    /// Removes the entry for `k`, returning its value.
    pub fn remove<Q>(&mut self, k: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.is_empty() {
            return None;
        }

        #[cfg(test)]
        let original_len = self.len();
        let k_hash = self.k_hash(k);
        let bucket = self.bucket_of(k_hash);

        let mut chain_prev = None;
        let mut cursor = self.buckets[bucket];
        let handle = loop {
            let handle = cursor?;
            let entry = &self.entries[handle];
            if entry.hash == k_hash && Q::eq(k, entry.key.borrow()) {
                break handle;
            }
            chain_prev = Some(handle);
            cursor = entry.chain_next;
        };

        let removed = self.entries.remove(handle)?;

        // close the gap in the bucket chain
        match chain_prev {
            Some(prev) => self.entries[prev].chain_next = removed.chain_next,
            None => self.buckets[bucket] = removed.chain_next,
        }

        // and in the order list
        match (removed.order_prev, removed.order_next) {
            (None, None) => {
                self.head = None;
                self.tail = None;
            }
            (None, Some(next)) => {
                self.head = Some(next);
                self.entries[next].order_prev = None;
            }
            (Some(prev), None) => {
                self.tail = Some(prev);
                self.entries[prev].order_next = None;
            }
            (Some(prev), Some(next)) => {
                self.entries[prev].order_next = Some(next);
                self.entries[next].order_prev = Some(prev);
            }
        }

        log::trace!("unlinked entry from bucket {}", bucket);

        #[cfg(test)]
        {
            assert_eq!(original_len - 1, self.len());

            if self.len() > 0 {
                assert!(self.head.is_some());
                assert!(self.tail.is_some());
            }

            self.continuity_test();
        }

        Some(removed.value)
    }

    /// Drops every entry. The bucket count stays the same.
    pub fn clear(&mut self) {
        log::trace!("clearing {} entries", self.len());

        self.entries.clear();
        for bucket in self.buckets.iter_mut() {
            *bucket = None;
        }
        self.head = None;
        self.tail = None;

        #[cfg(test)]
        {
            assert_eq!(0, self.len());
            self.continuity_test();
        }
    }

    /// The oldest entry.
    pub fn front(&self) -> Option<(&K, &V)> {
        self.head.map(|handle| {
            let entry = &self.entries[handle];
            (&entry.key, &entry.value)
        })
    }

    /// The newest entry.
    pub fn back(&self) -> Option<(&K, &V)> {
        self.tail.map(|handle| {
            let entry = &self.entries[handle];
            (&entry.key, &entry.value)
        })
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> OrderedHashMapIter<'_, K, V> {
        OrderedHashMapIter {
            idx: self.head,
            remaining: self.len(),
            entries: &self.entries,
        }
    }

    pub fn iter_keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn iter_values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// A snapshot of the keys in insertion order. Changing the map afterwards
    /// doesn't change the snapshot.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.iter_keys().cloned().collect()
    }

    /// A snapshot of the values in insertion order, lined up with
    /// [`keys`](Self::keys).
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.iter_values().cloned().collect()
    }

    fn k_hash<Q>(&self, k: &Q) -> KeyHash
    where
        Q: Hash + ?Sized,
    {
        let mut h = self.hash_builder.build_hasher();
        k.hash(&mut h);
        h.finish()
    }

    // reduces modulo the full bucket count so every bucket is reachable
    fn bucket_of(&self, k_hash: KeyHash) -> usize {
        (k_hash % self.buckets.len() as u64) as usize
    }

    /// The handles in a bucket chain, front to back.
    fn chain(
        &self,
        bucket_head: Option<EntryHandle>,
    ) -> impl Iterator<Item = EntryHandle> + '_ {
        iter::successors(bucket_head, move |&handle| {
            self.entries[handle].chain_next
        })
    }

    fn find<Q>(&self, k: &Q) -> Option<EntryHandle>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.is_empty() {
            return None;
        }

        let k_hash = self.k_hash(k);
        self.chain(self.buckets[self.bucket_of(k_hash)])
            .find(|&handle| {
                let entry = &self.entries[handle];
                entry.hash == k_hash && Q::eq(k, entry.key.borrow())
            })
    }

    #[cfg(test)]
    fn continuity_test(&self) {
        let mut count = 0;
        let mut prev = None;
        let mut idx = self.head;

        // walk the order list and make sure the back links and the tail agree
        // with the forward links, and the length agrees with the arena
        while let Some(handle) = idx {
            count = count + 1;
            assert!(count <= self.len());
            assert_eq!(prev, self.entries[handle].order_prev);

            prev = idx;
            idx = self.entries[handle].order_next;
        }

        assert_eq!(self.len(), count);
        assert_eq!(self.tail, prev);

        if self.is_empty() {
            assert!(self.head.is_none());
            assert!(self.tail.is_none());
        }

        // every entry must sit in exactly the bucket its hash routes to
        count = 0;
        for (bucket, &bucket_head) in self.buckets.iter().enumerate() {
            for handle in self.chain(bucket_head) {
                count = count + 1;
                assert!(count <= self.len());
                assert_eq!(bucket, self.bucket_of(self.entries[handle].hash));
            }
        }

        assert_eq!(self.len(), count);
    }
}

impl<K, V, S> Map<K, V> for OrderedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn put(&mut self, k: K, v: V) -> Option<V> {
        OrderedHashMap::put(self, k, v)
    }

    fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        OrderedHashMap::get(self, k)
    }

    fn get_mut<Q>(&mut self, k: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        OrderedHashMap::get_mut(self, k)
    }

    fn remove<Q>(&mut self, k: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        OrderedHashMap::remove(self, k)
    }

    fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        OrderedHashMap::contains_key(self, k)
    }

    fn clear(&mut self) {
        OrderedHashMap::clear(self)
    }

    fn len(&self) -> usize {
        OrderedHashMap::len(self)
    }
}

impl<K, V, S> Default for OrderedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hash_builder(S::default())
    }
}

impl<K, V, S> Extend<(K, V)> for OrderedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for OrderedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a OrderedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = OrderedHashMapIter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Renders as `[ { key=k1;value=v1} { key=k2;value=v2} ]` in insertion order,
/// or `[ ]` when empty.
impl<K, V, S> fmt::Display for OrderedHashMap<K, V, S>
where
    K: Eq + Hash + fmt::Display,
    V: fmt::Display,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[ ")?;
        for (k, v) in self.iter() {
            write!(f, "{{ key={};value={}}} ", k, v)?;
        }
        f.write_str("]")
    }
}

impl<K, V, S> fmt::Debug for OrderedHashMap<K, V, S>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V> Iterator for OrderedHashMapIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.idx?;
        let entry = &self.entries[handle];
        self.idx = entry.order_next;
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for OrderedHashMapIter<'_, K, V> {}

impl<K, V> FusedIterator for OrderedHashMapIter<'_, K, V> {}
