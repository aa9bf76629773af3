pub mod ordered_hash_map;

pub use ordered_hash_map::{OrderedHashMap, OrderedHashMapIter};

pub type KeyHash = u64;

/// The number of buckets a map gets when nobody asks for a specific number.
pub const DEFAULT_CAPACITY: usize = 16;
