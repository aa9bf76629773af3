//! A hash map that remembers the order its keys were first inserted in.
//!
//! [`OrderedHashMap`] keeps a fixed number of buckets, each with a chain of
//! colliding entries, and also strings every entry onto an order list. Lookups
//! go through the buckets; iteration, [`keys`](OrderedHashMap::keys),
//! [`values`](OrderedHashMap::values) and the `Display` rendering go through
//! the order list.
//!
//! ```
//! use ordered_hash_map::OrderedHashMap;
//!
//! let mut map = OrderedHashMap::new();
//! map.put("b", 2);
//! map.put("a", 1);
//! map.put("b", 20);
//!
//! assert_eq!(vec!["b", "a"], map.keys());
//! assert_eq!("[ { key=b;value=20} { key=a;value=1} ]", map.to_string());
//! ```
//!
//! The map itself is single threaded. With the `shared_map` feature (on by
//! default) a [`SharedMap`] puts any [`Map`] behind a lock so it can be handed
//! to other threads.

mod arena;
pub mod error;
pub mod identity_hasher;
mod map;
pub mod ordered_map;
#[cfg(feature = "shared_map")]
mod shared_map;

pub use error::{Error, Result};
pub use identity_hasher::BuildIdentityHasher;
pub use map::Map;
pub use ordered_map::{OrderedHashMap, OrderedHashMapIter, DEFAULT_CAPACITY};
#[cfg(feature = "shared_map")]
pub use shared_map::SharedMap;
