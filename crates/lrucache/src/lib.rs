//! # lrucache
//!
//! Fixed-capacity in-memory cache with Least-Recently-Used eviction.
//!
//! ## Architecture
//! - **Index**: AHash map from key to slot handle (O(1) lookup)
//! - **Recency List**: arena-backed doubly-linked list, most recent at the
//!   front (O(1) promote, O(1) evict from the back)
//! - **LruCache**: keeps both in lockstep and owns the eviction policy
//! - **SharedCache**: one mutex around an `LruCache` plus hit/miss counters
//!
//! ```
//! use lrucache::{Error, LruCache};
//!
//! let mut cache = LruCache::new(2)?;
//! cache.put(1, 2);
//! cache.put(10, 20);
//! assert_eq!(cache.get(&1), Ok(&2)); // 10 is now least recently used
//!
//! cache.put(100, 200); // evicts 10
//! assert_eq!(cache.get(&10), Err(Error::KeyNotFound));
//! assert_eq!(cache.get_or(&10, 0), 0);
//! assert_eq!(cache.get(&1), Ok(&2));
//! # Ok::<(), Error>(())
//! ```

#![warn(missing_docs)]

mod capacity;
mod error;
mod index;
mod list;
mod lru;
mod shared;
mod stats;

pub use capacity::Capacity;
pub use error::{Error, Result};
pub use list::{Iter, RecencyList, SlotId};
pub use lru::LruCache;
pub use shared::SharedCache;
pub use stats::CacheStats;
