//! Time-boxed, capacity-bounded cache for fetched price data.
//!
//! Entries carry a TTL and are evicted oldest-write-first when the store
//! approaches its size budget. Storage mediums are pluggable through
//! [`StorageBackend`]; failures at that level degrade to cache misses and
//! failed writes rather than propagating as errors.

mod backend;
mod store;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use store::{CacheConfig, CacheStats, CacheStore, DEFAULT_TTL, EVICTION_THRESHOLD};
