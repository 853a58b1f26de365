//! TTL + LRU cache store.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use dca_core::traits::{Clock, SystemClock};

use crate::backend::StorageBackend;

/// Default entry TTL.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Fraction of capacity at which pre-write eviction kicks in.
pub const EVICTION_THRESHOLD: f64 = 0.8;

/// Cache store configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Key namespace prefix; lets the cache share a storage medium with
    /// unrelated data without touching it
    pub prefix: String,
    /// Capacity budget in bytes of serialized entries
    pub max_size_bytes: u64,
    /// TTL applied when `set` is not given one
    pub default_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prefix: "dca-cache:".to_string(),
            max_size_bytes: 5 * 1024 * 1024,
            default_ttl: DEFAULT_TTL,
        }
    }
}

/// Cache usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
    pub total_size_bytes: u64,
    pub max_size_bytes: u64,
    pub utilization_percent: f64,
}

/// Persisted entry envelope.
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    value: serde_json::Value,
    /// Write time, Unix milliseconds; eviction order key
    timestamp: i64,
    /// Expiry time, Unix milliseconds
    expires_at: i64,
}

/// Metadata for one owned entry, used for eviction and stats.
struct EntryMeta {
    key: String,
    /// `i64::MIN` for entries that fail to parse, so they evict first
    timestamp: i64,
    expires_at: i64,
    size: u64,
}

/// Generic key/value cache with per-entry TTL and capacity-bounded eviction.
///
/// Eviction is strict oldest-by-write-time; reads never refresh recency.
/// Every operation holds the backend mutex for its full read-evict-write
/// sequence, so concurrent callers cannot interleave two evictions.
pub struct CacheStore<B: StorageBackend> {
    backend: Mutex<B>,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl<B: StorageBackend> CacheStore<B> {
    /// Create a store over the given backend with the system clock.
    pub fn new(backend: B, config: CacheConfig) -> Self {
        Self {
            backend: Mutex::new(backend),
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source, for deterministic expiry tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Store a value under `key` with the given TTL (default TTL if `None`).
    ///
    /// Returns `false` instead of erroring when serialization fails or the
    /// backend rejects the write even after aggressive eviction.
    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) -> bool {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                warn!(key, error = %e, "cache set: value not serializable");
                return false;
            }
        };

        let now = self.clock.now_millis();
        let ttl = ttl.unwrap_or(self.config.default_ttl);
        let entry = StoredEntry {
            value,
            timestamp: now,
            expires_at: now + ttl.as_millis() as i64,
        };
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "cache set: entry not serializable");
                return false;
            }
        };

        let full_key = self.full_key(key);
        let mut backend = self.lock();

        // Pre-write eviction once total size crosses the threshold.
        let threshold = (self.config.max_size_bytes as f64 * EVICTION_THRESHOLD) as u64;
        if Self::total_size(&*backend, &self.config.prefix) >= threshold {
            Self::evict_to(&mut *backend, &self.config.prefix, threshold);
        }

        match backend.write(&full_key, &raw) {
            Ok(()) => true,
            Err(first) => {
                // Medium rejected the write; evict aggressively and retry once.
                debug!(key, error = %first, "cache write rejected, evicting to half capacity");
                Self::evict_to(
                    &mut *backend,
                    &self.config.prefix,
                    self.config.max_size_bytes / 2,
                );
                match backend.write(&full_key, &raw) {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(key, error = %e, "cache write failed after eviction");
                        false
                    }
                }
            }
        }
    }

    /// Fetch a value, `None` if absent, expired, or unreadable.
    ///
    /// An expired or corrupt entry is removed as a side effect.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let full_key = self.full_key(key);
        let mut backend = self.lock();

        let raw = match backend.read(&full_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "cache get: backend read failed");
                return None;
            }
        };

        let entry: StoredEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(_) => {
                let _ = backend.remove(&full_key);
                return None;
            }
        };

        if self.clock.now_millis() > entry.expires_at {
            debug!(key, "cache entry expired");
            let _ = backend.remove(&full_key);
            return None;
        }

        match serde_json::from_value(entry.value) {
            Ok(value) => Some(value),
            Err(_) => {
                let _ = backend.remove(&full_key);
                None
            }
        }
    }

    /// Check presence and freshness without mutating the store.
    pub fn is_valid(&self, key: &str) -> bool {
        let full_key = self.full_key(key);
        let backend = self.lock();
        match backend.read(&full_key) {
            Ok(Some(raw)) => match serde_json::from_str::<StoredEntry>(&raw) {
                Ok(entry) => self.clock.now_millis() <= entry.expires_at,
                Err(_) => false,
            },
            _ => false,
        }
    }

    /// Remove every expired or unreadable owned entry; returns count removed.
    pub fn clear_expired(&self) -> usize {
        let now = self.clock.now_millis();
        let mut backend = self.lock();
        let entries = Self::owned_entries(&*backend, &self.config.prefix);

        let mut removed = 0;
        for meta in entries {
            if meta.timestamp == i64::MIN || now > meta.expires_at {
                if backend.remove(&meta.key).is_ok() {
                    removed += 1;
                }
            }
        }
        debug!(removed, "cleared expired cache entries");
        removed
    }

    /// Remove every owned entry, leaving foreign keys untouched.
    pub fn clear_all(&self) -> usize {
        let mut backend = self.lock();
        let entries = Self::owned_entries(&*backend, &self.config.prefix);

        let mut removed = 0;
        for meta in entries {
            if backend.remove(&meta.key).is_ok() {
                removed += 1;
            }
        }
        removed
    }

    /// Current usage statistics.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now_millis();
        let backend = self.lock();
        let entries = Self::owned_entries(&*backend, &self.config.prefix);

        let total_entries = entries.len();
        let expired_entries = entries
            .iter()
            .filter(|m| m.timestamp == i64::MIN || now > m.expires_at)
            .count();
        let total_size_bytes: u64 = entries.iter().map(|m| m.size).sum();

        CacheStats {
            total_entries,
            valid_entries: total_entries - expired_entries,
            expired_entries,
            total_size_bytes,
            max_size_bytes: self.config.max_size_bytes,
            utilization_percent: if self.config.max_size_bytes == 0 {
                0.0
            } else {
                total_size_bytes as f64 / self.config.max_size_bytes as f64 * 100.0
            },
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.config.prefix, key)
    }

    fn lock(&self) -> MutexGuard<'_, B> {
        self.backend.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Metadata for every owned entry.
    fn owned_entries(backend: &B, prefix: &str) -> Vec<EntryMeta> {
        let keys = match backend.keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "cache: backend key listing failed");
                return Vec::new();
            }
        };

        let mut entries = Vec::new();
        for key in keys {
            if !key.starts_with(prefix) {
                continue;
            }
            let raw = match backend.read(&key) {
                Ok(Some(raw)) => raw,
                _ => continue,
            };
            let size = raw.len() as u64;
            match serde_json::from_str::<StoredEntry>(&raw) {
                Ok(entry) => entries.push(EntryMeta {
                    key,
                    timestamp: entry.timestamp,
                    expires_at: entry.expires_at,
                    size,
                }),
                Err(_) => entries.push(EntryMeta {
                    key,
                    timestamp: i64::MIN,
                    expires_at: i64::MIN,
                    size,
                }),
            }
        }
        entries
    }

    fn total_size(backend: &B, prefix: &str) -> u64 {
        Self::owned_entries(backend, prefix)
            .iter()
            .map(|m| m.size)
            .sum()
    }

    /// Remove owned entries oldest-write-first until total size <= `target`.
    fn evict_to(backend: &mut B, prefix: &str, target: u64) {
        let mut entries = Self::owned_entries(backend, prefix);
        entries.sort_by_key(|m| m.timestamp);

        let mut total: u64 = entries.iter().map(|m| m.size).sum();
        let mut evicted = 0;
        for meta in entries {
            if total <= target {
                break;
            }
            if backend.remove(&meta.key).is_ok() {
                total -= meta.size;
                evicted += 1;
            }
        }
        if evicted > 0 {
            debug!(evicted, total, target, "evicted cache entries");
        }
    }
}
